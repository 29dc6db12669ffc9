//! 學校並排比較：每個欄位一列，每間學校一欄。

use crate::domain::model::School;
use crate::utils::error::{AppError, Result};
use crate::utils::format::format_inr;
use serde::Serialize;
use std::fmt;

pub const MIN_COMPARE: usize = 2;
pub const MAX_COMPARE: usize = 3;
pub const FACILITY_PREVIEW: usize = 5;
pub const NOT_AVAILABLE: &str = "Not available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Basic,
    Fees,
    Facilities,
    Contact,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Basic => "Basic Information",
            Category::Fees => "Fee Structure",
            Category::Facilities => "Facilities",
            Category::Contact => "Contact Information",
        }
    }
}

/// 從學校取出的原始值，尚未格式化
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Amount(u64),
    List(Vec<String>),
    Url(String),
    Rating { rating: f64, reviews: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Formatter {
    Plain,
    Currency,
    Truncate { max_items: usize },
    Link { label: &'static str, placeholder: &'static str },
}

impl Formatter {
    pub fn format(&self, value: Option<&FieldValue>) -> String {
        match (self, value) {
            (Formatter::Link { placeholder, .. }, None) => placeholder.to_string(),
            (_, None) => String::new(),
            (Formatter::Currency, Some(FieldValue::Amount(amount))) => format_inr(*amount),
            (Formatter::Truncate { max_items }, Some(FieldValue::List(items))) => {
                truncate_list(items, *max_items)
            }
            (Formatter::Link { label, .. }, Some(FieldValue::Url(url))) => {
                format!("{} ({})", label, url)
            }
            (_, Some(value)) => plain(value),
        }
    }
}

fn plain(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) | FieldValue::Url(text) => text.clone(),
        FieldValue::Amount(amount) => amount.to_string(),
        FieldValue::List(items) => items.join(", "),
        FieldValue::Rating { rating, reviews } => format!("{} ({} reviews)", rating, reviews),
    }
}

/// 每項一行，超過上限的部分以 "+N more" 表示
pub fn truncate_list(items: &[String], max_items: usize) -> String {
    let mut lines: Vec<String> = items
        .iter()
        .take(max_items)
        .map(|item| format!("• {}", item))
        .collect();
    if items.len() > max_items {
        lines.push(format!("+{} more", items.len() - max_items));
    }
    lines.join("\n")
}

pub struct FieldSpec {
    pub label: &'static str,
    pub category: Category,
    pub extract: fn(&School) -> Option<FieldValue>,
    pub formatter: Formatter,
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("label", &self.label)
            .field("category", &self.category)
            .field("formatter", &self.formatter)
            .finish()
    }
}

impl FieldSpec {
    pub fn cell(&self, school: &School) -> String {
        self.formatter.format((self.extract)(school).as_ref())
    }
}

fn text(value: &str) -> Option<FieldValue> {
    (!value.is_empty()).then(|| FieldValue::Text(value.to_string()))
}

/// 比較頁面的預設欄位
pub fn default_field_specs() -> Vec<FieldSpec> {
    vec![
        FieldSpec {
            label: "School Type",
            category: Category::Basic,
            extract: |s| text(s.school_type.as_str()),
            formatter: Formatter::Plain,
        },
        FieldSpec {
            label: "Board",
            category: Category::Basic,
            extract: |s| text(s.board.as_str()),
            formatter: Formatter::Plain,
        },
        FieldSpec {
            label: "Established",
            category: Category::Basic,
            extract: |s| s.established_year.map(|y| FieldValue::Text(y.to_string())),
            formatter: Formatter::Plain,
        },
        FieldSpec {
            label: "Rating",
            category: Category::Basic,
            extract: |s| {
                Some(FieldValue::Rating {
                    rating: s.rating,
                    reviews: s.reviews_count,
                })
            },
            formatter: Formatter::Plain,
        },
        FieldSpec {
            label: "Annual Fee",
            category: Category::Fees,
            extract: |s| Some(FieldValue::Amount(s.fees.annual_fee)),
            formatter: Formatter::Currency,
        },
        FieldSpec {
            label: "Admission Fee",
            category: Category::Fees,
            extract: |s| Some(FieldValue::Amount(s.fees.admission_fee)),
            formatter: Formatter::Currency,
        },
        FieldSpec {
            label: "Facilities",
            category: Category::Facilities,
            extract: |s| {
                (!s.facilities.is_empty()).then(|| FieldValue::List(s.facilities.clone()))
            },
            formatter: Formatter::Truncate {
                max_items: FACILITY_PREVIEW,
            },
        },
        FieldSpec {
            label: "Website",
            category: Category::Contact,
            extract: |s| s.website_url().map(|url| FieldValue::Url(url.to_string())),
            formatter: Formatter::Link {
                label: "Visit Website",
                placeholder: NOT_AVAILABLE,
            },
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub place: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub label: String,
    pub category: Category,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// 不檢查學校數量，由呼叫端負責 2..=3 的限制
pub fn build_comparison(records: &[School], field_specs: &[FieldSpec]) -> Table {
    let columns = records
        .iter()
        .map(|school| Column {
            id: school.id.clone(),
            name: school.name.clone(),
            place: school.place(),
        })
        .collect();

    let rows = field_specs
        .iter()
        .map(|spec| Row {
            label: spec.label.to_string(),
            category: spec.category,
            cells: records.iter().map(|school| spec.cell(school)).collect(),
        })
        .collect();

    Table { columns, rows }
}

impl Table {
    pub fn header(&self) -> Vec<String> {
        std::iter::once("Criteria".to_string())
            .chain(self.columns.iter().map(|c| c.name.clone()))
            .collect()
    }

    /// CSV 輸出，多行儲存格以 "; " 合併
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.header())?;
        for row in &self.rows {
            let mut record = vec![row.label.clone()];
            record.extend(row.cells.iter().map(|cell| cell.replace('\n', "; ")));
            writer.write_record(&record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| AppError::ValidationError {
            message: format!("CSV output is not valid UTF-8: {}", e),
        })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();
        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for (i, column) in self.columns.iter().enumerate() {
            widths[i + 1] = widths[i + 1].max(column.place.chars().count());
        }
        for row in &self.rows {
            widths[0] = widths[0].max(row.label.chars().count());
            for (i, cell) in row.cells.iter().enumerate() {
                let widest = cell.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                if let Some(width) = widths.get_mut(i + 1) {
                    *width = (*width).max(widest);
                }
            }
        }

        let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
        write_line(f, &header_refs, &widths)?;
        let mut places = vec![""];
        places.extend(self.columns.iter().map(|c| c.place.as_str()));
        write_line(f, &places, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;

        let mut current: Option<Category> = None;
        for row in &self.rows {
            if current != Some(row.category) {
                writeln!(f, "[{}]", row.category.label())?;
                current = Some(row.category);
            }
            let cell_lines: Vec<Vec<&str>> =
                row.cells.iter().map(|cell| cell.lines().collect()).collect();
            let height = cell_lines.iter().map(Vec::len).max().unwrap_or(0).max(1);
            for line in 0..height {
                let mut cells = vec![if line == 0 { row.label.as_str() } else { "" }];
                cells.extend(
                    cell_lines
                        .iter()
                        .map(|lines| lines.get(line).copied().unwrap_or("")),
                );
                write_line(f, &cells, &widths)?;
            }
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[&str], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}

/// 比較清單：最多三間，不可重複
#[derive(Debug, Clone, Default)]
pub struct ComparisonSet {
    schools: Vec<School>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, school: School) -> Result<()> {
        if self.schools.len() >= MAX_COMPARE {
            return Err(AppError::ComparisonError {
                message: format!("You can compare maximum {} schools at a time", MAX_COMPARE),
            });
        }
        if self.contains(&school.id) {
            return Err(AppError::ComparisonError {
                message: "School already added for comparison".to_string(),
            });
        }
        tracing::debug!("Added '{}' to comparison", school.name);
        self.schools.push(school);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<School> {
        let index = self.schools.iter().position(|s| s.id == id)?;
        Some(self.schools.remove(index))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.schools.iter().any(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.schools.len() >= MIN_COMPARE
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn table(&self, field_specs: &[FieldSpec]) -> Result<Table> {
        if !self.is_ready() {
            return Err(AppError::ComparisonError {
                message: format!(
                    "Add at least {} schools to start comparing them side by side",
                    MIN_COMPARE
                ),
            });
        }
        Ok(build_comparison(&self.schools, field_specs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(id: &str, name: &str, annual_fee: u64, facilities: &[&str]) -> School {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "type": "Day School",
            "board": "CBSE",
            "location": {"city": "Delhi", "state": "Delhi"},
            "fees": {"annual_fee": annual_fee, "admission_fee": 25000},
            "facilities": facilities,
            "rating": 4.5,
            "reviews_count": 324,
            "established_year": 1972
        }))
        .unwrap()
    }

    #[test]
    fn test_table_shape_matches_specs_and_records() {
        let schools = vec![school("1", "DPS", 150000, &[]), school("2", "Doon", 800000, &[])];
        let specs = default_field_specs();
        let table = build_comparison(&schools, &specs);

        assert_eq!(table.rows.len(), specs.len());
        assert!(table.rows.iter().all(|row| row.cells.len() == schools.len()));
        assert_eq!(table.columns[1].name, "Doon");
    }

    #[test]
    fn test_annual_fee_uses_indian_grouping() {
        let schools = vec![school("1", "DPS", 150000, &[]), school("2", "Doon", 800000, &[])];
        let table = build_comparison(&schools, &default_field_specs());
        let fees = table.rows.iter().find(|r| r.label == "Annual Fee").unwrap();
        assert_eq!(fees.cells, vec!["₹1,50,000", "₹8,00,000"]);
    }

    #[test]
    fn test_facilities_truncate_after_five() {
        let facilities = [
            "Smart Classrooms",
            "Computer Lab",
            "Science Labs",
            "Library",
            "Sports Complex",
            "Swimming Pool",
            "Auditorium",
            "Cafeteria",
        ];
        let cell = default_field_specs()
            .iter()
            .find(|s| s.label == "Facilities")
            .unwrap()
            .cell(&school("1", "DPS", 1, &facilities));
        let lines: Vec<&str> = cell.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "• Smart Classrooms");
        assert_eq!(lines[5], "+3 more");
    }

    #[test]
    fn test_missing_website_shows_placeholder_and_missing_list_is_empty() {
        let specs = default_field_specs();
        let table = build_comparison(&[school("1", "DPS", 1, &[])], &specs);
        let website = table.rows.iter().find(|r| r.label == "Website").unwrap();
        assert_eq!(website.cells, vec![NOT_AVAILABLE]);
        let facilities = table.rows.iter().find(|r| r.label == "Facilities").unwrap();
        assert_eq!(facilities.cells, vec![""]);
    }

    #[test]
    fn test_comparison_set_limits() {
        let mut set = ComparisonSet::new();
        assert!(set.table(&default_field_specs()).is_err());

        set.add(school("1", "A", 1, &[])).unwrap();
        assert!(set.add(school("1", "A", 1, &[])).is_err());
        set.add(school("2", "B", 1, &[])).unwrap();
        assert!(set.is_ready());
        set.add(school("3", "C", 1, &[])).unwrap();

        let err = set.add(school("4", "D", 1, &[])).unwrap_err();
        assert!(err.to_string().contains("maximum 3"));

        assert_eq!(set.remove("2").map(|s| s.name), Some("B".to_string()));
        assert_eq!(set.len(), 2);
        assert!(set.remove("missing").is_none());
    }

    #[test]
    fn test_csv_export_flattens_multiline_cells() {
        let schools = vec![
            school("1", "DPS", 150000, &["Library", "Cafeteria"]),
            school("2", "Doon", 800000, &[]),
        ];
        let csv = build_comparison(&schools, &default_field_specs())
            .to_csv()
            .unwrap();
        assert!(csv.starts_with("Criteria,DPS,Doon\n"));
        assert!(csv.contains("Facilities,• Library; • Cafeteria,"));
        assert!(csv.contains("\"₹1,50,000\""));
    }

    #[test]
    fn test_display_groups_rows_by_category() {
        let schools = vec![school("1", "DPS", 150000, &[]), school("2", "Doon", 800000, &[])];
        let rendered = build_comparison(&schools, &default_field_specs()).to_string();
        assert!(rendered.contains("[Fee Structure]"));
        assert!(rendered.contains("4.5 (324 reviews)"));
    }
}
