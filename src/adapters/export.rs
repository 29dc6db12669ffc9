use crate::core::compare::Table;
use crate::domain::model::School;
use crate::domain::ports::Storage;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::validate_file_extension;
use serde::Serialize;

pub const EXPORT_EXTENSIONS: &[&str] = &["csv", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        validate_file_extension("output", path, EXPORT_EXTENSIONS)?;
        if path.ends_with(".json") {
            Ok(ExportFormat::Json)
        } else {
            Ok(ExportFormat::Csv)
        }
    }
}

/// 學校清單的 CSV 欄位
#[derive(Debug, Serialize)]
struct SchoolRow<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    school_type: &'a str,
    board: &'a str,
    city: &'a str,
    state: &'a str,
    annual_fee: u64,
    admission_fee: u64,
    rating: f64,
    reviews_count: u32,
    established_year: Option<i32>,
    website: Option<&'a str>,
}

impl<'a> From<&'a School> for SchoolRow<'a> {
    fn from(school: &'a School) -> Self {
        Self {
            id: &school.id,
            name: &school.name,
            school_type: school.school_type.as_str(),
            board: school.board.as_str(),
            city: &school.location.city,
            state: &school.location.state,
            annual_fee: school.fees.annual_fee,
            admission_fee: school.fees.admission_fee,
            rating: school.rating,
            reviews_count: school.reviews_count,
            established_year: school.established_year,
            website: school.website_url(),
        }
    }
}

pub fn schools_to_csv(schools: &[School]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for school in schools {
        writer.serialize(SchoolRow::from(school))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AppError::ValidationError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub struct Exporter<S: Storage> {
    storage: S,
}

impl<S: Storage> Exporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn export_schools(&self, path: &str, schools: &[School]) -> Result<()> {
        let data = match ExportFormat::from_path(path)? {
            ExportFormat::Csv => schools_to_csv(schools)?,
            ExportFormat::Json => serde_json::to_string_pretty(schools)?,
        };
        tracing::debug!("Writing {} schools ({} bytes) to {}", schools.len(), data.len(), path);
        self.storage.write_file(path, data.as_bytes()).await
    }

    pub async fn export_table(&self, path: &str, table: &Table) -> Result<()> {
        let data = match ExportFormat::from_path(path)? {
            ExportFormat::Csv => table.to_csv()?,
            ExportFormat::Json => serde_json::to_string_pretty(table)?,
        };
        tracing::debug!("Writing comparison table ({} bytes) to {}", data.len(), path);
        self.storage.write_file(path, data.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_extension() {
        assert_eq!(ExportFormat::from_path("out/schools.csv").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path("compare.json").unwrap(), ExportFormat::Json);
        assert!(ExportFormat::from_path("compare.xlsx").is_err());
    }

    #[test]
    fn test_schools_to_csv_has_header_and_rows() {
        let school: School = serde_json::from_value(serde_json::json!({
            "id": "3",
            "name": "The Doon School",
            "type": "Boarding School",
            "board": "CBSE",
            "location": {"city": "Dehradun", "state": "Uttarakhand"},
            "fees": {"annual_fee": 800000, "admission_fee": 50000},
            "rating": 4.8,
            "reviews_count": 189,
            "established_year": 1935,
            "website": "https://www.doonschool.com"
        }))
        .unwrap();

        let csv = schools_to_csv(&[school]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "id,name,type,board,city,state,annual_fee,admission_fee,rating,reviews_count,established_year,website"
        );
        assert_eq!(
            lines[1],
            "3,The Doon School,Boarding School,CBSE,Dehradun,Uttarakhand,800000,50000,4.8,189,1935,https://www.doonschool.com"
        );
    }
}
