//! 多條件篩選：所有非空條件都成立時才保留紀錄，空條件一律放行。
//!
//! 學校、校友、獎學金與募款活動共用同一套評估邏輯，
//! 各自只需實作 [`Filterable`] 描述可被比對的欄位。

use crate::domain::model::{Alumnus, Campaign, Scholarship, School, ALL_CATEGORIES};
use std::borrow::Cow;

pub const MAX_PAGE_SIZE: u32 = 50;

pub trait Filterable {
    /// 自由文字搜尋涵蓋的欄位
    fn search_text(&self) -> Vec<&str>;
    fn text_field(&self, field: &str) -> Option<Cow<'_, str>>;
    fn number_field(&self, field: &str) -> Option<f64>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// 任一搜尋欄位包含關鍵字（不分大小寫）
    Search(String),
    /// 指定欄位包含關鍵字（不分大小寫）
    Contains { field: &'static str, needle: String },
    /// 指定欄位完全相等
    Equals { field: &'static str, value: String },
    /// 閉區間
    Range {
        field: &'static str,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl Criterion {
    /// 空值或格式不正確的條件視為不存在
    pub fn is_absent(&self) -> bool {
        match self {
            Criterion::Search(needle) | Criterion::Contains { needle, .. } => {
                needle.trim().is_empty()
            }
            Criterion::Equals { value, .. } => value.trim().is_empty(),
            Criterion::Range { min, max, .. } => {
                if min.is_some_and(f64::is_nan) || max.is_some_and(f64::is_nan) {
                    return true;
                }
                match (min, max) {
                    (None, None) => true,
                    (Some(lo), Some(hi)) => lo > hi,
                    _ => false,
                }
            }
        }
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        if self.is_absent() {
            return true;
        }

        match self {
            Criterion::Search(needle) => {
                let needle = fold_case(needle.trim());
                record
                    .search_text()
                    .iter()
                    .any(|text| fold_case(text).contains(&needle))
            }
            Criterion::Contains { field, needle } => {
                let needle = fold_case(needle.trim());
                record
                    .text_field(field)
                    .is_some_and(|text| fold_case(&text).contains(&needle))
            }
            Criterion::Equals { field, value } => record
                .text_field(field)
                .is_some_and(|text| text.as_ref() == value.as_str()),
            Criterion::Range { field, min, max } => match record.number_field(field) {
                Some(number) => {
                    min.map_or(true, |lo| number >= lo) && max.map_or(true, |hi| number <= hi)
                }
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    criteria: Vec<Criterion>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn search(self, needle: impl Into<String>) -> Self {
        self.with(Criterion::Search(needle.into()))
    }

    pub fn contains(self, field: &'static str, needle: impl Into<String>) -> Self {
        self.with(Criterion::Contains {
            field,
            needle: needle.into(),
        })
    }

    pub fn equals(self, field: &'static str, value: impl Into<String>) -> Self {
        self.with(Criterion::Equals {
            field,
            value: value.into(),
        })
    }

    pub fn range(self, field: &'static str, min: Option<f64>, max: Option<f64>) -> Self {
        self.with(Criterion::Range { field, min, max })
    }

    /// 沒有任何有效條件
    pub fn is_empty(&self) -> bool {
        self.criteria.iter().all(Criterion::is_absent)
    }

    pub fn active(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter().filter(|c| !c.is_absent())
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.criteria.iter().all(|c| c.matches(record))
    }
}

/// 逐字元轉小寫；`str::to_lowercase` 會依字尾改變 Σ，子字串比對會失準
fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// 穩定篩選，保留輸入順序
pub fn filter<R: Filterable>(records: Vec<R>, criteria: &Criteria) -> Vec<R> {
    if criteria.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// 字串數值解析失敗時回傳 None，對應條件即不存在
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_u64(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 學校列表查詢，同時用於組 API 參數與本地篩選
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchoolQuery {
    pub search: Option<String>,
    pub school_type: Option<String>,
    pub board: Option<String>,
    pub city: Option<String>,
    pub min_fee: Option<u64>,
    pub max_fee: Option<u64>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl SchoolQuery {
    /// 從 URL 或表單字串參數建立，無法解析的值直接略過
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = SchoolQuery::default();
        for (key, value) in params {
            match key {
                "search" => query.search = non_empty(value),
                "school_type" | "type" => query.school_type = non_empty(value),
                "board" => query.board = non_empty(value),
                "city" => query.city = non_empty(value),
                "min_fee" | "minFee" => query.min_fee = parse_u64(value),
                "max_fee" | "maxFee" => query.max_fee = parse_u64(value),
                "limit" => query.limit = value.trim().parse().ok(),
                "page" => query.page = value.trim().parse().ok(),
                other => tracing::debug!("Ignoring unknown school query parameter: {}", other),
            }
        }
        query
    }

    pub fn criteria(&self) -> Criteria {
        let mut criteria = Criteria::new();
        if let Some(search) = &self.search {
            criteria = criteria.search(search.clone());
        }
        if let Some(school_type) = &self.school_type {
            criteria = criteria.equals("type", school_type.clone());
        }
        if let Some(board) = &self.board {
            criteria = criteria.equals("board", board.clone());
        }
        if let Some(city) = &self.city {
            criteria = criteria.contains("city", city.clone());
        }
        criteria.range(
            "annual_fee",
            self.min_fee.map(|fee| fee as f64),
            self.max_fee.map(|fee| fee as f64),
        )
    }

    /// API 查詢參數，空值不送出；limit 夾在 1..=50
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text_params = [
            ("search", &self.search),
            ("school_type", &self.school_type),
            ("board", &self.board),
            ("city", &self.city),
        ];
        for (key, value) in text_params {
            if let Some(value) = value.as_deref().and_then(non_empty) {
                pairs.push((key, value));
            }
        }
        if let Some(min_fee) = self.min_fee {
            pairs.push(("min_fee", min_fee.to_string()));
        }
        if let Some(max_fee) = self.max_fee {
            pairs.push(("max_fee", max_fee.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.max(1).to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.clamp(1, MAX_PAGE_SIZE).to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlumniQuery {
    pub search: Option<String>,
    pub school: Option<String>,
    pub graduation_year: Option<String>,
}

impl AlumniQuery {
    pub fn criteria(&self) -> Criteria {
        Criteria::new()
            .search(self.search.clone().unwrap_or_default())
            .equals("school", self.school.clone().unwrap_or_default())
            .equals(
                "graduation_year",
                self.graduation_year.clone().unwrap_or_default(),
            )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScholarshipQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_amount: Option<u64>,
}

impl ScholarshipQuery {
    pub fn criteria(&self) -> Criteria {
        let category = self
            .category
            .clone()
            .filter(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES))
            .unwrap_or_default();
        Criteria::new()
            .search(self.search.clone().unwrap_or_default())
            .equals("category", category)
            .range("amount", self.min_amount.map(|a| a as f64), None)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl CampaignQuery {
    pub fn criteria(&self) -> Criteria {
        Criteria::new()
            .search(self.search.clone().unwrap_or_default())
            .equals("category", self.category.clone().unwrap_or_default())
    }
}

impl Filterable for School {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.location.city, &self.location.state]
    }

    fn text_field(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => Some(Cow::Borrowed(&self.name)),
            "type" => Some(Cow::Borrowed(self.school_type.as_str())),
            "board" => Some(Cow::Borrowed(self.board.as_str())),
            "city" => Some(Cow::Borrowed(&self.location.city)),
            "state" => Some(Cow::Borrowed(&self.location.state)),
            _ => None,
        }
    }

    fn number_field(&self, field: &str) -> Option<f64> {
        match field {
            "annual_fee" => Some(self.fees.annual_fee as f64),
            "admission_fee" => Some(self.fees.admission_fee as f64),
            "rating" => Some(self.rating),
            "established_year" => self.established_year.map(f64::from),
            _ => None,
        }
    }
}

impl Filterable for Alumnus {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.company, &self.current_position]
    }

    fn text_field(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => Some(Cow::Borrowed(&self.name)),
            "school" => Some(Cow::Borrowed(&self.school)),
            "company" => Some(Cow::Borrowed(&self.company)),
            "graduation_year" => Some(Cow::Owned(self.graduation_year.to_string())),
            "availability" => Some(Cow::Borrowed(&self.availability)),
            _ => None,
        }
    }

    fn number_field(&self, field: &str) -> Option<f64> {
        match field {
            "graduation_year" => Some(f64::from(self.graduation_year)),
            _ => None,
        }
    }
}

impl Filterable for Scholarship {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.provider, &self.eligibility]
    }

    fn text_field(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => Some(Cow::Borrowed(&self.title)),
            "category" => Some(Cow::Borrowed(&self.category)),
            "type" => Some(Cow::Borrowed(&self.scholarship_type)),
            "provider" => Some(Cow::Borrowed(&self.provider)),
            _ => None,
        }
    }

    fn number_field(&self, field: &str) -> Option<f64> {
        match field {
            "amount" => Some(self.amount as f64),
            _ => None,
        }
    }
}

impl Filterable for Campaign {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.school, &self.organizer]
    }

    fn text_field(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => Some(Cow::Borrowed(&self.title)),
            "category" => Some(Cow::Borrowed(&self.category)),
            "school" => Some(Cow::Borrowed(&self.school)),
            _ => None,
        }
    }

    fn number_field(&self, field: &str) -> Option<f64> {
        match field {
            "target_amount" => Some(self.target_amount as f64),
            "raised_amount" => Some(self.raised_amount as f64),
            "days_left" => Some(f64::from(self.days_left)),
            _ => None,
        }
    }
}
