use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 學校類型，未知字串原樣保留
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchoolType {
    DaySchool,
    BoardingSchool,
    PlaySchool,
    PuCollege,
    Other(String),
}

impl SchoolType {
    pub fn as_str(&self) -> &str {
        match self {
            SchoolType::DaySchool => "Day School",
            SchoolType::BoardingSchool => "Boarding School",
            SchoolType::PlaySchool => "Play School",
            SchoolType::PuCollege => "PU College",
            SchoolType::Other(s) => s,
        }
    }
}

impl From<String> for SchoolType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Day School" => SchoolType::DaySchool,
            "Boarding School" => SchoolType::BoardingSchool,
            "Play School" => SchoolType::PlaySchool,
            "PU College" => SchoolType::PuCollege,
            _ => SchoolType::Other(value),
        }
    }
}

impl From<&str> for SchoolType {
    fn from(value: &str) -> Self {
        SchoolType::from(value.to_string())
    }
}

impl From<SchoolType> for String {
    fn from(value: SchoolType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 課程體系，例如 "Karnataka PUC" 會落在 Other
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Board {
    Cbse,
    Icse,
    Ib,
    StateBoard,
    Other(String),
}

impl Board {
    pub fn as_str(&self) -> &str {
        match self {
            Board::Cbse => "CBSE",
            Board::Icse => "ICSE",
            Board::Ib => "IB",
            Board::StateBoard => "State Board",
            Board::Other(s) => s,
        }
    }
}

impl From<String> for Board {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CBSE" => Board::Cbse,
            "ICSE" => Board::Icse,
            "IB" => Board::Ib,
            "State Board" => Board::StateBoard,
            _ => Board::Other(value),
        }
    }
}

impl From<&str> for Board {
    fn from(value: &str) -> Self {
        Board::from(value.to_string())
    }
}

impl From<Board> for String {
    fn from(value: Board) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fees {
    #[serde(default)]
    pub annual_fee: u64,
    #[serde(default)]
    pub admission_fee: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub school_type: SchoolType,
    pub board: Board,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub fees: Fees,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub admission_info: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub established_year: Option<i32>,
    #[serde(default)]
    pub website: Option<String>,
}

impl School {
    /// 頂層 website 優先，其次是聯絡資訊中的網址
    pub fn website_url(&self) -> Option<&str> {
        self.website
            .as_deref()
            .or(self.contact.website.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    pub fn place(&self) -> String {
        match (self.location.city.is_empty(), self.location.state.is_empty()) {
            (false, false) => format!("{}, {}", self.location.city, self.location.state),
            (false, true) => self.location.city.clone(),
            (true, false) => self.location.state.clone(),
            (true, true) => String::new(),
        }
    }
}

/// `GET /api/schools` 回應，分頁欄位可能不存在
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolPage {
    #[serde(default)]
    pub schools: Vec<School>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub school_types: Vec<String>,
    #[serde(default)]
    pub boards: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
}

impl FilterOptions {
    /// 從已取得的學校清單計算選項，保持首次出現順序
    pub fn from_schools(schools: &[School]) -> Self {
        let mut options = FilterOptions::default();
        for school in schools {
            push_distinct(&mut options.school_types, school.school_type.as_str());
            push_distinct(&mut options.boards, school.board.as_str());
            if !school.location.city.is_empty() {
                push_distinct(&mut options.cities, &school.location.city);
            }
        }
        options
    }
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alumnus {
    pub id: String,
    pub name: String,
    pub school: String,
    pub graduation_year: i32,
    pub current_position: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub linked_in: Option<String>,
    #[serde(default)]
    pub availability: String,
}

pub const MENTORING_AVAILABLE: &str = "Available for mentoring";

impl Alumnus {
    pub fn is_available_for_mentoring(&self) -> bool {
        self.availability == MENTORING_AVAILABLE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlumniFacets {
    pub schools: Vec<String>,
    pub graduation_years: Vec<i32>,
    pub available_mentors: usize,
}

impl AlumniFacets {
    pub fn from_alumni(alumni: &[Alumnus]) -> Self {
        let mut facets = AlumniFacets::default();
        for alumnus in alumni {
            push_distinct(&mut facets.schools, &alumnus.school);
            if !facets.graduation_years.contains(&alumnus.graduation_year) {
                facets.graduation_years.push(alumnus.graduation_year);
            }
            if alumnus.is_available_for_mentoring() {
                facets.available_mentors += 1;
            }
        }
        facets.graduation_years.sort_by(|a, b| b.cmp(a));
        facets
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: String,
    pub title: String,
    pub provider: String,
    pub amount: u64,
    #[serde(rename = "type")]
    pub scholarship_type: String,
    pub category: String,
    #[serde(default)]
    pub eligibility: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub apply_url: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// 篩選時代表「全部類別」的值
pub const ALL_CATEGORIES: &str = "all";

pub const SCHOLARSHIP_CATEGORIES: &[&str] = &["academic", "gender", "sports", "minority", "rural"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    Expired,
    Urgent(i64),
    Active(i64),
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineStatus::Expired => f.write_str("Expired"),
            DeadlineStatus::Urgent(days) | DeadlineStatus::Active(days) => {
                write!(f, "{} days left", days)
            }
        }
    }
}

impl Scholarship {
    /// 截止日當天仍算 0 天，7 天內為 Urgent
    pub fn deadline_status(&self, today: NaiveDate) -> DeadlineStatus {
        let days = (self.deadline - today).num_days();
        if days < 0 {
            DeadlineStatus::Expired
        } else if days <= 7 {
            DeadlineStatus::Urgent(days)
        } else {
            DeadlineStatus::Active(days)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignUpdate {
    pub date: NaiveDate,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub school: String,
    #[serde(default)]
    pub organizer: String,
    pub target_amount: u64,
    #[serde(default)]
    pub raised_amount: u64,
    #[serde(default)]
    pub donors: u32,
    #[serde(default)]
    pub days_left: u32,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub story: String,
    #[serde(default)]
    pub updates: Vec<CampaignUpdate>,
}

pub const CAMPAIGN_CATEGORIES: &[&str] = &[
    "Infrastructure",
    "Equipment",
    "Scholarships",
    "Sports",
    "Technology",
    "Books",
    "Other",
];

impl Campaign {
    /// 募款進度，上限 100
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount == 0 {
            return 0.0;
        }
        let percent = self.raised_amount as f64 / self.target_amount as f64 * 100.0;
        percent.min(100.0)
    }
}

/// 新募款活動的表單內容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub school: String,
    pub target_amount: u64,
    pub category: String,
    pub story: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// `POST /api/loans/apply` 的請求內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub user_id: String,
    pub school_id: String,
    pub student_name: String,
    pub student_age: u32,
    pub class_applying_for: String,
    pub loan_amount: u64,
    pub family_income: u64,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// 伺服器端保存的申請紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: String,
    #[serde(flatten)]
    pub application: LoanApplication,
    pub status: LoanStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanReceipt {
    pub message: String,
    pub application_id: String,
}
