//! API 與本地篩選的組合。讀取失敗只記錄日誌並回傳空結果，
//! 表單送出失敗則回傳錯誤給呼叫端顯示通用訊息。

use crate::adapters::fixtures::FixtureCatalogue;
use crate::core::compare::{ComparisonSet, FieldSpec, Table, MAX_COMPARE, MIN_COMPARE};
use crate::core::filter::{
    filter, AlumniQuery, CampaignQuery, ScholarshipQuery, SchoolQuery, MAX_PAGE_SIZE,
};
use crate::domain::model::{
    AlumniFacets, Alumnus, Campaign, FilterOptions, Health, LoanApplication, LoanReceipt,
    LoanRecord, Scholarship, School,
};
use crate::domain::ports::{SchoolApi, Storage};
use crate::utils::error::{AppError, ErrorCategory, Result};
use crate::utils::validation::Validate;

pub const MAX_SEARCH_PAGES: u32 = 10;
pub const LOAN_SUBMITTED: &str = "Loan application submitted successfully!";
pub const LOAN_SUBMISSION_FAILED: &str = "Error submitting application. Please try again.";

/// 表單內容有誤時說明哪個欄位，其餘失敗一律顯示通用訊息
pub fn submission_failure_message(err: &AppError) -> String {
    match err.category() {
        ErrorCategory::Input => err.user_friendly_message(),
        _ => LOAN_SUBMISSION_FAILED.to_string(),
    }
}

pub struct SchoolDirectory<A: SchoolApi, S: Storage> {
    api: A,
    fixtures: FixtureCatalogue<S>,
}

impl<A: SchoolApi, S: Storage> SchoolDirectory<A, S> {
    pub fn new(api: A, fixtures: FixtureCatalogue<S>) -> Self {
        Self { api, fixtures }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 伺服器不一定處理所有參數（例如 search），取回後再套用一次本地篩選。
    /// 有搜尋字且未指定頁碼時，逐頁掃描（最多 [`MAX_SEARCH_PAGES`] 頁）再截到 limit。
    pub async fn schools(&self, query: &SchoolQuery) -> Vec<School> {
        let criteria = query.criteria();
        let scan = query.page.is_none()
            && query.search.as_deref().is_some_and(|s| !s.trim().is_empty());

        let mut page_query = query.clone();
        let mut page_no = 1;
        let mut schools = Vec::new();
        loop {
            if scan {
                page_query.page = Some(page_no);
            }
            let page = match self.api.list_schools(&page_query).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("Error fetching schools (page {}): {}", page_no, e);
                    break;
                }
            };
            let fetched = page.schools.len();
            let last_page = page.pages.unwrap_or(1).min(MAX_SEARCH_PAGES);
            schools.extend(filter(page.schools, &criteria));
            tracing::debug!("Fetched {} schools, {} kept so far", fetched, schools.len());

            if !scan || fetched == 0 || page_no >= last_page {
                break;
            }
            page_no += 1;
        }

        if scan {
            if let Some(limit) = query.limit {
                schools.truncate(limit.clamp(1, MAX_PAGE_SIZE) as usize);
            }
        }
        schools
    }

    pub async fn school(&self, id: &str) -> Option<School> {
        match self.api.get_school(id).await {
            Ok(school) => Some(school),
            Err(e) => {
                tracing::error!("Error fetching school {}: {}", id, e);
                None
            }
        }
    }

    /// 先走比較端點，失敗時逐筆取回；維持呼叫端給的順序
    pub async fn compare(&self, ids: &[String], field_specs: &[FieldSpec]) -> Result<Table> {
        if ids.len() < MIN_COMPARE || ids.len() > MAX_COMPARE {
            return Err(AppError::ComparisonError {
                message: format!(
                    "Select between {} and {} schools to compare (got {})",
                    MIN_COMPARE,
                    MAX_COMPARE,
                    ids.len()
                ),
            });
        }

        let fetched = match self.api.compare_schools(ids).await {
            Ok(schools) => schools,
            Err(e) => {
                tracing::warn!("Compare endpoint failed, fetching schools one by one: {}", e);
                let mut schools = Vec::new();
                for id in ids {
                    if let Some(school) = self.school(id).await {
                        schools.push(school);
                    }
                }
                schools
            }
        };

        let mut selection = ComparisonSet::new();
        for id in ids {
            match fetched.iter().find(|s| &s.id == id) {
                Some(school) => selection.add(school.clone())?,
                None => tracing::warn!("School {} not found, skipping", id),
            }
        }
        selection.table(field_specs)
    }

    pub async fn submit_loan(&self, application: &LoanApplication) -> Result<LoanReceipt> {
        application.validate()?;
        match self.api.apply_loan(application).await {
            Ok(receipt) => {
                tracing::info!("Loan application {} submitted", receipt.application_id);
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("Error submitting loan application: {}", e);
                Err(e)
            }
        }
    }

    pub async fn loans(&self, user_id: &str) -> Vec<LoanRecord> {
        self.api.user_loans(user_id).await.unwrap_or_else(|e| {
            tracing::error!("Error fetching loan applications: {}", e);
            Vec::new()
        })
    }

    /// 選項端點不可用時，以目前的學校清單計算
    pub async fn filter_options(&self) -> FilterOptions {
        match self.api.filter_options().await {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!("Error fetching filter options, deriving locally: {}", e);
                let query = SchoolQuery {
                    limit: Some(MAX_PAGE_SIZE),
                    ..Default::default()
                };
                FilterOptions::from_schools(&self.schools(&query).await)
            }
        }
    }

    pub async fn health(&self) -> Option<Health> {
        match self.api.health().await {
            Ok(health) => Some(health),
            Err(e) => {
                tracing::error!("Health check failed: {}", e);
                None
            }
        }
    }

    pub async fn alumni(&self, query: &AlumniQuery) -> Vec<Alumnus> {
        match self.fixtures.alumni().await {
            Ok(alumni) => filter(alumni, &query.criteria()),
            Err(e) => {
                tracing::error!("Error loading alumni: {}", e);
                Vec::new()
            }
        }
    }

    /// 篩選條件只影響列表，facets 以完整名單計算
    pub async fn alumni_facets(&self) -> AlumniFacets {
        match self.fixtures.alumni().await {
            Ok(alumni) => AlumniFacets::from_alumni(&alumni),
            Err(e) => {
                tracing::error!("Error loading alumni: {}", e);
                AlumniFacets::default()
            }
        }
    }

    pub async fn scholarships(&self, query: &ScholarshipQuery) -> Vec<Scholarship> {
        match self.fixtures.scholarships().await {
            Ok(scholarships) => filter(scholarships, &query.criteria()),
            Err(e) => {
                tracing::error!("Error loading scholarships: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn campaigns(&self, query: &CampaignQuery) -> Vec<Campaign> {
        match self.fixtures.campaigns().await {
            Ok(campaigns) => filter(campaigns, &query.criteria()),
            Err(e) => {
                tracing::error!("Error loading campaigns: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::core::compare::default_field_specs;
    use crate::domain::model::SchoolPage;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn school(id: &str, name: &str) -> School {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "type": "Day School",
            "board": "CBSE",
            "location": {"city": "Delhi", "state": "Delhi"},
            "fees": {"annual_fee": 150000, "admission_fee": 25000}
        }))
        .unwrap()
    }

    fn unavailable() -> AppError {
        AppError::ApiStatusError {
            status: 500,
            url: "http://mock/api".to_string(),
        }
    }

    #[derive(Clone, Default)]
    struct MockApi {
        schools: Vec<School>,
        fail: bool,
        compare_fails: bool,
        submitted: Arc<Mutex<Vec<LoanApplication>>>,
    }

    #[async_trait]
    impl SchoolApi for MockApi {
        async fn list_schools(&self, _query: &SchoolQuery) -> Result<SchoolPage> {
            if self.fail {
                return Err(unavailable());
            }
            Ok(SchoolPage {
                schools: self.schools.clone(),
                ..Default::default()
            })
        }

        async fn get_school(&self, id: &str) -> Result<School> {
            if self.fail {
                return Err(unavailable());
            }
            self.schools
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or(AppError::ApiStatusError {
                    status: 404,
                    url: format!("http://mock/api/schools/{}", id),
                })
        }

        async fn compare_schools(&self, ids: &[String]) -> Result<Vec<School>> {
            if self.fail || self.compare_fails {
                return Err(unavailable());
            }
            Ok(self
                .schools
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect())
        }

        async fn apply_loan(&self, application: &LoanApplication) -> Result<LoanReceipt> {
            if self.fail {
                return Err(unavailable());
            }
            self.submitted.lock().await.push(application.clone());
            Ok(LoanReceipt {
                message: "Loan application submitted successfully".to_string(),
                application_id: "loan-1".to_string(),
            })
        }

        async fn user_loans(&self, _user_id: &str) -> Result<Vec<LoanRecord>> {
            Err(unavailable())
        }

        async fn filter_options(&self) -> Result<FilterOptions> {
            Err(unavailable())
        }

        async fn health(&self) -> Result<Health> {
            Err(unavailable())
        }
    }

    fn directory(api: MockApi) -> SchoolDirectory<MockApi, LocalStorage> {
        SchoolDirectory::new(api, FixtureCatalogue::embedded())
    }

    #[tokio::test]
    async fn test_schools_applies_local_search() {
        let api = MockApi {
            schools: vec![school("1", "Delhi Public School"), school("2", "Doon School")],
            ..Default::default()
        };
        let query = SchoolQuery {
            search: Some("doon".to_string()),
            ..Default::default()
        };
        let schools = directory(api).schools(&query).await;
        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].id, "2");
    }

    #[tokio::test]
    async fn test_fetch_errors_become_empty_results() {
        let dir = directory(MockApi {
            fail: true,
            ..Default::default()
        });
        assert!(dir.schools(&SchoolQuery::default()).await.is_empty());
        assert!(dir.school("1").await.is_none());
        assert!(dir.loans("temp-user-id").await.is_empty());
        assert!(dir.health().await.is_none());
        assert_eq!(dir.filter_options().await, FilterOptions::default());
    }

    #[tokio::test]
    async fn test_filter_options_fall_back_to_school_list() {
        let mut doon = school("2", "Doon School");
        doon.location.city = "Dehradun".to_string();
        let dir = directory(MockApi {
            schools: vec![school("1", "DPS"), doon],
            ..Default::default()
        });
        let options = dir.filter_options().await;
        assert_eq!(options.cities, vec!["Delhi", "Dehradun"]);
        assert_eq!(options.boards, vec!["CBSE"]);
    }

    #[tokio::test]
    async fn test_compare_keeps_requested_order_and_falls_back() {
        let dir = directory(MockApi {
            schools: vec![school("1", "DPS"), school("2", "Doon"), school("3", "KV")],
            compare_fails: true,
            ..Default::default()
        });
        let ids = vec!["3".to_string(), "1".to_string()];
        let table = dir.compare(&ids, &default_field_specs()).await.unwrap();
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["KV", "DPS"]);
    }

    #[tokio::test]
    async fn test_compare_requires_two_found_schools() {
        let dir = directory(MockApi {
            schools: vec![school("1", "DPS")],
            ..Default::default()
        });
        let ids = vec!["1".to_string(), "missing".to_string()];
        assert!(dir.compare(&ids, &default_field_specs()).await.is_err());

        let too_many: Vec<String> = (1..=4).map(|i| i.to_string()).collect();
        assert!(dir.compare(&too_many, &default_field_specs()).await.is_err());
    }

    #[tokio::test]
    async fn test_submit_loan_validates_before_sending() {
        let api = MockApi::default();
        let submitted = api.submitted.clone();
        let dir = directory(api);

        let mut application = LoanApplication {
            user_id: "temp-user-id".to_string(),
            school_id: "1".to_string(),
            student_name: String::new(),
            student_age: 12,
            class_applying_for: "Class 7".to_string(),
            loan_amount: 80000,
            family_income: 400000,
            documents: vec![],
        };
        assert!(dir.submit_loan(&application).await.is_err());
        assert!(submitted.lock().await.is_empty());

        application.student_name = "Ishita Rao".to_string();
        let receipt = dir.submit_loan(&application).await.unwrap();
        assert_eq!(receipt.application_id, "loan-1");
        assert_eq!(submitted.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_shows_generic_message() {
        let api = MockApi {
            fail: true,
            ..Default::default()
        };
        let submitted = api.submitted.clone();
        let dir = directory(api);

        let application = LoanApplication {
            user_id: "temp-user-id".to_string(),
            school_id: "1".to_string(),
            student_name: "Ishita Rao".to_string(),
            student_age: 12,
            class_applying_for: "Class 7".to_string(),
            loan_amount: 80000,
            family_income: 400000,
            documents: vec![],
        };
        let err = dir.submit_loan(&application).await.unwrap_err();
        assert!(matches!(err, AppError::ApiStatusError { status: 500, .. }));
        assert_eq!(submission_failure_message(&err), LOAN_SUBMISSION_FAILED);
        assert!(submitted.lock().await.is_empty());

        let invalid = LoanApplication {
            loan_amount: 0,
            ..application
        };
        let err = dir.submit_loan(&invalid).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(
            submission_failure_message(&err),
            "Invalid loan amount: Value must be at least 1"
        );
    }

    #[tokio::test]
    async fn test_catalogue_queries() {
        let dir = directory(MockApi::default());

        let mentors = dir
            .alumni(&AlumniQuery {
                search: Some("goldman".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(mentors.len(), 1);
        assert_eq!(mentors[0].name, "Arjun Patel");

        let facets = dir.alumni_facets().await;
        assert_eq!(facets.graduation_years.first(), Some(&2016));
        assert_eq!(facets.available_mentors, 4);

        let sports = dir
            .scholarships(&ScholarshipQuery {
                category: Some("sports".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(sports.len(), 1);

        let all = dir.scholarships(&ScholarshipQuery::default()).await;
        assert_eq!(all.len(), 5);

        let equipment = dir
            .campaigns(&CampaignQuery {
                category: Some("Equipment".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(equipment[0].title, "Science Lab Equipment Fund");
    }
}
