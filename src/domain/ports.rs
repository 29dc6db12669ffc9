use crate::core::filter::SchoolQuery;
use crate::domain::model::{
    FilterOptions, Health, LoanApplication, LoanReceipt, LoanRecord, School, SchoolPage,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> bool;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn page_size(&self) -> u32;
    fn fixtures_path(&self) -> Option<&str>;
}

/// 外部 SchoolDekho REST API
#[async_trait]
pub trait SchoolApi: Send + Sync {
    async fn list_schools(&self, query: &SchoolQuery) -> Result<SchoolPage>;
    async fn get_school(&self, id: &str) -> Result<School>;
    async fn compare_schools(&self, ids: &[String]) -> Result<Vec<School>>;
    async fn apply_loan(&self, application: &LoanApplication) -> Result<LoanReceipt>;
    async fn user_loans(&self, user_id: &str) -> Result<Vec<LoanRecord>>;
    async fn filter_options(&self) -> Result<FilterOptions>;
    async fn health(&self) -> Result<Health>;
}
