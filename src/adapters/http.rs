use crate::core::filter::SchoolQuery;
use crate::domain::model::{
    FilterOptions, Health, LoanApplication, LoanReceipt, LoanRecord, School, SchoolPage,
};
use crate::domain::ports::{ConfigProvider, SchoolApi};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// reqwest 實作的 SchoolDekho API 客戶端
#[derive(Debug, Clone)]
pub struct HttpSchoolApi {
    base_url: String,
    client: Client,
}

impl HttpSchoolApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_endpoint(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();
        tracing::debug!("API response status: {} ({})", status, url);

        if !status.is_success() {
            return Err(AppError::ApiStatusError {
                status: status.as_u16(),
                url,
            });
        }

        // 先取文字再解析，錯誤訊息可以帶出 serde 的位置資訊
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl SchoolApi for HttpSchoolApi {
    async fn list_schools(&self, query: &SchoolQuery) -> Result<SchoolPage> {
        let url = self.url("/api/schools");
        let pairs = query.query_pairs();
        tracing::debug!("Making API request to: {} {:?}", url, pairs);
        let response = self.client.get(&url).query(&pairs).send().await?;
        Self::decode(response).await
    }

    async fn get_school(&self, id: &str) -> Result<School> {
        self.get_json(&format!("/api/schools/{}", id)).await
    }

    async fn compare_schools(&self, ids: &[String]) -> Result<Vec<School>> {
        let url = self.url("/api/schools/compare");
        tracing::debug!("Comparing {} schools via {}", ids.len(), url);
        let response = self.client.post(&url).json(ids).send().await?;
        let page: SchoolPage = Self::decode(response).await?;
        Ok(page.schools)
    }

    async fn apply_loan(&self, application: &LoanApplication) -> Result<LoanReceipt> {
        let url = self.url("/api/loans/apply");
        tracing::debug!("Submitting loan application for school {}", application.school_id);
        let response = self.client.post(&url).json(application).send().await?;
        Self::decode(response).await
    }

    async fn user_loans(&self, user_id: &str) -> Result<Vec<LoanRecord>> {
        self.get_json(&format!("/api/loans/{}", user_id)).await
    }

    async fn filter_options(&self) -> Result<FilterOptions> {
        self.get_json("/api/filters/options").await
    }

    async fn health(&self) -> Result<Health> {
        self.get_json("/api/health").await
    }
}
