//! 校友、獎學金、募款活動目前沒有後端資源，使用隨程式附帶的 JSON 資料。
//! 指定 fixtures 目錄時，同名檔案會覆蓋內建資料。

use crate::domain::model::{Alumnus, Campaign, Scholarship};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

pub const ALUMNI_FILE: &str = "alumni.json";
pub const SCHOLARSHIPS_FILE: &str = "scholarships.json";
pub const CAMPAIGNS_FILE: &str = "campaigns.json";

const EMBEDDED_ALUMNI: &str = include_str!("../../fixtures/alumni.json");
const EMBEDDED_SCHOLARSHIPS: &str = include_str!("../../fixtures/scholarships.json");
const EMBEDDED_CAMPAIGNS: &str = include_str!("../../fixtures/campaigns.json");

pub struct FixtureCatalogue<S: Storage> {
    overrides: Option<S>,
}

impl<S: Storage> Default for FixtureCatalogue<S> {
    fn default() -> Self {
        Self { overrides: None }
    }
}

impl<S: Storage> FixtureCatalogue<S> {
    pub fn embedded() -> Self {
        Self::default()
    }

    pub fn with_overrides(storage: S) -> Self {
        Self {
            overrides: Some(storage),
        }
    }

    async fn load<T: DeserializeOwned>(&self, file: &str, embedded: &str) -> Result<Vec<T>> {
        if let Some(storage) = &self.overrides {
            if storage.exists(file) {
                tracing::debug!("Loading {} from fixtures directory", file);
                let data = storage.read_file(file).await?;
                return Ok(serde_json::from_slice(&data)?);
            }
        }
        Ok(serde_json::from_str(embedded)?)
    }

    pub async fn alumni(&self) -> Result<Vec<Alumnus>> {
        self.load(ALUMNI_FILE, EMBEDDED_ALUMNI).await
    }

    pub async fn scholarships(&self) -> Result<Vec<Scholarship>> {
        self.load(SCHOLARSHIPS_FILE, EMBEDDED_SCHOLARSHIPS).await
    }

    pub async fn campaigns(&self) -> Result<Vec<Campaign>> {
        self.load(CAMPAIGNS_FILE, EMBEDDED_CAMPAIGNS).await
    }
}
