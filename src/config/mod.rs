#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::{DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::core::filter::MAX_PAGE_SIZE;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use std::time::Duration;
use toml_config::{TomlConfig, DEFAULT_PAGE_SIZE};

/// 合併後的設定：命令列 > TOML > 預設值
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_endpoint: String,
    pub timeout_seconds: u64,
    pub page_size: u32,
    pub fixtures_path: Option<String>,
    pub output_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_BACKEND_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            page_size: DEFAULT_PAGE_SIZE,
            fixtures_path: None,
            output_path: None,
        }
    }
}

/// 命令列可覆蓋的欄位
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub fixtures_path: Option<String>,
}

impl Settings {
    pub fn resolve(file: Option<&TomlConfig>, overrides: Overrides) -> Self {
        let mut settings = Settings::default();

        if let Some(file) = file {
            settings.api_endpoint = file.api_endpoint().to_string();
            settings.timeout_seconds = file.request_timeout().as_secs();
            settings.page_size = file.page_size();
            settings.fixtures_path = file.fixtures_path().map(str::to_string);
            settings.output_path = file.output_path().map(str::to_string);
        }

        if let Some(endpoint) = overrides.api_endpoint {
            settings.api_endpoint = endpoint;
        }
        if let Some(timeout) = overrides.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(path) = overrides.fixtures_path {
            settings.fixtures_path = Some(path);
        }

        settings
    }
}

impl ConfigProvider for Settings {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn fixtures_path(&self) -> Option<&str> {
        self.fixtures_path.as_deref()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_range("page_size", self.page_size, 1, MAX_PAGE_SIZE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_file() {
        let file = TomlConfig::from_toml_str(
            r#"
[api]
endpoint = "http://file.example:8001"
timeout_seconds = 30

[fixtures]
path = "/srv/fixtures"
"#,
        )
        .unwrap();

        let settings = Settings::resolve(
            Some(&file),
            Overrides {
                api_endpoint: Some("http://cli.example:9000".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(settings.api_endpoint, "http://cli.example:9000");
        assert_eq!(settings.timeout_seconds, 30);
        assert_eq!(settings.fixtures_path.as_deref(), Some("/srv/fixtures"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::resolve(None, Overrides::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_endpoint(), "http://localhost:8001");
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let settings = Settings {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
