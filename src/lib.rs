pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{fixtures::FixtureCatalogue, http::HttpSchoolApi, storage::LocalStorage};
pub use config::{toml_config::TomlConfig, Settings};
pub use core::{
    compare::{build_comparison, default_field_specs, ComparisonSet, Table},
    directory::SchoolDirectory,
    filter::{filter, Criteria, Criterion, SchoolQuery},
};
pub use utils::error::{AppError, Result};
