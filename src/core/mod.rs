pub mod compare;
pub mod directory;
pub mod filter;
pub mod forms;

pub use crate::domain::model::{Alumnus, Campaign, LoanApplication, Scholarship, School};
pub use crate::domain::ports::{ConfigProvider, SchoolApi, Storage};
pub use crate::utils::error::Result;
