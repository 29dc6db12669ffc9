// Adapters layer: concrete implementations for external systems (http api, local storage, fixtures).

pub mod export;
pub mod fixtures;
pub mod http;
pub mod storage;
