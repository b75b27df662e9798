pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::catalog::{CatalogSummary, JsonCatalog};
pub use adapters::diagnostics::{MemoryDiagnostics, TracingDiagnostics};
pub use config::{cli::LocalStorage, toml_config::ProfileConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::engine::RecommendationEngine;
pub use utils::error::{RecommendError, Result};
