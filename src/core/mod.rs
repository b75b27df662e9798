pub mod engine;
pub mod flavor;
pub mod safety;
pub mod scoring;
pub mod selector;

pub use crate::domain::model::{Category, Dish, UserQuery};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, DiagnosticEvent, Diagnostics, Storage};
pub use crate::utils::error::Result;
