use crate::domain::model::{Dish, UserQuery};
use crate::utils::error::Result;
use async_trait::async_trait;
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DiagnosticEvent {
    MalformedMask,
    MissingCategory,
    UnknownCategory,
    MissingNutritionData,
    EmptyCategory,
    InvalidQuery,
}

/// 接收推薦過程中的非致命警告
pub trait Diagnostics: Send + Sync {
    fn warn(&self, event: DiagnosticEvent, context: &str);
}

impl<T: Diagnostics + ?Sized> Diagnostics for &T {
    fn warn(&self, event: DiagnosticEvent, context: &str) {
        (**self).warn(event, context)
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load_catalog(&self) -> Result<Vec<Dish>>;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_path(&self) -> &str;
    fn query(&self) -> UserQuery;
    fn excluded_ids(&self) -> &[String];
}
