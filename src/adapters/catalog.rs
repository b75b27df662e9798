use crate::domain::flags::Conditions;
use crate::domain::model::{Dish, MaskField};
use crate::domain::ports::{CatalogSource, Storage};
use crate::utils::error::{RecommendError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

const SAMPLE_SIZE: usize = 5;

/// 從 Storage 讀取 JSON 陣列格式的菜品目錄
pub struct JsonCatalog<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> JsonCatalog<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> CatalogSource for JsonCatalog<S> {
    async fn load_catalog(&self) -> Result<Vec<Dish>> {
        tracing::debug!("Reading dish catalog from {}", self.path);
        let bytes = self.storage.read_file(&self.path).await?;
        parse_catalog(&bytes)
    }
}

/// 解析菜品目錄；無法解碼的單筆記錄跳過並記錄警告
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Dish>> {
    let document: Value = serde_json::from_slice(bytes)?;
    let Value::Array(entries) = document else {
        return Err(RecommendError::CatalogError {
            message: "catalog must be a JSON array of dishes".to_string(),
        });
    };

    let total = entries.len();
    let mut dishes = Vec::with_capacity(total);
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Dish>(entry) {
            Ok(dish) => dishes.push(dish),
            Err(e) => tracing::warn!("⚠️ Skipping catalog entry #{}: {}", index, e),
        }
    }

    tracing::info!("📦 Loaded {} of {} catalog entries", dishes.len(), total);
    Ok(dishes)
}

/// 菜品目錄統計，用於診斷資料品質
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub total_dishes: usize,
    pub with_nutrition: usize,
    pub without_nutrition: usize,
    pub per_category: BTreeMap<String, usize>,
    pub blacklist_codes: BTreeMap<u64, usize>,
    pub suitable_codes: BTreeMap<u64, usize>,
    pub suitable_by_condition: BTreeMap<String, usize>,
    pub sample_dishes: Vec<Dish>,
}

impl CatalogSummary {
    pub fn from_dishes(dishes: &[Dish]) -> Self {
        let mut summary = CatalogSummary {
            total_dishes: dishes.len(),
            sample_dishes: dishes.iter().take(SAMPLE_SIZE).cloned().collect(),
            ..Self::default()
        };

        for dish in dishes {
            if dish.has_nutrition() {
                summary.with_nutrition += 1;
            } else {
                summary.without_nutrition += 1;
            }

            let label = dish.category.as_deref().unwrap_or("uncategorized");
            *summary.per_category.entry(label.to_string()).or_default() += 1;

            if let Some(code) = dish.blacklist_mask.as_ref().and_then(MaskField::bits) {
                *summary.blacklist_codes.entry(code).or_default() += 1;
            }
            if let Some(code) = dish.suitable_mask.as_ref().and_then(MaskField::bits) {
                *summary.suitable_codes.entry(code).or_default() += 1;
            }
        }

        for (name, flag) in Conditions::all().iter_names() {
            let count = dishes
                .iter()
                .filter(|dish| dish.suitable_conditions().intersects(flag))
                .count();
            let key = format!("{}({})", name.to_lowercase(), flag.bits());
            summary.suitable_by_condition.insert(key, count);
        }

        summary
    }
}
