use crate::domain::flags::{integral_mask, Allergens, Conditions};
use crate::utils::error::{RecommendError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use strum::{Display, EnumString, VariantArray};

/// 菜品品類，順序即推薦結果的輸出順序
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, VariantArray,
)]
pub enum Category {
    #[strum(to_string = "meat", serialize = "荤菜")]
    Meat,
    #[strum(to_string = "vegetable", serialize = "素菜")]
    Vegetable,
    #[strum(to_string = "soup", serialize = "汤")]
    Soup,
}

impl Category {
    pub fn ordered() -> &'static [Category] {
        Category::VARIANTS
    }
}

/// 位掩碼欄位的原始值；格式錯誤的值保留下來，由安全過濾決定跳過
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaskField {
    Bits(u64),
    Malformed(Value),
}

impl MaskField {
    pub fn bits(&self) -> Option<u64> {
        match self {
            MaskField::Bits(bits) => Some(*bits),
            MaskField::Malformed(Value::Number(number)) => number.as_f64().and_then(integral_mask),
            MaskField::Malformed(_) => None,
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        rename = "disease_blacklist_code",
        alias = "blacklistMask",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub blacklist_mask: Option<MaskField>,

    #[serde(
        rename = "disease_suitable_code",
        alias = "suitableMask",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub suitable_mask: Option<MaskField>,

    #[serde(
        rename = "allergen_mask_code",
        alias = "allergenMask",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allergen_mask: Option<MaskField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<BTreeMap<String, f64>>,

    #[serde(
        rename = "flavor_tags",
        alias = "flavorTags",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub flavor_tags: Option<Vec<String>>,

    #[serde(
        rename = "user_ratings",
        alias = "userRatings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_ratings: Option<Vec<f64>>,

    #[serde(
        rename = "base_score",
        alias = "baseScore",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub base_score: Option<f64>,

    /// 其餘欄位原樣保留，推薦結果回傳完整的原始記錄
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Dish {
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            category: Some(category.into()),
            description: None,
            blacklist_mask: Some(MaskField::Bits(0)),
            suitable_mask: None,
            allergen_mask: Some(MaskField::Bits(0)),
            nutrition: None,
            flavor_tags: None,
            user_ratings: None,
            base_score: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_blacklist(mut self, mask: u64) -> Self {
        self.blacklist_mask = Some(MaskField::Bits(mask));
        self
    }

    pub fn with_suitable(mut self, mask: u64) -> Self {
        self.suitable_mask = Some(MaskField::Bits(mask));
        self
    }

    pub fn with_allergens(mut self, mask: u64) -> Self {
        self.allergen_mask = Some(MaskField::Bits(mask));
        self
    }

    pub fn with_nutrient(mut self, nutrient: impl Into<String>, value: f64) -> Self {
        self.nutrition
            .get_or_insert_with(BTreeMap::new)
            .insert(nutrient.into(), value);
        self
    }

    pub fn with_flavor_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.flavor_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_ratings(mut self, ratings: impl Into<Vec<f64>>) -> Self {
        self.user_ratings = Some(ratings.into());
        self
    }

    pub fn with_base_score(mut self, score: f64) -> Self {
        self.base_score = Some(score);
        self
    }

    /// 用於日誌的顯示名稱
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn has_nutrition(&self) -> bool {
        self.nutrition.as_ref().is_some_and(|n| !n.is_empty())
    }

    pub fn flavor_tags(&self) -> &[String] {
        self.flavor_tags.as_deref().unwrap_or_default()
    }

    /// 推薦碼缺失或格式錯誤時視為 0
    pub fn suitable_conditions(&self) -> Conditions {
        Conditions::from(self.suitable_mask.as_ref().and_then(MaskField::bits).unwrap_or(0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "diseases", alias = "conditionsMask")]
    pub conditions: Conditions,

    #[serde(rename = "allergy_mask", alias = "allergyMask", default)]
    pub allergies: Allergens,

    #[serde(rename = "flavor_preferences", alias = "flavorPreferences", default)]
    pub flavor_preferences: BTreeSet<String>,

    #[serde(
        rename = "health_needs_code",
        alias = "healthNeedsMask",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_needs: Option<Conditions>,
}

impl UserQuery {
    pub fn new(conditions: impl Into<Conditions>) -> Self {
        Self {
            conditions: conditions.into(),
            ..Self::default()
        }
    }

    pub fn with_allergies(mut self, allergies: impl Into<Allergens>) -> Self {
        self.allergies = allergies.into();
        self
    }

    pub fn with_flavor_preferences<I, T>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.flavor_preferences = preferences.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_health_needs(mut self, needs: impl Into<Conditions>) -> Self {
        self.health_needs = Some(needs.into());
        self
    }

    /// 比對推薦碼時使用的需求碼：優先 health_needs，否則為 conditions
    pub fn needs(&self) -> Conditions {
        self.health_needs.unwrap_or(self.conditions)
    }

    /// 從未經型別檢查的請求 JSON 建立查詢
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| RecommendError::InvalidQuery {
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub generated_at: DateTime<Utc>,
    pub query: UserQuery,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_ids: Vec<String>,
    pub dishes: Vec<Dish>,
}

impl RecommendationReport {
    pub fn new(query: UserQuery, excluded_ids: Vec<String>, dishes: Vec<Dish>) -> Self {
        Self {
            generated_at: Utc::now(),
            query,
            excluded_ids,
            dishes,
        }
    }
}
