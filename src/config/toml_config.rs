use crate::core::{ConfigProvider, UserQuery};
use crate::utils::error::{RecommendError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_FORMATS: [&str; 2] = ["compact", "json"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 用戶檔案：菜品目錄位置、查詢條件與日誌設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub catalog: Option<CatalogConfig>,
    #[serde(default)]
    pub query: QueryConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub conditions: u64,
    #[serde(default)]
    pub allergies: u64,
    #[serde(default)]
    pub flavor_preferences: Vec<String>,
    pub health_needs: Option<u64>,
    #[serde(default)]
    pub exclude_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl ProfileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${CATALOG_PATH})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| RecommendError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .is_some_and(|format| format == "json")
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl Validate for ProfileConfig {
    fn validate(&self) -> Result<()> {
        let catalog = validate_required_field("catalog", &self.catalog)?;
        validate_path("catalog.path", &catalog.path)?;

        for flavor in &self.query.flavor_preferences {
            validate_non_empty_string("query.flavor_preferences", flavor)?;
        }
        for id in &self.query.exclude_ids {
            validate_non_empty_string("query.exclude_ids", id)?;
        }

        if let Some(logging) = &self.logging {
            if let Some(format) = &logging.format {
                validate_one_of("logging.format", format, &LOG_FORMATS)?;
            }
            if let Some(level) = &logging.level {
                validate_one_of("logging.level", level, &LOG_LEVELS)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for ProfileConfig {
    fn catalog_path(&self) -> &str {
        self.catalog.as_ref().map_or("", |c| c.path.as_str())
    }

    fn query(&self) -> UserQuery {
        let query = UserQuery::new(self.query.conditions)
            .with_allergies(self.query.allergies)
            .with_flavor_preferences(self.query.flavor_preferences.iter().cloned());
        match self.query.health_needs {
            Some(needs) => query.with_health_needs(needs),
            None => query,
        }
    }

    fn excluded_ids(&self) -> &[String] {
        &self.query.exclude_ids
    }
}
