use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RecommendError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RecommendError::InvalidQuery { .. } => ErrorSeverity::Low,
            RecommendError::IoError(_) => ErrorSeverity::Medium,
            RecommendError::SerializationError(_) | RecommendError::CatalogError { .. } => {
                ErrorSeverity::High
            }
            RecommendError::TomlError(_)
            | RecommendError::ConfigError { .. }
            | RecommendError::InvalidConfigValueError { .. }
            | RecommendError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RecommendError::IoError(_) => "檢查菜品資料檔案路徑是否存在且可讀取",
            RecommendError::SerializationError(_) | RecommendError::CatalogError { .. } => {
                "確認菜品資料為 JSON 陣列，且每道菜的欄位型別正確"
            }
            RecommendError::TomlError(_) => "確認設定檔為合法的 TOML 格式",
            RecommendError::ConfigError { .. }
            | RecommendError::InvalidConfigValueError { .. }
            | RecommendError::MissingConfigError { .. } => "修正設定值後重新執行",
            RecommendError::InvalidQuery { .. } => {
                "diseases 與 allergy_mask 必須是非負整數，flavor_preferences 必須是字串陣列"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RecommendError::IoError(e) => format!("無法讀取檔案: {}", e),
            RecommendError::SerializationError(e) => format!("資料格式錯誤: {}", e),
            RecommendError::TomlError(e) => format!("設定檔解析失敗: {}", e),
            RecommendError::ConfigError { message } => format!("設定錯誤: {}", message),
            RecommendError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定欄位 {} 無效: {}", field, reason)
            }
            RecommendError::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            RecommendError::InvalidQuery { message } => format!("查詢格式不正確: {}", message),
            RecommendError::CatalogError { message } => format!("菜品資料無效: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
