pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, UserQuery};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "dish-recommender")]
#[command(about = "Recommend one safe dish per category for a diner's health profile")]
pub struct CliConfig {
    #[arg(long, default_value = "dishes.json", help = "Path to the JSON dish catalog")]
    pub catalog: String,

    #[arg(long, help = "TOML profile; replaces the query and catalog flags")]
    pub profile: Option<String>,

    #[arg(long, default_value_t = 0, help = "Condition bitmask (1 diabetes, 2 hypertension, 4 gout, ...)")]
    pub conditions: u64,

    #[arg(long, default_value_t = 0, help = "Allergen bitmask")]
    pub allergies: u64,

    #[arg(long, value_delimiter = ',', help = "Preferred flavor tags, comma separated")]
    pub flavors: Vec<String>,

    #[arg(long, help = "Health needs bitmask used for suitability matching")]
    pub health_needs: Option<u64>,

    #[arg(long, value_delimiter = ',', help = "Dish ids already recommended")]
    pub exclude: Vec<String>,

    #[arg(long, help = "Print catalog statistics instead of recommending")]
    pub diagnose: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_path("catalog", &self.catalog)?;
        if let Some(profile) = &self.profile {
            validate_path("profile", profile)?;
        }
        for flavor in &self.flavors {
            validate_non_empty_string("flavors", flavor)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn catalog_path(&self) -> &str {
        &self.catalog
    }

    fn query(&self) -> UserQuery {
        let query = UserQuery::new(self.conditions)
            .with_allergies(self.allergies)
            .with_flavor_preferences(self.flavors.iter().map(|f| f.trim()));
        match self.health_needs {
            Some(needs) => query.with_health_needs(needs),
            None => query,
        }
    }

    fn excluded_ids(&self) -> &[String] {
        &self.exclude
    }
}
