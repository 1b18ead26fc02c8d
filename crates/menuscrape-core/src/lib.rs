pub mod app_config;
pub mod config;
pub mod menu;
pub mod profiles;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use menu::{AddOnGroup, AddOnOption, CanonicalMenuItem, ObjectId};
pub use profiles::{
    builtin_profiles, load_profiles, BadgeAddOn, BadgeLabel, BrandIdScope, CategoryLayout,
    CategoryRule, DefaultAddOns, DietaryRule, DietaryTag, DomSelectors, ImagePoolConfig,
    InteractiveConfig, KeywordTag, NameFilter, NameRemap, OptionSetExpansion, PortionRule,
    ProfileSet, RestaurantSelectors, SiteProfile, SizeGroupRule, SpiceRule, StrategyKind,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site profiles file {path}: {source}")]
    ProfilesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site profiles file: {0}")]
    ProfilesFileParse(#[source] serde_yaml::Error),

    #[error("site profile validation failed: {0}")]
    Validation(String),
}
