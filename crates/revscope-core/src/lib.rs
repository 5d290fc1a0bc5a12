pub mod app_config;
pub mod config;
pub mod reviews;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use reviews::{
    ClassFilter, Limits, PageError, PageWindow, Review, NEGATIVE_CLASS, POSITIVE_CLASS, REVIEW_CAP,
    SIMILARITY_THRESHOLD, TOP_WORDS_CAP,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
