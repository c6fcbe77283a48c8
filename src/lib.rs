pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use adapters::HttpProviderClient;
pub use config::TomlConfig;
pub use crate::core::{
    engine::AggregationEngine, pagination::PaginationController, scoring::ScoreCalculator,
};
pub use domain::model::{BusinessUnit, Lookup, Review, TrustScoreResult};
pub use utils::error::{Result, TrustScoreError};
