pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::domain::model::Lookup;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{ArgGroup, Parser, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "trust-score")]
#[command(about = "Compute a recency-weighted trust score from a business's reviews")]
#[command(group(ArgGroup::new("target").required(true).args(["domain", "id"])))]
pub struct CliConfig {
    /// Domain of the business to score
    #[arg(long)]
    pub domain: Option<String>,

    /// Provider business unit id to score
    #[arg(long)]
    pub id: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override provider.base_url
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override aggregation.review_cap
    #[arg(long)]
    pub review_cap: Option<usize>,

    /// Override scoring.max_age_months
    #[arg(long)]
    pub max_age_months: Option<u32>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn lookup(&self) -> Result<Lookup> {
        match (&self.domain, &self.id) {
            (Some(domain), None) => {
                crate::utils::validation::validate_non_empty_string("domain", domain)?;
                Ok(Lookup::Domain(domain.trim().to_string()))
            }
            (None, Some(id)) => {
                crate::utils::validation::validate_non_empty_string("id", id)?;
                Ok(Lookup::BusinessUnitId(id.trim().to_string()))
            }
            _ => Err(crate::utils::error::TrustScoreError::ConfigError {
                message: "exactly one of --domain or --id is required".to_string(),
            }),
        }
    }

    /// Loads the file configuration (or defaults) and applies command line overrides.
    pub fn resolve_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.provider.base_url = Some(base_url.clone());
        }
        if let Some(review_cap) = self.review_cap {
            config.aggregation.review_cap = Some(review_cap);
        }
        if let Some(max_age) = self.max_age_months {
            config.scoring.max_age_months = Some(max_age);
        }
        if self.verbose {
            config.logging.verbose = Some(true);
        }
        if self.json_logs {
            config.logging.json = Some(true);
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_domain_lookup() {
        let cli = CliConfig::parse_from([
            "trust-score",
            "--domain",
            "example.com",
            "--base-url",
            "https://api.example.com",
        ]);

        assert_eq!(cli.lookup().unwrap(), Lookup::Domain("example.com".to_string()));
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_domain_and_id_are_exclusive() {
        let result = CliConfig::try_parse_from([
            "trust-score",
            "--domain",
            "example.com",
            "--id",
            "bu-1",
        ]);
        assert!(result.is_err());

        assert!(CliConfig::try_parse_from(["trust-score"]).is_err());
    }

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let cli = CliConfig::parse_from([
            "trust-score",
            "--id",
            "bu-1",
            "--base-url",
            "https://api.example.com",
            "--review-cap",
            "600",
            "--json-logs",
            "--output",
            "json",
        ]);

        let config = cli.resolve_config().unwrap();

        assert_eq!(cli.lookup().unwrap(), Lookup::BusinessUnitId("bu-1".to_string()));
        assert_eq!(config.review_cap(), 600);
        assert_eq!(config.max_age_months(), 36);
        assert!(config.json_logs());
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
