use crate::adapters::http::{DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT_SECONDS};
use crate::core::pagination::{check_review_cap, DEFAULT_REVIEW_CAP};
use crate::core::scoring::DEFAULT_MAX_AGE_MONTHS;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, TrustScoreError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_response_bytes: Option<usize>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    pub review_cap: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub max_age_months: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl ProviderConfig {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn max_response_bytes(&self) -> usize {
        self.max_response_bytes.unwrap_or(DEFAULT_MAX_RESPONSE_BYTES)
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrustScoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrustScoreError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrustScoreError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let base_url =
            validation::validate_required_field("provider.base_url", &self.provider.base_url)?;
        validation::validate_url("provider.base_url", base_url)?;

        validation::validate_positive_number(
            "provider.timeout_seconds",
            self.provider.timeout_seconds() as usize,
            1,
        )?;
        validation::validate_positive_number(
            "provider.max_response_bytes",
            self.provider.max_response_bytes(),
            1,
        )?;

        check_review_cap("aggregation.review_cap", self.review_cap())?;

        validation::validate_positive_number(
            "scoring.max_age_months",
            self.max_age_months() as usize,
            1,
        )?;

        if let Some(headers) = &self.provider.headers {
            for name in headers.keys() {
                validation::validate_non_empty_string("provider.headers", name)?;
            }
        }

        Ok(())
    }

    pub fn review_cap(&self) -> usize {
        self.aggregation.review_cap.unwrap_or(DEFAULT_REVIEW_CAP)
    }

    pub fn max_age_months(&self) -> u32 {
        self.scoring.max_age_months.unwrap_or(DEFAULT_MAX_AGE_MONTHS)
    }

    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn review_cap(&self) -> usize {
        self.review_cap()
    }

    fn max_age_months(&self) -> u32 {
        self.max_age_months()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
