use thiserror::Error;

/// Failures while turning a domain or id into a business unit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Business unit not found: {query}")]
    NotFound { query: String },

    #[error("Resolver transport failure: {message}")]
    Transport { message: String },

    #[error("Resolver returned a malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("Provider rejected resolution ({status}): {message}")]
    Provider { status: u16, message: String },
}

/// Failures of a single review page request. Any of these aborts the whole retrieval.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Response exceeded {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("Transport failure on page {page}: {message}")]
    Transport { page: u32, message: String },

    #[error("Malformed review payload on page {page}: {message}")]
    MalformedPayload { page: u32, message: String },

    #[error("Provider error on page {page}: {message}")]
    Provider { page: u32, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("No reviews available to score")]
    NoReviews,

    #[error("Score computation produced a non-finite value")]
    NonFiniteScore,
}

#[derive(Error, Debug)]
pub enum TrustScoreError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Computation(#[from] ComputationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Resolution,
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrustScoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrustScoreError::Resolution(ResolutionError::Transport { .. }) => ErrorCategory::Network,
            TrustScoreError::Resolution(_) => ErrorCategory::Resolution,
            TrustScoreError::Fetch(FetchError::Transport { .. }) => ErrorCategory::Network,
            TrustScoreError::Fetch(_) | TrustScoreError::Computation(_) => ErrorCategory::Data,
            TrustScoreError::IoError(_) => ErrorCategory::System,
            TrustScoreError::ConfigError { .. }
            | TrustScoreError::InvalidConfigValueError { .. }
            | TrustScoreError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrustScoreError::Computation(ComputationError::NoReviews) => ErrorSeverity::Low,
            TrustScoreError::Resolution(ResolutionError::Transport { .. })
            | TrustScoreError::Fetch(FetchError::Transport { .. }) => ErrorSeverity::Medium,
            TrustScoreError::Resolution(_)
            | TrustScoreError::Fetch(_)
            | TrustScoreError::Computation(_) => ErrorSeverity::High,
            TrustScoreError::ConfigError { .. }
            | TrustScoreError::InvalidConfigValueError { .. }
            | TrustScoreError::MissingConfigError { .. }
            | TrustScoreError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TrustScoreError::Resolution(ResolutionError::NotFound { .. }) => {
                "Check the spelling of the domain or business unit id".to_string()
            }
            TrustScoreError::Resolution(ResolutionError::Transport { .. })
            | TrustScoreError::Fetch(FetchError::Transport { .. }) => {
                "Check network connectivity and the provider base URL, then try again".to_string()
            }
            TrustScoreError::Fetch(FetchError::ResponseTooLarge { .. }) => {
                "Raise provider.max_response_bytes if the provider legitimately returns larger pages"
                    .to_string()
            }
            TrustScoreError::Resolution(ResolutionError::Provider { .. })
            | TrustScoreError::Fetch(FetchError::Provider { .. }) => {
                "Inspect the provider message; the request headers or parameters may be rejected"
                    .to_string()
            }
            TrustScoreError::Resolution(ResolutionError::MalformedPayload { .. })
            | TrustScoreError::Fetch(FetchError::MalformedPayload { .. }) => {
                "The provider API may have changed; verify the base URL points at a compatible API"
                    .to_string()
            }
            TrustScoreError::Computation(ComputationError::NoReviews) => {
                "The business unit has no reviews yet, so no score can be given".to_string()
            }
            TrustScoreError::Computation(ComputationError::NonFiniteScore) => {
                "Review data contains values that cannot be scored".to_string()
            }
            TrustScoreError::IoError(_) => "Check file paths and permissions".to_string(),
            TrustScoreError::ConfigError { .. }
            | TrustScoreError::InvalidConfigValueError { .. }
            | TrustScoreError::MissingConfigError { .. } => {
                "Fix the configuration file or command line arguments".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Resolution => format!("Could not find the business: {}", self),
            ErrorCategory::Network => format!("Could not reach the review provider: {}", self),
            ErrorCategory::Data => format!("Could not compute a trust score: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrustScoreError>;
