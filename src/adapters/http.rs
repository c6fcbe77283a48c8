use crate::config::toml_config::ProviderConfig;
use crate::domain::model::{Lookup, ResolvedBusinessUnit, Review};
use crate::domain::ports::{Resolver, ReviewTransport};
use crate::utils::error::{FetchError, ResolutionError, Result, TrustScoreError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BusinessUnitPayload {
    id: String,
    #[serde(default)]
    name: Option<NamePayload>,
    number_of_reviews: ReviewCountPayload,
}

#[derive(Debug, Deserialize)]
struct NamePayload {
    identifying: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewCountPayload {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ReviewsPayload {
    reviews: Vec<Review>,
}

#[derive(Debug)]
enum BodyError {
    TooLarge,
    Transport(reqwest::Error),
}

/// Client for a business-unit/reviews REST provider. Serves as both resolver and page transport.
#[derive(Debug, Clone)]
pub struct HttpProviderClient {
    client: Client,
    base_url: Url,
    max_response_bytes: usize,
}

impl HttpProviderClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(
            base_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            DEFAULT_MAX_RESPONSE_BYTES,
            &HashMap::new(),
        )
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let base_url = crate::utils::validation::validate_required_field(
            "provider.base_url",
            &config.base_url,
        )?;
        Self::build(
            base_url,
            Duration::from_secs(config.timeout_seconds()),
            config.max_response_bytes(),
            &config.headers.clone().unwrap_or_default(),
        )
    }

    pub fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }

    fn build(
        base_url: &str,
        timeout: Duration,
        max_response_bytes: usize,
        headers: &HashMap<String, String>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| TrustScoreError::InvalidConfigValueError {
            field: "provider.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(header_map(headers)?)
            .build()
            .map_err(|e| TrustScoreError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            max_response_bytes,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be used as a base URL", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_body(&self, mut response: Response) -> std::result::Result<Vec<u8>, BodyError> {
        let limit = self.max_response_bytes;
        if response
            .content_length()
            .is_some_and(|declared| declared > limit as u64)
        {
            return Err(BodyError::TooLarge);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(BodyError::Transport)? {
            if body.len() + chunk.len() > limit {
                return Err(BodyError::TooLarge);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            TrustScoreError::InvalidConfigValueError {
                field: "provider.headers".to_string(),
                value: name.clone(),
                reason: format!("Invalid header name: {}", e),
            }
        })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| TrustScoreError::InvalidConfigValueError {
                field: format!("provider.headers.{}", name),
                value: value.clone(),
                reason: format!("Invalid header value: {}", e),
            })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Pulls a human readable message out of a provider error body.
fn provider_message(body: &[u8], status: Option<StatusCode>) -> Option<String> {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        ["message", "error", "errorMessage"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::to_string)
    });
    message.or_else(|| status.map(|s| format!("HTTP {}", s)))
}

#[async_trait]
impl Resolver for HttpProviderClient {
    async fn resolve(
        &self,
        lookup: &Lookup,
    ) -> std::result::Result<ResolvedBusinessUnit, ResolutionError> {
        let (url, query) = match lookup {
            Lookup::Domain(domain) => {
                let mut url = self
                    .endpoint(&["business-units", "find"])
                    .map_err(|message| ResolutionError::Transport { message })?;
                url.query_pairs_mut().append_pair("name", domain);
                (url, domain)
            }
            Lookup::BusinessUnitId(id) => {
                let url = self
                    .endpoint(&["business-units", id.as_str()])
                    .map_err(|message| ResolutionError::Transport { message })?;
                (url, id)
            }
        };

        tracing::debug!("Resolving via {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolutionError::Transport {
                message: e.to_string(),
            })?;
        let status = response.status();

        // The body of a 404 is irrelevant, however large or broken
        if status == StatusCode::NOT_FOUND {
            return Err(ResolutionError::NotFound {
                query: query.clone(),
            });
        }

        let body = self.read_body(response).await.map_err(|e| match e {
            BodyError::TooLarge => ResolutionError::Transport {
                message: format!("Response exceeded {} bytes", self.max_response_bytes),
            },
            BodyError::Transport(e) => ResolutionError::Transport {
                message: e.to_string(),
            },
        })?;
        if !status.is_success() {
            return Err(ResolutionError::Provider {
                status: status.as_u16(),
                message: provider_message(&body, Some(status)).unwrap_or_default(),
            });
        }

        let payload: BusinessUnitPayload =
            serde_json::from_slice(&body).map_err(|e| ResolutionError::MalformedPayload {
                message: e.to_string(),
            })?;

        let domain = match lookup {
            Lookup::Domain(domain) => domain.clone(),
            Lookup::BusinessUnitId(_) => payload
                .name
                .and_then(|n| n.identifying)
                .unwrap_or_else(|| payload.id.clone()),
        };

        Ok(ResolvedBusinessUnit {
            id: payload.id,
            domain,
            total_review_count: payload.number_of_reviews.total,
        })
    }
}

#[async_trait]
impl ReviewTransport for HttpProviderClient {
    async fn fetch_review_page(
        &self,
        business_unit_id: &str,
        page_index: u32,
        page_size: u32,
    ) -> std::result::Result<Vec<Review>, FetchError> {
        let mut url = self
            .endpoint(&["business-units", business_unit_id, "reviews"])
            .map_err(|message| FetchError::Transport {
                page: page_index,
                message,
            })?;
        url.query_pairs_mut()
            .append_pair("page", &page_index.to_string())
            .append_pair("perPage", &page_size.to_string());

        tracing::debug!("Requesting {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                page: page_index,
                message: e.to_string(),
            })?;
        let status = response.status();

        let body = self.read_body(response).await.map_err(|e| match e {
            BodyError::TooLarge => FetchError::ResponseTooLarge {
                limit: self.max_response_bytes,
            },
            BodyError::Transport(e) => FetchError::Transport {
                page: page_index,
                message: e.to_string(),
            },
        })?;

        if !status.is_success() {
            return Err(FetchError::Provider {
                page: page_index,
                message: provider_message(&body, Some(status)).unwrap_or_default(),
            });
        }

        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| FetchError::MalformedPayload {
                page: page_index,
                message: e.to_string(),
            })?;

        // Some providers answer 200 with an error document instead of a page
        if value.get("reviews").is_none() {
            if let Some(message) = provider_message(&body, None) {
                return Err(FetchError::Provider {
                    page: page_index,
                    message,
                });
            }
        }

        let payload: ReviewsPayload =
            serde_json::from_value(value).map_err(|e| FetchError::MalformedPayload {
                page: page_index,
                message: e.to_string(),
            })?;

        if let Some(bad) = payload
            .reviews
            .iter()
            .find(|r| !(0.0..=crate::core::scoring::MAX_STARS).contains(&r.stars))
        {
            return Err(FetchError::MalformedPayload {
                page: page_index,
                message: format!("stars out of range: {}", bad.stars),
            });
        }

        Ok(payload.reviews)
    }
}
