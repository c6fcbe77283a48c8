use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single review as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub stars: f64,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(stars: f64, created_at: DateTime<Utc>) -> Self {
        Self { stars, created_at }
    }
}

/// One page of reviews, tagged with the 1-based page index it was requested as.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPage {
    pub page_index: u32,
    pub reviews: Vec<Review>,
}

/// What a caller asks to be scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Domain(String),
    BusinessUnitId(String),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Domain(domain) => write!(f, "domain '{}'", domain),
            Lookup::BusinessUnitId(id) => write!(f, "business unit '{}'", id),
        }
    }
}

/// Resolver output: the canonical identity of a business unit and how many reviews it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBusinessUnit {
    pub id: String,
    pub domain: String,
    pub total_review_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessUnit {
    pub id: String,
    pub domain: String,
    pub total_review_count: u64,
    pub reviews: Vec<Review>,
}

impl BusinessUnit {
    pub fn from_resolved(resolved: ResolvedBusinessUnit) -> Self {
        Self {
            id: resolved.id,
            domain: resolved.domain,
            total_review_count: resolved.total_review_count,
            reviews: Vec::new(),
        }
    }

    /// Returns a new unit carrying `reviews` after the ones already held.
    pub fn with_reviews(self, reviews: Vec<Review>) -> Self {
        let mut all = self.reviews;
        all.extend(reviews);
        Self {
            reviews: all,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScoreResult {
    pub id: String,
    pub domain: String,
    pub trust_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_review_deserializes_provider_shape() {
        let review: Review =
            serde_json::from_str(r#"{"stars": 4, "createdAt": "2024-03-05T10:00:00Z"}"#).unwrap();

        assert_eq!(review.stars, 4.0);
        assert_eq!(
            review.created_at,
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_business_unit_accumulates_in_order() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let unit = BusinessUnit::from_resolved(ResolvedBusinessUnit {
            id: "bu-1".to_string(),
            domain: "example.com".to_string(),
            total_review_count: 3,
        });

        let unit = unit
            .with_reviews(vec![Review::new(1.0, at), Review::new(2.0, at)])
            .with_reviews(vec![Review::new(3.0, at)]);

        let stars: Vec<f64> = unit.reviews.iter().map(|r| r.stars).collect();
        assert_eq!(stars, vec![1.0, 2.0, 3.0]);
        assert_eq!(unit.id, "bu-1");
        assert_eq!(unit.total_review_count, 3);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = TrustScoreResult {
            id: "bu-1".to_string(),
            domain: "example.com".to_string(),
            trust_score: 7.4,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["trustScore"], 7.4);
        assert_eq!(json["domain"], "example.com");
    }
}
