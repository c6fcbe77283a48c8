use crate::core::pagination::{check_review_cap, PaginationController, DEFAULT_REVIEW_CAP};
use crate::core::scoring::ScoreCalculator;
use crate::domain::model::{BusinessUnit, Lookup, TrustScoreResult};
use crate::domain::ports::{ConfigProvider, Resolver, ReviewTransport};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Resolve, paginate, score. Holds no per-request state, so one engine can serve
/// concurrent lookups.
pub struct AggregationEngine<R: Resolver, T: ReviewTransport> {
    resolver: R,
    transport: T,
    review_cap: usize,
    calculator: ScoreCalculator,
}

impl<R: Resolver, T: ReviewTransport> AggregationEngine<R, T> {
    pub fn new(resolver: R, transport: T) -> Self {
        Self {
            resolver,
            transport,
            review_cap: DEFAULT_REVIEW_CAP,
            calculator: ScoreCalculator::default(),
        }
    }

    pub fn from_config<C: ConfigProvider>(
        resolver: R,
        transport: T,
        config: &C,
    ) -> Result<Self> {
        Self::new(resolver, transport)
            .with_calculator(ScoreCalculator::new(config.max_age_months()))
            .with_review_cap(config.review_cap())
    }

    pub fn with_review_cap(mut self, review_cap: usize) -> Result<Self> {
        self.review_cap = check_review_cap("review_cap", review_cap)?;
        Ok(self)
    }

    pub fn with_calculator(mut self, calculator: ScoreCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub async fn get_trust_score(&self, lookup: &Lookup) -> Result<TrustScoreResult> {
        self.get_trust_score_at(lookup, Utc::now()).await
    }

    pub async fn get_trust_score_at(
        &self,
        lookup: &Lookup,
        now: DateTime<Utc>,
    ) -> Result<TrustScoreResult> {
        tracing::info!("Resolving {}", lookup);
        let resolved = self.resolver.resolve(lookup).await?;
        let unit = BusinessUnit::from_resolved(resolved);
        tracing::info!(
            "Resolved business unit {} ({}) with {} review(s)",
            unit.id,
            unit.domain,
            unit.total_review_count
        );

        let controller = PaginationController::new(&self.transport, self.review_cap)?;
        let reviews = controller
            .fetch_reviews(&unit.id, unit.total_review_count)
            .await?;
        let unit = unit.with_reviews(reviews);
        tracing::info!("Fetched {} review(s) for {}", unit.reviews.len(), unit.id);

        tracing::debug!(
            "Scoring with age ceiling of {} month(s)",
            self.calculator.max_age_months()
        );
        let trust_score = self.calculator.compute_score_at(&unit.reviews, now)?;
        tracing::info!("Trust score for {}: {:.1}", unit.id, trust_score);

        Ok(TrustScoreResult {
            id: unit.id,
            domain: unit.domain,
            trust_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pagination::tests::ScriptedTransport;
    use crate::domain::model::ResolvedBusinessUnit;
    use crate::utils::error::{ComputationError, FetchError, ResolutionError, TrustScoreError};
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct FixedResolver {
        outcome: std::result::Result<ResolvedBusinessUnit, ResolutionError>,
    }

    impl FixedResolver {
        fn found(total_review_count: u64) -> Self {
            Self {
                outcome: Ok(ResolvedBusinessUnit {
                    id: "bu-42".to_string(),
                    domain: "example.com".to_string(),
                    total_review_count,
                }),
            }
        }
    }

    #[async_trait]
    impl Resolver for FixedResolver {
        async fn resolve(
            &self,
            _lookup: &Lookup,
        ) -> std::result::Result<ResolvedBusinessUnit, ResolutionError> {
            self.outcome.clone()
        }
    }

    fn now() -> DateTime<Utc> {
        // Scripted pages are dated 2024-06-01, 28 months before this
        Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap()
    }

    fn lookup() -> Lookup {
        Lookup::Domain("example.com".to_string())
    }

    #[tokio::test]
    async fn test_successful_aggregation() {
        let transport = ScriptedTransport::new()
            .with_page(1, &[5.0; 100])
            .with_page(2, &[5.0; 100])
            .with_page(3, &[5.0; 20]);
        let engine = AggregationEngine::new(FixedResolver::found(220), transport.clone());

        let result = engine.get_trust_score_at(&lookup(), now()).await.unwrap();

        assert_eq!(transport.requested_pages().await, vec![1, 2, 3]);
        assert_eq!(result.id, "bu-42");
        assert_eq!(result.domain, "example.com");
        let expected = ScoreCalculator::default().score_for_age(5.0, 28);
        assert_eq!(result.trust_score, (expected * 10.0).round() / 10.0);
    }

    #[tokio::test]
    async fn test_resolution_failure_skips_fetching() {
        let resolver = FixedResolver {
            outcome: Err(ResolutionError::NotFound {
                query: "nope.example".to_string(),
            }),
        };
        let transport = ScriptedTransport::new().with_page(1, &[5.0]);
        let engine = AggregationEngine::new(resolver, transport.clone());

        let err = engine.get_trust_score_at(&lookup(), now()).await.unwrap_err();

        assert!(matches!(
            err,
            TrustScoreError::Resolution(ResolutionError::NotFound { ref query }) if query == "nope.example"
        ));
        assert!(transport.requested_pages().await.is_empty());
    }

    #[tokio::test]
    async fn test_page_failure_surfaces_same_error() {
        let failure = FetchError::MalformedPayload {
            page: 3,
            message: "missing field `stars`".to_string(),
        };
        let transport = ScriptedTransport::new()
            .with_page(1, &[4.0; 100])
            .with_page(2, &[4.0; 100])
            .with_failure(3, failure.clone());
        let engine = AggregationEngine::new(FixedResolver::found(5_000), transport);

        let err = engine.get_trust_score_at(&lookup(), now()).await.unwrap_err();

        assert!(matches!(err, TrustScoreError::Fetch(ref inner) if *inner == failure));
    }

    #[tokio::test]
    async fn test_unit_without_reviews_is_a_computation_error() {
        let transport = ScriptedTransport::new();
        let engine = AggregationEngine::new(FixedResolver::found(0), transport.clone());

        let err = engine.get_trust_score_at(&lookup(), now()).await.unwrap_err();

        assert!(matches!(
            err,
            TrustScoreError::Computation(ComputationError::NoReviews)
        ));
        assert!(transport.requested_pages().await.is_empty());
    }

    #[tokio::test]
    async fn test_review_cap_is_configurable() {
        let transport = ScriptedTransport::new()
            .with_page(1, &[3.0; 100])
            .with_page(2, &[3.0; 100]);
        let engine = AggregationEngine::new(FixedResolver::found(900), transport.clone())
            .with_review_cap(200)
            .unwrap();

        engine.get_trust_score_at(&lookup(), now()).await.unwrap();

        assert_eq!(transport.requested_pages().await, vec![1, 2]);
    }

    #[test]
    fn test_invalid_review_cap_is_rejected() {
        for cap in [0, 50, 250] {
            let engine =
                AggregationEngine::new(FixedResolver::found(60), ScriptedTransport::new())
                    .with_review_cap(cap);
            assert!(
                matches!(engine, Err(TrustScoreError::InvalidConfigValueError { .. })),
                "cap {}",
                cap
            );
        }
    }

    #[tokio::test]
    async fn test_custom_age_ceiling_changes_discount() {
        let transport = ScriptedTransport::new().with_page(1, &[4.0]);
        let engine = AggregationEngine::new(FixedResolver::found(1), transport)
            .with_calculator(ScoreCalculator::new(12));

        let result = engine.get_trust_score_at(&lookup(), now()).await.unwrap();

        // 28 months old against a 12 month ceiling: stars scaled by 12 / 28.
        // The default 36 month ceiling would give 6.1.
        assert_eq!(result.trust_score, 2.4);
    }

    #[tokio::test]
    async fn test_dropping_aggregation_stops_pagination() {
        let transport = ScriptedTransport::new()
            .with_page(1, &[5.0; 100])
            .with_stalled_page(2);
        let engine = AggregationEngine::new(FixedResolver::found(300), transport.clone());

        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            engine.get_trust_score_at(&lookup(), now()),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(transport.requested_pages().await, vec![1, 2]);
    }
}
