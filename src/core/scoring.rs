//! Recency-weighted review scoring.
//!
//! Each review contributes `effective_stars * (1 + rating_score / 2)`, where
//! `rating_score` (capped at 2.0) rewards high stars and recent reviews, and
//! `effective_stars` scales down reviews older than the age ceiling. The trust
//! score is the mean contribution, rounded to one decimal.

use crate::domain::model::Review;
use crate::utils::error::ComputationError;
use chrono::{DateTime, Datelike, Utc};

pub const MAX_STARS: f64 = 5.0;
pub const DEFAULT_MAX_AGE_MONTHS: u32 = 36;
const MAX_RATING_SCORE: f64 = 2.0;

/// Whole calendar months from `created_at` to `now`, by month fields only.
///
/// Any day in the current month is 0, any day in the previous month is 1.
/// Dates in the future clamp to 0.
pub fn months_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let years = i64::from(now.year()) - i64::from(created_at.year());
    let months = years * 12 + i64::from(now.month()) - i64::from(created_at.month());
    months.max(0) as u32
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreCalculator {
    max_age_months: u32,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE_MONTHS)
    }
}

impl ScoreCalculator {
    pub fn new(max_age_months: u32) -> Self {
        Self { max_age_months }
    }

    pub fn max_age_months(&self) -> u32 {
        self.max_age_months
    }

    pub fn compute_score(&self, reviews: &[Review]) -> Result<f64, ComputationError> {
        self.compute_score_at(reviews, Utc::now())
    }

    pub fn compute_score_at(
        &self,
        reviews: &[Review],
        now: DateTime<Utc>,
    ) -> Result<f64, ComputationError> {
        if reviews.is_empty() {
            return Err(ComputationError::NoReviews);
        }

        let total: f64 = reviews.iter().map(|r| self.review_score(r, now)).sum();
        let mean = total / reviews.len() as f64;
        if !mean.is_finite() {
            return Err(ComputationError::NonFiniteScore);
        }

        Ok(round_to_tenth(mean))
    }

    pub fn review_score(&self, review: &Review, now: DateTime<Utc>) -> f64 {
        self.score_for_age(review.stars, months_since(review.created_at, now))
    }

    pub(crate) fn score_for_age(&self, stars: f64, age_months: u32) -> f64 {
        let max_age = f64::from(self.max_age_months);
        let age = f64::from(age_months);

        let age_modifier = if age_months >= self.max_age_months {
            0.0
        } else {
            1.0 - age / max_age
        };

        // Reviews from the current month decay as if one month old.
        let decay_age = age.max(1.0);
        let age_score = (stars / (decay_age * 2.0)) / MAX_STARS;

        let rating_score = (stars / MAX_STARS + age_modifier + age_score).min(MAX_RATING_SCORE);

        let effective_stars = if age_months > self.max_age_months {
            stars * (max_age / age)
        } else {
            stars
        };

        effective_stars + (effective_stars * rating_score) / 2.0
    }
}

/// Half-up rounding on the tenths digit. Scores are never negative.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
