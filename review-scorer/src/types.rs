//! Public configuration types for review weighting and score rounding.
#![forbid(unsafe_code)]

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseRoundingError, WeightingPolicyError};

/// Tunable constants of the recency/credibility weighting scheme.
///
/// A review's weight is
/// `(likes + 1)^likes_exponent * (reviews_by_reviewer + 1)^authority_exponent * recency`,
/// where `recency = recency_amplitude / (1 + recency_decay_rate * days_ago^recency_decay_exponent) + recency_floor`
/// for parsable publish dates and `1` otherwise.
///
/// The defaults were chosen empirically and are kept for compatibility with
/// previously published scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightingPolicy {
    /// Exponent applied to `likes + 1`.
    pub likes_exponent: f64,
    /// Exponent applied to `reviews_by_reviewer + 1`.
    pub authority_exponent: f64,
    /// Height of the recency bump above the floor for a fresh review.
    pub recency_amplitude: f64,
    /// Rate at which the recency bump decays with age.
    pub recency_decay_rate: f64,
    /// Exponent applied to the review age in days.
    pub recency_decay_exponent: f64,
    /// Recency weight approached by very old reviews.
    pub recency_floor: f64,
}

impl Default for WeightingPolicy {
    fn default() -> Self {
        Self {
            likes_exponent: 0.5_f64,
            authority_exponent: 0.25_f64,
            recency_amplitude: 4.0_f64,
            recency_decay_rate: 0.01_f64,
            recency_decay_exponent: 1.5_f64,
            recency_floor: 1.0_f64,
        }
    }
}

impl WeightingPolicy {
    /// Validate the constants and return a copy.
    ///
    /// A valid policy guarantees every review weight is finite and strictly
    /// positive.
    ///
    /// # Errors
    /// Returns [`WeightingPolicyError`] when a constant is not finite, is
    /// negative, or when the recency floor is zero.
    pub fn validate(self) -> Result<Self, WeightingPolicyError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(WeightingPolicyError::NonFinite { field });
            }
            if value < 0.0_f64 {
                return Err(WeightingPolicyError::Negative { field });
            }
        }
        if self.recency_floor <= 0.0_f64 {
            return Err(WeightingPolicyError::NonPositiveFloor);
        }
        Ok(self)
    }

    const fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("likes_exponent", self.likes_exponent),
            ("authority_exponent", self.authority_exponent),
            ("recency_amplitude", self.recency_amplitude),
            ("recency_decay_rate", self.recency_decay_rate),
            ("recency_decay_exponent", self.recency_decay_exponent),
            ("recency_floor", self.recency_floor),
        ]
    }
}

/// One review's score paired with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    /// Raw score from the text scorer.
    pub score: f64,
    /// Non-negative influence of the review.
    pub weight: f64,
}

/// Post-processing applied to an aggregated place score.
///
/// Exactly one policy applies to a score; they are never combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// Round down to one decimal place.
    #[default]
    FloorToOneDecimal,
    /// Round to the nearest multiple of one half.
    NearestHalf,
    /// Leave the score untouched.
    None,
}

impl Rounding {
    /// Apply the policy to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use review_scorer::Rounding;
    ///
    /// assert_eq!(Rounding::FloorToOneDecimal.apply(4.99), 4.9);
    /// assert_eq!(Rounding::NearestHalf.apply(4.76), 5.0);
    /// assert_eq!(Rounding::None.apply(4.76), 4.76);
    /// ```
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::FloorToOneDecimal => floor_to_one_decimal(value),
            Self::NearestHalf => round_to_nearest_half(value),
            Self::None => value,
        }
    }
}

impl FromStr for Rounding {
    type Err = ParseRoundingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "floor" | "floor-to-one-decimal" => Ok(Self::FloorToOneDecimal),
            "half" | "nearest-half" => Ok(Self::NearestHalf),
            "none" => Ok(Self::None),
            _ => Err(ParseRoundingError {
                name: name.to_owned(),
            }),
        }
    }
}

/// Round `value` down to one decimal place: `floor(value * 10) / 10`.
#[expect(
    clippy::float_arithmetic,
    reason = "decimal rounding scales, floors and rescales"
)]
#[must_use]
pub fn floor_to_one_decimal(value: f64) -> f64 {
    (value * 10.0_f64).floor() / 10.0_f64
}

/// Round `value` to the nearest half: `round(value * 2) / 2`.
///
/// Ties round away from zero.
#[expect(
    clippy::float_arithmetic,
    reason = "half rounding scales, rounds and rescales"
)]
#[must_use]
pub fn round_to_nearest_half(value: f64) -> f64 {
    (value * 2.0_f64).round() / 2.0_f64
}
