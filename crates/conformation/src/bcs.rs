//! Body condition score source.
//!
//! BCS is its own trait source, merged after every view. Until a dedicated
//! model is wired in, [`PlaceholderBcsEstimator`] reports a neutral 5.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{
    error::Result,
    keypoints::KeypointSet,
    rubric::BODY_CONDITION_SCORE,
    types::{Score, TraitMeasurement, Unit},
};

#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, IntoStaticStr,
    PartialEq, Eq
)]
pub enum Condition {
    Thin,
    Borderline,
    Moderate,
    Good,
    Fat,
    Obese,
}

impl Condition {
    pub fn from_score(score: Score) -> Self {
        match score.value() {
            0..=3 => Condition::Thin,
            4 => Condition::Borderline,
            5 => Condition::Moderate,
            6 => Condition::Good,
            7 => Condition::Fat,
            _ => Condition::Obese,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BcsEstimate {
    pub score: Score,
    pub condition: Condition,
    /// Which estimator produced the score
    pub source: String,
}

impl BcsEstimate {
    pub fn new(score: Score, source: impl Into<String>) -> Self {
        Self {
            score,
            condition: Condition::from_score(score),
            source: source.into(),
        }
    }

    pub fn to_measurement(&self) -> TraitMeasurement {
        TraitMeasurement::new(BODY_CONDITION_SCORE, None, Unit::None, Some(self.score))
    }
}

/// Produces a body condition score, usually from the rear view
pub trait BcsEstimator: Send + Sync {
    fn estimate(&self, rear: Option<&KeypointSet>) -> Result<BcsEstimate>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderBcsEstimator;

impl PlaceholderBcsEstimator {
    pub const SOURCE: &'static str = "placeholder";
}

impl BcsEstimator for PlaceholderBcsEstimator {
    fn estimate(&self, _rear: Option<&KeypointSet>) -> Result<BcsEstimate> {
        Ok(BcsEstimate::new(Score::new(5)?, Self::SOURCE))
    }
}
