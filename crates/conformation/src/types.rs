use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use ts_rs::TS;

use crate::{
    error::{ConformationError, Result},
    rubric::MeasurementUnit,
    view::View,
};

/// Unit of a reported measurement
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema, TS,
    Display, EnumString, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[ts(export)]
pub enum Unit {
    Pixels,
    Centimeters,
    Degrees,
    #[default]
    None,
}

impl From<Option<MeasurementUnit>> for Unit {
    fn from(unit: Option<MeasurementUnit>) -> Self {
        match unit {
            Some(MeasurementUnit::Cm) => Unit::Centimeters,
            Some(MeasurementUnit::Degrees) => Unit::Degrees,
            None => Unit::None,
        }
    }
}

/// Trait score on the official 1-9 scale
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema, TS,
    PartialEq, Eq, PartialOrd, Ord, Hash
)]
#[serde(try_from = "u8", into = "u8")]
#[ts(export)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConformationError::ScoreOutOfRange(value.into()))
        }
    }

    /// Clamp into 1-9
    pub const fn saturating(value: u8) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = ConformationError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.0
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> f64 {
        f64::from(score.0)
    }
}

/// One trait as produced by an extractor, the BCS source or the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TraitMeasurement {
    pub trait_name: String,
    pub raw_value: Option<f64>,
    pub unit: Unit,
    pub score: Option<Score>,
}

impl TraitMeasurement {
    pub fn new(trait_name: impl Into<String>, raw_value: Option<f64>, unit: Unit, score: Option<Score>) -> Self {
        Self {
            trait_name: trait_name.into(),
            raw_value,
            unit,
            score,
        }
    }
}

/// Output of one view extractor. Built once, read by the merge engine.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewResult {
    view: View,
    traits: Vec<TraitMeasurement>,
    keypoints_detected: usize,
    source_model: String,
}

impl ViewResult {
    pub fn new(
        view: View,
        traits: Vec<TraitMeasurement>,
        keypoints_detected: usize,
        source_model: impl Into<String>,
    ) -> Self {
        Self {
            view,
            traits,
            keypoints_detected,
            source_model: source_model.into(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn traits(&self) -> &[TraitMeasurement] {
        &self.traits
    }

    pub fn keypoints_detected(&self) -> usize {
        self.keypoints_detected
    }

    pub fn source_model(&self) -> &str {
        &self.source_model
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}
