//! # Classifier Common - Shared Types and Utilities
//!
//! Value types shared by the conformation engine, the scale calibrator and
//! the command line front end.
//!
//! ## Example
//!
//! ```rust
//! use classifier_common::{AnimalInfo, Point2D, ScaleFactor};
//!
//! let wither = Point2D::new(120.0, 80.0);
//! let hoof = Point2D::new(124.0, 440.0);
//! println!("Stature: {:.1}px", wither.distance_to(hoof));
//!
//! let scale = ScaleFactor::new(17.0 / 40.0).unwrap();
//! println!("Stature: {:.1}cm", scale.to_physical(wither.distance_to(hoof)));
//!
//! let animal = AnimalInfo {
//!     breed: "Holstein Friesian".to_string(),
//!     lactation_number: 2,
//!     ..AnimalInfo::default()
//! };
//! assert!(animal.validate().is_ok());
//! ```

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;
use ts_rs::TS;

/// Result type for shared operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Standard error type for shared value validation
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Invalid scale factor: {value}")]
    InvalidScale { value: f64 },

    #[error("Lactation number {value} outside 1-10")]
    InvalidLactation { value: u32 },

    #[error("Validation failed: {details}")]
    ValidationFailed { details: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 2D point in image pixel coordinates (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Vector from this point to another
    pub fn to(self, other: Self) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Pixel to centimetre conversion derived from a fiducial marker of known size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScaleFactor {
    /// Centimetres represented by one pixel
    pub cm_per_px: f64,
}

impl ScaleFactor {
    /// Create a scale factor; must be finite and strictly positive
    pub fn new(cm_per_px: f64) -> Result<Self> {
        if !cm_per_px.is_finite() || cm_per_px <= 0.0 {
            return Err(CommonError::InvalidScale { value: cm_per_px });
        }
        Ok(Self { cm_per_px })
    }

    /// Convert a pixel length to centimetres
    pub fn to_physical(&self, pixels: f64) -> f64 {
        pixels * self.cm_per_px
    }
}

#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema, TS,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[ts(export)]
pub enum AnimalType {
    #[default]
    Cattle,
    Buffalo,
}

/// Animal metadata supplied with every classification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct AnimalInfo {
    pub tag_number: Option<String>,
    pub animal_type: AnimalType,
    pub breed: String,
    pub date_of_birth: String,
    /// Lactation number, 1-10
    pub lactation_number: u32,
    pub date_of_calving: String,
    pub village: String,
    pub farmer_name: String,
    pub farmer_contact: Option<String>,
}

impl Default for AnimalInfo {
    fn default() -> Self {
        Self {
            tag_number: None,
            animal_type: AnimalType::Cattle,
            breed: "Unknown".to_string(),
            date_of_birth: String::new(),
            lactation_number: 1,
            date_of_calving: String::new(),
            village: "Not specified".to_string(),
            farmer_name: "Unknown".to_string(),
            farmer_contact: None,
        }
    }
}

impl AnimalInfo {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.lactation_number) {
            return Err(CommonError::InvalidLactation { value: self.lactation_number });
        }
        if let Some(tag) = &self.tag_number {
            if tag.trim().is_empty() {
                return Err(CommonError::ValidationFailed {
                    details: "tagNumber must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Assign an `AUTO-<timestamp>` tag when the request carried none
    pub fn ensure_tag_number(&mut self, now: NaiveDateTime) -> &str {
        let missing = self.tag_number.as_deref().is_none_or(|t| t.trim().is_empty());
        if missing {
            self.tag_number = Some(format!("AUTO-{}", now.format("%Y%m%d%H%M%S")));
        }
        self.tag_number.as_deref().unwrap_or_default()
    }
}

/// Numeric helpers shared across crates
pub mod utils {
    /// Round to a fixed number of decimal places (half away from zero)
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    }

    /// Arithmetic mean, `None` for an empty input
    pub fn mean<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }
}
