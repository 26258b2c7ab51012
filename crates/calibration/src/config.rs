use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{CalibrationError, Result},
    hsv::HsvRange,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Real side length of the square sticker
    pub marker_size_cm: f64,
    /// Smallest blob area, in pixels, accepted as the marker
    pub min_area: f64,
    /// Square structuring element of side `2 * radius + 1`
    pub kernel_radius: u8,
    /// Letterbox frames to this square size before calibrating
    pub letterbox_size: Option<u32>,
    /// Marker colour in OpenCV HSV (hue 0-179)
    pub hsv: HsvRange,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            marker_size_cm: 17.0,
            min_area: 100.0,
            kernel_radius: 2,
            letterbox_size: Some(640),
            hsv: HsvRange::default(),
        }
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.marker_size_cm.is_finite() || self.marker_size_cm <= 0.0 {
            return Err(CalibrationError::InvalidConfig(format!(
                "marker_size_cm must be positive, got {}",
                self.marker_size_cm
            )));
        }
        if self.hsv.lower.iter().zip(&self.hsv.upper).any(|(lo, hi)| lo > hi) {
            return Err(CalibrationError::InvalidConfig(
                "hsv lower bound exceeds upper bound".to_string(),
            ));
        }
        if self.letterbox_size == Some(0) {
            return Err(CalibrationError::InvalidConfig(
                "letterbox_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
