//! Breed-calibrated range tables, used when a physical scale is known.
//!
//! Ranges are `(score, low, high)`, inclusive on both ends, `None` meaning
//! open. Values are rounded to the table's resolution before lookup so that
//! readings between two published ranges resolve to the nearer one.

use classifier_common::utils::round_to;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::types::Score;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeTable {
    /// Decimal places the published ranges are expressed in
    pub resolution: i32,
    pub ranges: &'static [(u8, Option<f64>, Option<f64>)],
}

impl RangeTable {
    pub fn score(&self, value: f64) -> Option<Score> {
        if !value.is_finite() {
            return None;
        }
        let value = round_to(value, self.resolution);

        let hit = self.ranges.iter().find(|(_, low, high)| {
            low.is_none_or(|low| value >= low) && high.is_none_or(|high| value <= high)
        });
        if let Some((score, _, _)) = hit {
            return Score::new(*score).ok();
        }

        // Clamp to the end scores outside the covered range
        let (first, last) = (self.ranges.first()?, self.ranges.last()?);
        if first.2.is_some_and(|high| value < high) {
            return Score::new(first.0).ok();
        }
        if last.1.is_some_and(|low| value > low) {
            return Score::new(last.0).ok();
        }
        None
    }
}

/// Gir breed reference ranges for the side view, in centimetres and degrees
pub mod gir {
    use super::RangeTable;

    pub const STATURE: RangeTable = RangeTable {
        resolution: 0,
        ranges: &[
            (1, None, Some(110.0)),
            (2, Some(111.0), Some(113.0)),
            (3, Some(114.0), Some(116.0)),
            (4, Some(117.0), Some(118.0)),
            (5, Some(119.0), Some(121.0)),
            (6, Some(122.0), Some(123.0)),
            (7, Some(124.0), Some(125.0)),
            (8, Some(126.0), Some(127.0)),
            (9, Some(128.0), None),
        ],
    };

    pub const HEART_GIRTH: RangeTable = RangeTable {
        resolution: 0,
        ranges: &[
            (1, None, Some(145.0)),
            (2, Some(146.0), Some(149.0)),
            (3, Some(150.0), Some(153.0)),
            (4, Some(154.0), Some(157.0)),
            (5, Some(158.0), Some(162.0)),
            (6, Some(163.0), Some(165.0)),
            (7, Some(166.0), Some(168.0)),
            (8, Some(169.0), Some(171.0)),
            (9, Some(172.0), None),
        ],
    };

    pub const BODY_LENGTH: RangeTable = RangeTable {
        resolution: 0,
        ranges: &[
            (1, None, Some(115.0)),
            (2, Some(116.0), Some(118.0)),
            (3, Some(119.0), Some(121.0)),
            (4, Some(122.0), Some(123.0)),
            (5, Some(124.0), Some(126.0)),
            (6, Some(127.0), Some(128.0)),
            (7, Some(129.0), Some(131.0)),
            (8, Some(132.0), Some(134.0)),
            (9, Some(135.0), None),
        ],
    };

    pub const BODY_DEPTH: RangeTable = RangeTable {
        resolution: 0,
        ranges: &[
            (1, None, Some(58.0)),
            (2, Some(59.0), Some(59.0)),
            (3, Some(60.0), Some(61.0)),
            (4, Some(62.0), Some(62.0)),
            (5, Some(63.0), Some(64.0)),
            (6, Some(65.0), Some(65.0)),
            (7, Some(66.0), Some(67.0)),
            (8, Some(68.0), Some(69.0)),
            (9, Some(70.0), None),
        ],
    };

    /// Spine to hip bone drop in cm; a flatter rump scores higher
    pub const RUMP_ANGLE_DROP: RangeTable = RangeTable {
        resolution: 2,
        ranges: &[
            (1, Some(12.01), None),
            (2, Some(11.0), Some(12.0)),
            (3, Some(10.0), Some(11.0)),
            (4, Some(9.0), Some(10.0)),
            (5, Some(8.0), Some(9.0)),
            (6, Some(7.0), Some(8.0)),
            (7, Some(6.0), Some(7.0)),
            (8, Some(5.0), Some(6.0)),
            (9, None, Some(4.99)),
        ],
    };

    pub const REAR_LEGS_SET: RangeTable = RangeTable {
        resolution: 1,
        ranges: &[
            (1, Some(170.0), None),
            (2, Some(165.0), Some(169.9)),
            (3, Some(160.0), Some(164.9)),
            (4, Some(156.0), Some(159.9)),
            (5, Some(150.0), Some(155.9)),
            (6, Some(146.0), Some(149.9)),
            (7, Some(141.0), Some(145.9)),
            (8, Some(135.0), Some(140.9)),
            (9, None, Some(134.9)),
        ],
    };

    pub const FOOT_ANGLE: RangeTable = RangeTable {
        resolution: 0,
        ranges: &[
            (1, None, Some(42.0)),
            (2, Some(43.0), Some(44.0)),
            (3, Some(45.0), Some(46.0)),
            (4, Some(47.0), Some(48.0)),
            (5, Some(49.0), Some(50.0)),
            (6, Some(51.0), Some(52.0)),
            (7, Some(53.0), Some(55.0)),
            (8, Some(56.0), Some(59.0)),
            (9, Some(60.0), None),
        ],
    };
}

/// Which table family scores side-view traits
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoringProfile {
    /// Raw pixel tables for every trait
    #[default]
    Pixel,
    /// Gir reference ranges for side-view traits when a scale is available
    GirCalibrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringConfig {
    pub profile: ScoringProfile,
    /// Keypoints reported below this confidence are treated as not detected
    pub min_keypoint_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            profile: ScoringProfile::Pixel,
            min_keypoint_confidence: 0.0,
        }
    }
}
