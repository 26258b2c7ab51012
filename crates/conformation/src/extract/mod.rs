//! Per-view trait extractors.
//!
//! Each view is described by data: its canonical keypoint list, the model
//! that produces it, and a list of recipes. A recipe names the keypoints it
//! needs, the geometric measure to apply and how to score the result. A
//! recipe whose inputs are missing is skipped; the rest of the view still
//! runs.

pub mod rear;
pub mod side;
pub mod side_udder;
pub mod top;
pub mod udder;

use classifier_common::{utils::{mean, round_to}, Point2D, ScaleFactor};
use tracing::debug;

use crate::{
    breed_tables::{RangeTable, ScoringProfile},
    error::{ConformationError, Result},
    geometry::{self, Axis},
    keypoints::KeypointSet,
    scoring::ScoreTable,
    types::{Score, TraitMeasurement, Unit, ViewResult},
    view::View,
};

/// Per-frame facts an extractor may need besides keypoints
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameContext {
    /// Height of the frame the keypoints were detected in, in pixels
    pub image_height: Option<f64>,
    /// Pixel to centimetre conversion, when a marker was found
    pub scale: Option<ScaleFactor>,
}

/// Turns one view's keypoints into trait measurements
pub trait TraitExtractor: Send + Sync {
    fn view(&self) -> View;

    /// Name of the detector model whose output this extractor understands
    fn model_name(&self) -> &str;

    /// Canonical keypoint order of the detector's output
    fn keypoint_names(&self) -> &'static [&'static str];

    fn extract(&self, keypoints: &KeypointSet, frame: &FrameContext) -> Result<ViewResult>;
}

/// What a measure's value represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Length,
    Angle,
}

/// Geometric measure computed from named keypoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Distance(&'static str, &'static str),
    /// Distance scaled by a constant, e.g. half girth doubled
    ScaledDistance(&'static str, &'static str, f64),
    VerticalDrop(&'static str, &'static str),
    AngleWithAxis(&'static str, &'static str, Axis),
    /// Angle at the middle keypoint
    AngleAtVertex(&'static str, &'static str, &'static str),
    /// `distance(outer) - distance(inner)`, signed
    SpanDifference {
        outer: (&'static str, &'static str),
        inner: (&'static str, &'static str),
    },
    /// Mean over whichever pairs are present, divided by `divisor`
    MeanDistance {
        pairs: &'static [(&'static str, &'static str)],
        divisor: f64,
    },
    /// Frame height minus the mean `y` of two keypoints
    OffsetFromBottom(&'static str, &'static str),
}

impl Measure {
    pub fn quantity(&self) -> Quantity {
        match self {
            Measure::AngleWithAxis(..) | Measure::AngleAtVertex(..) => Quantity::Angle,
            _ => Quantity::Length,
        }
    }

    /// Raw value in pixels or degrees, `None` when an input is missing
    pub fn evaluate(&self, kp: &KeypointSet, frame: &FrameContext) -> Option<f64> {
        match *self {
            Measure::Distance(a, b) => {
                let [a, b] = kp.require([a, b])?;
                Some(geometry::distance(a, b))
            }
            Measure::ScaledDistance(a, b, factor) => {
                let [a, b] = kp.require([a, b])?;
                Some(geometry::distance(a, b) * factor)
            }
            Measure::VerticalDrop(a, b) => {
                let [a, b] = kp.require([a, b])?;
                Some(geometry::vertical_drop(a, b))
            }
            Measure::AngleWithAxis(a, b, axis) => {
                let [a, b] = kp.require([a, b])?;
                geometry::angle_with_axis(a, b, axis)
            }
            Measure::AngleAtVertex(a, vertex, c) => {
                let [a, vertex, c] = kp.require([a, vertex, c])?;
                geometry::angle_at_vertex(a, vertex, c)
            }
            Measure::SpanDifference { outer, inner } => {
                let [o1, o2, i1, i2] = kp.require([outer.0, outer.1, inner.0, inner.1])?;
                Some(geometry::distance(o1, o2) - geometry::distance(i1, i2))
            }
            Measure::MeanDistance { pairs, divisor } => {
                let lengths = pairs
                    .iter()
                    .filter_map(|&(a, b)| kp.require([a, b]))
                    .map(|[a, b]| geometry::distance(a, b));
                mean(lengths).map(|m| m / divisor)
            }
            Measure::OffsetFromBottom(a, b) => {
                let height = frame.image_height?;
                let [a, b]: [Point2D; 2] = kp.require([a, b])?;
                Some(height - (a.y + b.y) / 2.0)
            }
        }
    }
}

/// How a recipe's value is scored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scorer {
    /// Reported but never scored
    Unscored,
    Table(ScoreTable),
    /// Pixel table, or a breed range table over centimetres/degrees when the
    /// calibrated profile is active and the frame has a scale
    Calibrated { pixel: ScoreTable, breed: RangeTable },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recipe {
    pub trait_name: &'static str,
    pub measure: Measure,
    pub scorer: Scorer,
}

impl Recipe {
    pub const fn new(trait_name: &'static str, measure: Measure, scorer: Scorer) -> Self {
        Self {
            trait_name,
            measure,
            scorer,
        }
    }

    /// Evaluate against one frame; `None` when the recipe has to be skipped
    pub fn apply(&self, kp: &KeypointSet, frame: &FrameContext, profile: ScoringProfile) -> Option<TraitMeasurement> {
        let raw = self.measure.evaluate(kp, frame)?;
        if !raw.is_finite() {
            return None;
        }

        let (reported, unit) = match (self.measure.quantity(), frame.scale) {
            (Quantity::Angle, _) => (raw, Unit::Degrees),
            (Quantity::Length, Some(scale)) => (scale.to_physical(raw), Unit::Centimeters),
            (Quantity::Length, None) => (raw, Unit::Pixels),
        };

        let score = self.score(raw, reported, frame.scale.is_some(), profile);
        Some(TraitMeasurement::new(self.trait_name, Some(round_to(reported, 2)), unit, score))
    }

    fn score(&self, raw: f64, reported: f64, calibrated: bool, profile: ScoringProfile) -> Option<Score> {
        match self.scorer {
            Scorer::Unscored => None,
            Scorer::Table(table) => Some(table.score(raw)),
            Scorer::Calibrated { pixel, breed } => {
                let breed_score = (profile == ScoringProfile::GirCalibrated && calibrated)
                    .then(|| breed.score(reported))
                    .flatten();
                Some(breed_score.unwrap_or_else(|| pixel.score(raw)))
            }
        }
    }
}

/// Data-driven extractor shared by all five views
#[derive(Debug, Clone)]
pub struct RecipeExtractor {
    view: View,
    model_name: &'static str,
    keypoint_names: &'static [&'static str],
    recipes: &'static [Recipe],
    profile: ScoringProfile,
}

impl RecipeExtractor {
    pub const fn new(
        view: View,
        model_name: &'static str,
        keypoint_names: &'static [&'static str],
        recipes: &'static [Recipe],
    ) -> Self {
        Self {
            view,
            model_name,
            keypoint_names,
            recipes,
            profile: ScoringProfile::Pixel,
        }
    }

    pub fn with_profile(mut self, profile: ScoringProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn recipes(&self) -> &'static [Recipe] {
        self.recipes
    }
}

impl TraitExtractor for RecipeExtractor {
    fn view(&self) -> View {
        self.view
    }

    fn model_name(&self) -> &str {
        self.model_name
    }

    fn keypoint_names(&self) -> &'static [&'static str] {
        self.keypoint_names
    }

    fn extract(&self, keypoints: &KeypointSet, frame: &FrameContext) -> Result<ViewResult> {
        if keypoints.view() != self.view {
            return Err(ConformationError::ViewMismatch {
                extractor: self.view,
                keypoints: keypoints.view(),
            });
        }

        let traits: Vec<TraitMeasurement> = self
            .recipes
            .iter()
            .filter_map(|recipe| recipe.apply(keypoints, frame, self.profile))
            .collect();

        debug!(
            view = %self.view,
            traits = traits.len(),
            keypoints = keypoints.detected_count(),
            "extracted view traits"
        );

        Ok(ViewResult::new(
            self.view,
            traits,
            keypoints.detected_count(),
            self.model_name,
        ))
    }
}

/// Extractor for a single view
pub fn extractor_for(view: View) -> RecipeExtractor {
    match view {
        View::Rear => rear::extractor(),
        View::Side => side::extractor(),
        View::Top => top::extractor(),
        View::Udder => udder::extractor(),
        View::SideUdder => side_udder::extractor(),
    }
}

/// One extractor per view, in merge order
pub fn default_extractors(profile: ScoringProfile) -> Vec<Box<dyn TraitExtractor>> {
    View::MERGE_ORDER
        .iter()
        .map(|&view| Box::new(extractor_for(view).with_profile(profile)) as Box<dyn TraitExtractor>)
        .collect()
}
