//! Side view: body frame, rump and rear leg traits.

use super::{Measure, Recipe, RecipeExtractor, Scorer};
use crate::{breed_tables::gir, geometry::Axis, scoring, view::View};

pub const MODEL: &str = "side_view_model_v2";

pub const KEYPOINTS: &[&str] = &[
    "wither",
    "pinbone",
    "shoulderbone",
    "chest_top",
    "elbow",
    "body_girth_top",
    "rear_elbow",
    "spine_between_hips",
    "hoof",
    "belly_deepest_point",
    "hock",
    "hip_bone",
    "hoof_tip",
    "hairline_hoof",
];

pub const RECIPES: &[Recipe] = &[
    Recipe::new(
        "Body Length",
        Measure::Distance("shoulderbone", "pinbone"),
        Scorer::Calibrated { pixel: scoring::BODY_LENGTH, breed: gir::BODY_LENGTH },
    ),
    Recipe::new(
        "Stature",
        Measure::Distance("wither", "hoof"),
        Scorer::Calibrated { pixel: scoring::STATURE, breed: gir::STATURE },
    ),
    // Half girth from chest top to elbow, doubled
    Recipe::new(
        "Heart Girth",
        Measure::ScaledDistance("chest_top", "elbow", 2.0),
        Scorer::Calibrated { pixel: scoring::HEART_GIRTH, breed: gir::HEART_GIRTH },
    ),
    Recipe::new(
        "Body Depth",
        Measure::Distance("body_girth_top", "belly_deepest_point"),
        Scorer::Calibrated { pixel: scoring::BODY_DEPTH, breed: gir::BODY_DEPTH },
    ),
    // A vertical drop, not an angle, despite the trait name
    Recipe::new(
        "Rump Angle",
        Measure::VerticalDrop("spine_between_hips", "hip_bone"),
        Scorer::Calibrated { pixel: scoring::RUMP_ANGLE, breed: gir::RUMP_ANGLE_DROP },
    ),
    Recipe::new(
        "Rear Legs Set",
        Measure::AngleWithAxis("hock", "hoof", Axis::Horizontal),
        Scorer::Calibrated { pixel: scoring::REAR_LEGS_SET, breed: gir::REAR_LEGS_SET },
    ),
    Recipe::new(
        "Foot Angle",
        Measure::AngleWithAxis("hairline_hoof", "hoof_tip", Axis::Vertical),
        Scorer::Calibrated { pixel: scoring::FOOT_ANGLE, breed: gir::FOOT_ANGLE },
    ),
    Recipe::new(
        "Angularity",
        Measure::AngleAtVertex("body_girth_top", "belly_deepest_point", "rear_elbow"),
        Scorer::Unscored,
    ),
];

pub fn extractor() -> RecipeExtractor {
    RecipeExtractor::new(View::Side, MODEL, KEYPOINTS, RECIPES)
}
