use super::{Measure, Recipe, RecipeExtractor, Scorer};
use crate::{scoring, view::View};

pub const MODEL: &str = "top_view_model";

pub const KEYPOINTS: &[&str] = &[
    "shoulder_1",
    "pt_2",
    "pt_3",
    "abdomen_width_1",
    "shoulder_2",
    "pt_6",
    "spine_bw_hips",
    "abdomen_width_2",
];

/// "Chest Width" is not one of the official trait names
pub const RECIPES: &[Recipe] = &[Recipe::new(
    "Chest Width",
    Measure::Distance("shoulder_1", "shoulder_2"),
    Scorer::Table(scoring::CHEST_WIDTH),
)];

pub fn extractor() -> RecipeExtractor {
    RecipeExtractor::new(View::Top, MODEL, KEYPOINTS, RECIPES)
}
