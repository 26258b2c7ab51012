use super::{Measure, Recipe, RecipeExtractor, Scorer};
use crate::{scoring, view::View};

pub const MODEL: &str = "cattle_side_udder";

pub const KEYPOINTS: &[&str] = &["udder", "intersection", "abdomen", "hock", "udder_bottom"];

pub const RECIPES: &[Recipe] = &[
    Recipe::new(
        "Fore Udder Attachment",
        Measure::AngleAtVertex("udder", "intersection", "abdomen"),
        Scorer::Table(scoring::FORE_UDDER_ATTACHMENT),
    ),
    Recipe::new(
        "Udder Depth",
        Measure::VerticalDrop("hock", "udder_bottom"),
        Scorer::Table(scoring::UDDER_DEPTH),
    ),
    // Cleft depth proxy
    Recipe::new(
        "Central Ligament",
        Measure::Distance("udder", "intersection"),
        Scorer::Table(scoring::CENTRAL_LIGAMENT),
    ),
];

pub fn extractor() -> RecipeExtractor {
    RecipeExtractor::new(View::SideUdder, MODEL, KEYPOINTS, RECIPES)
}
