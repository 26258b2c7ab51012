use super::{Measure, Recipe, RecipeExtractor, Scorer};
use crate::{scoring, view::View};

pub const MODEL: &str = "rear_view_model";

pub const KEYPOINTS: &[&str] = &[
    "pin_bone_1",
    "pin_bone_2",
    "hip_bone_1",
    "hip_bone_2",
    "hock_1",
    "hock_2",
    "hoof_1",
    "hoof_2",
];

pub const RECIPES: &[Recipe] = &[
    Recipe::new(
        "Rump Width",
        Measure::Distance("pin_bone_1", "pin_bone_2"),
        Scorer::Table(scoring::RUMP_WIDTH),
    ),
    // Positive when the hooves splay wider than the hocks (toe-out)
    Recipe::new(
        "Rear Legs Rear View",
        Measure::SpanDifference {
            outer: ("hoof_1", "hoof_2"),
            inner: ("hock_1", "hock_2"),
        },
        Scorer::Table(scoring::REAR_LEGS_REAR_VIEW),
    ),
];

pub fn extractor() -> RecipeExtractor {
    RecipeExtractor::new(View::Rear, MODEL, KEYPOINTS, RECIPES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        extract::{FrameContext, TraitExtractor},
        keypoints::{KeypointSet, RawKeypoint},
        types::{Score, Unit},
    };

    fn rear(hoof_spread: f64) -> KeypointSet {
        let raw = [
            [160.0, 300.0],
            [300.0, 300.0],
            [150.0, 250.0],
            [310.0, 250.0],
            [180.0, 500.0],
            [280.0, 500.0],
            [180.0 - hoof_spread / 2.0, 620.0],
            [280.0 + hoof_spread / 2.0, 620.0],
        ]
        .map(|xy| Some(RawKeypoint::Xy(xy)));
        KeypointSet::from_indexed(View::Rear, KEYPOINTS, &raw, 0.0).unwrap()
    }

    #[test]
    fn test_rump_width_and_parallel_legs() {
        let result = extractor().extract(&rear(0.0), &FrameContext::default()).unwrap();
        let traits = result.traits();
        assert_eq!(traits.len(), 2);

        assert_eq!(traits[0].trait_name, "Rump Width");
        assert_eq!(traits[0].raw_value, Some(140.0));
        assert_eq!(traits[0].unit, Unit::Pixels);
        assert_eq!(traits[0].score.map(Score::value), Some(2));

        assert_eq!(traits[1].raw_value, Some(0.0));
        assert_eq!(traits[1].score.map(Score::value), Some(9));
    }

    #[test]
    fn test_toe_in_and_toe_out_score_alike() {
        let out = extractor().extract(&rear(24.0), &FrameContext::default()).unwrap();
        let inward = extractor().extract(&rear(-24.0), &FrameContext::default()).unwrap();

        assert_eq!(out.traits()[1].raw_value, Some(24.0));
        assert_eq!(inward.traits()[1].raw_value, Some(-24.0));
        assert_eq!(out.traits()[1].score, inward.traits()[1].score);
        assert_eq!(out.traits()[1].score.map(Score::value), Some(5));
    }
}
