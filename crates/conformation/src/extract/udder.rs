//! Udder view (from behind, looking up at the teats).

use super::{Measure, Recipe, RecipeExtractor, Scorer};
use crate::{scoring, view::View};

pub const MODEL: &str = "udder_view_model";

/// Base then tip for front-left, front-right, rear-left, rear-right
pub const KEYPOINTS: &[&str] = &["pt_1", "pt_2", "pt_3", "pt_4", "pt_5", "pt_6", "pt_7", "pt_8"];

const TEATS: &[(&str, &str)] = &[("pt_1", "pt_2"), ("pt_3", "pt_4"), ("pt_5", "pt_6"), ("pt_7", "pt_8")];

pub const RECIPES: &[Recipe] = &[
    Recipe::new(
        "Front Teat Placement",
        Measure::Distance("pt_1", "pt_3"),
        Scorer::Table(scoring::TEAT_PLACEMENT),
    ),
    Recipe::new(
        "Rear Teat Placement",
        Measure::Distance("pt_5", "pt_7"),
        Scorer::Table(scoring::TEAT_PLACEMENT),
    ),
    Recipe::new(
        "Teat Length",
        Measure::MeanDistance { pairs: TEATS, divisor: 1.0 },
        Scorer::Table(scoring::TEAT_LENGTH),
    ),
    // Proxy derived from length, not measured
    Recipe::new(
        "Teat Thickness",
        Measure::MeanDistance { pairs: TEATS, divisor: 3.0 },
        Scorer::Table(scoring::TEAT_THICKNESS),
    ),
    Recipe::new(
        "Rear Udder Width",
        Measure::Distance("pt_5", "pt_7"),
        Scorer::Table(scoring::REAR_UDDER_WIDTH),
    ),
    Recipe::new(
        "Rear Udder Height",
        Measure::OffsetFromBottom("pt_5", "pt_7"),
        Scorer::Table(scoring::REAR_UDDER_HEIGHT),
    ),
];

pub fn extractor() -> RecipeExtractor {
    RecipeExtractor::new(View::Udder, MODEL, KEYPOINTS, RECIPES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        extract::{FrameContext, TraitExtractor},
        keypoints::{KeypointSet, RawKeypoint},
        types::Score,
    };

    fn udder(points: [Option<[f64; 2]>; 8]) -> KeypointSet {
        let raw = points.map(|p| p.map(RawKeypoint::Xy));
        KeypointSet::from_indexed(View::Udder, KEYPOINTS, &raw, 0.0).unwrap()
    }

    fn full() -> KeypointSet {
        udder([
            Some([200.0, 300.0]),
            Some([200.0, 350.0]),
            Some([270.0, 300.0]),
            Some([270.0, 350.0]),
            Some([190.0, 400.0]),
            Some([190.0, 440.0]),
            Some([290.0, 400.0]),
            Some([290.0, 440.0]),
        ])
    }

    #[test]
    fn test_all_six_traits_with_frame_height() {
        let frame = FrameContext {
            image_height: Some(640.0),
            scale: None,
        };
        let result = extractor().extract(&full(), &frame).unwrap();
        let values: Vec<(&str, Option<f64>, Option<u8>)> = result
            .traits()
            .iter()
            .map(|t| (t.trait_name.as_str(), t.raw_value, t.score.map(Score::value)))
            .collect();

        assert_eq!(
            values,
            vec![
                ("Front Teat Placement", Some(70.0), Some(9)),
                ("Rear Teat Placement", Some(100.0), Some(5)),
                ("Teat Length", Some(45.0), Some(9)),
                ("Teat Thickness", Some(15.0), Some(9)),
                ("Rear Udder Width", Some(100.0), Some(9)),
                ("Rear Udder Height", Some(240.0), Some(9)),
            ]
        );
    }

    #[test]
    fn test_rear_udder_height_needs_frame_height() {
        let result = extractor().extract(&full(), &FrameContext::default()).unwrap();
        assert_eq!(result.traits().len(), 5);
        assert!(result.traits().iter().all(|t| t.trait_name != "Rear Udder Height"));
    }

    #[test]
    fn test_teat_length_uses_present_pairs_only() {
        let keypoints = udder([
            Some([200.0, 300.0]),
            Some([200.0, 360.0]),
            Some([270.0, 300.0]),
            None,
            None,
            None,
            None,
            None,
        ]);
        let result = extractor().extract(&keypoints, &FrameContext::default()).unwrap();
        let names: Vec<&str> = result.traits().iter().map(|t| t.trait_name.as_str()).collect();
        assert_eq!(names, vec!["Front Teat Placement", "Teat Length", "Teat Thickness"]);
        assert_eq!(result.traits()[1].raw_value, Some(60.0));
        assert_eq!(result.traits()[2].raw_value, Some(20.0));
    }
}
