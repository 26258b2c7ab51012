use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use classifier_common::{AnimalInfo, ScaleFactor};
use conformation::{
    extract::{extractor_for, FrameContext, TraitExtractor},
    merge::{MatchKind, ViewState},
    ClassificationPipeline, DetectedKeypoints, DetectionError, Grade, GradingScheme, KeypointDetector,
    KeypointSet, ModelRegistry, RawKeypoint, ScoringProfile, Section, Unit, View, ViewFrame,
};
use rand::{rngs::StdRng, SeedableRng};

fn clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 2)
        .and_then(|d| d.and_hms_opt(11, 0, 0))
        .unwrap()
}

fn indexed(points: &[[f64; 2]]) -> DetectedKeypoints {
    DetectedKeypoints::Indexed(points.iter().map(|p| Some(RawKeypoint::Xy(*p))).collect())
}

fn detections() -> Vec<(View, DetectedKeypoints)> {
    let side: BTreeMap<String, RawKeypoint> = [
        ("wither", [470.0, 100.0]),
        ("hoof", [470.0, 480.0]),
        ("shoulderbone", [150.0, 180.0]),
        ("pinbone", [480.0, 180.0]),
        ("chest_top", [160.0, 120.0]),
        ("elbow", [160.0, 340.0]),
        ("body_girth_top", [300.0, 110.0]),
        ("belly_deepest_point", [300.0, 280.0]),
        ("rear_elbow", [420.0, 260.0]),
        ("spine_between_hips", [430.0, 100.0]),
        ("hip_bone", [440.0, 130.0]),
        ("hock", [470.0, 380.0]),
        ("hairline_hoof", [460.0, 470.0]),
        ("hoof_tip", [471.0, 480.0]),
    ]
    .into_iter()
    .map(|(name, xy)| (name.to_string(), RawKeypoint::Xy(xy)))
    .collect();

    vec![
        (
            View::Rear,
            indexed(&[
                [100.0, 200.0],
                [360.0, 200.0],
                [150.0, 150.0],
                [310.0, 150.0],
                [140.0, 700.0],
                [320.0, 700.0],
                [130.0, 900.0],
                [330.0, 900.0],
            ]),
        ),
        (View::Side, DetectedKeypoints::Named(side)),
        (
            View::Top,
            indexed(&[
                [100.0, 200.0],
                [150.0, 260.0],
                [300.0, 260.0],
                [120.0, 400.0],
                [350.0, 200.0],
            ]),
        ),
        (
            View::Udder,
            indexed(&[
                [200.0, 300.0],
                [200.0, 350.0],
                [270.0, 300.0],
                [270.0, 350.0],
                [190.0, 400.0],
                [190.0, 440.0],
                [290.0, 400.0],
                [290.0, 440.0],
            ]),
        ),
        (
            View::SideUdder,
            indexed(&[
                [300.0, 400.0],
                [340.0, 370.0],
                [200.0, 370.0],
                [420.0, 430.0],
                [310.0, 455.0],
            ]),
        ),
    ]
}

struct Precomputed(DetectedKeypoints);

impl KeypointDetector for Precomputed {
    fn model_name(&self) -> &str {
        "precomputed"
    }

    fn detect(&self, _frame: &ViewFrame) -> Result<DetectedKeypoints, DetectionError> {
        Ok(self.0.clone())
    }
}

fn registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    for (view, detected) in detections() {
        registry.register(view, Precomputed(detected));
    }
    registry
}

fn frames() -> Vec<ViewFrame> {
    View::MERGE_ORDER
        .iter()
        .map(|&view| ViewFrame::new(view).with_image_height(640.0))
        .collect()
}

fn keypoint_sets() -> Vec<(KeypointSet, FrameContext)> {
    detections()
        .into_iter()
        .map(|(view, detected)| {
            let names = extractor_for(view).keypoint_names();
            let set = KeypointSet::from_detected(view, names, &detected, 0.0).unwrap();
            let frame = FrameContext {
                image_height: Some(640.0),
                scale: None,
            };
            (set, frame)
        })
        .collect()
}

fn pipeline() -> ClassificationPipeline {
    ClassificationPipeline::builder().with_clock(clock).build()
}

fn holstein() -> AnimalInfo {
    AnimalInfo {
        tag_number: Some("IN-42".to_string()),
        breed: "Holstein".to_string(),
        lactation_number: 3,
        ..AnimalInfo::default()
    }
}

#[test]
fn test_baseline_only_end_to_end() {
    for seed in 0..20 {
        let result = pipeline()
            .classify(&ModelRegistry::new(), &[], holstein(), &mut StdRng::seed_from_u64(seed));

        assert_eq!(result.total_traits, 20);
        assert_eq!(result.record().scored_count(), 20);
        assert!((5.0..=8.0).contains(&result.overall_score));
        assert!(matches!(result.grade, Grade::Fair | Grade::Good));
        assert_eq!(result.official_format.classified_by, "AI System (Mock Data)");
        assert_eq!(result.official_format.animal_tag_no, "IN-42");
        assert_eq!(result.category_scores.len(), 5);
        assert!(result.milk_yield_prediction.daily_yield > 0.0);
    }
}

#[test]
fn test_all_five_views_merge_over_baseline() {
    let result = pipeline()
        .classify(&registry(), &frames(), holstein(), &mut StdRng::seed_from_u64(11));
    let record = result.record();
    let score = |name: &str| record.score_of(name).map(u8::from);

    assert_eq!(result.official_format.classified_by, "AI System (Keypoint Models)");
    assert_eq!(result.metadata.grading, GradingScheme::FourTier);
    assert!(result.metadata.views.iter().all(|v| v.state == ViewState::Contributed));

    assert_eq!(score("Rump Width"), Some(8));
    assert_eq!(score("Rear Legs Rear View"), Some(6));
    assert_eq!(score("Stature"), Some(8));
    assert_eq!(score("Body Depth"), Some(8));
    assert_eq!(score("Foot Angle"), Some(9));
    assert_eq!(score("Rear Teat Placement"), Some(5));
    assert_eq!(score("Rear udder width"), Some(9));
    assert_eq!(score("Teat thickness"), Some(9));
    assert_eq!(score("Fore Udder Attachment"), Some(3));
    assert_eq!(score("Body condition score"), Some(5));

    assert_eq!(record.measurement_of("Stature"), Some(380.0));
    assert_eq!(record.slot("Stature").unwrap().unit(), Unit::Pixels);
    assert_eq!(record.slot("Angularity").unwrap().unit(), Unit::Degrees);

    assert_eq!(result.category_scores[&Section::Rump], 8.5);
    assert_eq!(result.category_scores[&Section::FeetAndLeg], 7.0);
    assert_eq!(result.category_scores[&Section::Udder], 7.9);
    assert_eq!(result.category_scores[&Section::General], 5.0);
    assert!(result.overall_score >= 7.5);
    assert_eq!(result.grade, Grade::Excellent);
    assert!(!result.metadata.scale.calibrated);
}

#[test]
fn test_lowercase_slots_fill_through_substring_match() {
    let result = pipeline()
        .classify(&registry(), &frames(), holstein(), &mut StdRng::seed_from_u64(3));
    let applied = &result.metadata.applied_updates;

    let width = applied.iter().find(|u| u.slot == "Rear udder width").unwrap();
    assert_eq!(width.source, "Rear Udder Width");
    assert_eq!(width.kind, MatchKind::Substring);

    let thickness = applied.iter().find(|u| u.slot == "Teat thickness").unwrap();
    assert_eq!(thickness.source, "Teat Thickness");
    assert_eq!(thickness.kind, MatchKind::Substring);
}

#[test]
fn test_chest_width_reaches_no_slot() {
    let result = pipeline()
        .classify(&registry(), &frames(), holstein(), &mut StdRng::seed_from_u64(5));

    assert_eq!(result.metadata.unmatched_traits, vec!["Chest Width".to_string()]);
    assert!(result.record().slot("Chest Width").is_none());
    let top = result.metadata.views.iter().find(|v| v.view == View::Top).unwrap();
    assert_eq!(top.state, ViewState::Contributed);
    assert_eq!(top.traits, 1);
}

#[test]
fn test_arrival_order_does_not_change_result() {
    let forward = pipeline()
        .classify_keypoints(keypoint_sets(), holstein(), &mut StdRng::seed_from_u64(21));

    let mut reversed_sets = keypoint_sets();
    reversed_sets.reverse();
    let reversed = pipeline()
        .classify_keypoints(reversed_sets, holstein(), &mut StdRng::seed_from_u64(21));

    assert_eq!(forward, reversed);
}

#[test]
fn test_detector_and_keypoint_entries_agree() {
    let from_frames = pipeline()
        .classify(&registry(), &frames(), holstein(), &mut StdRng::seed_from_u64(8));
    let from_keypoints = pipeline()
        .classify_keypoints(keypoint_sets(), holstein(), &mut StdRng::seed_from_u64(8));

    assert_eq!(from_frames.record(), from_keypoints.record());
    assert_eq!(from_frames.overall_score, from_keypoints.overall_score);
}

#[test]
fn test_gir_profile_with_scaled_side_view() {
    let pipeline = ClassificationPipeline::builder()
        .profile(ScoringProfile::GirCalibrated)
        .with_clock(clock)
        .build();
    let scale = ScaleFactor::new(0.35).unwrap();
    let frames: Vec<ViewFrame> = frames()
        .into_iter()
        .map(|f| if f.view == View::Side { f.with_scale(Some(scale)) } else { f })
        .collect();

    let result = pipeline
        .classify(&registry(), &frames, holstein(), &mut StdRng::seed_from_u64(9));

    assert_eq!(result.record().measurement_of("Stature"), Some(133.0));
    assert_eq!(result.record().slot("Stature").unwrap().unit(), Unit::Centimeters);
    assert_eq!(result.record().score_of("Stature").map(u8::from), Some(9));
    assert!(result.metadata.scale.calibrated);
    assert_eq!(result.metadata.scale.views.get(&View::Side), Some(&scale));
}

#[test]
fn test_result_serializes_with_official_field_names() {
    let result = pipeline()
        .classify(&registry(), &frames(), holstein(), &mut StdRng::seed_from_u64(2));
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["totalTraits"], 20);
    assert_eq!(json["confidenceLevel"], 88);
    assert_eq!(json["officialFormat"]["animalTagNo"], "IN-42");
    assert_eq!(json["officialFormat"]["classificationDate"], "2025-06-02");
    assert!(json["officialFormat"]["sections"]["Feet and Leg"].is_array());
    assert!(json["categoryScores"]["Udder"].is_number());
    assert_eq!(json["milkYieldPrediction"]["unit"], "liters/day");
    assert!(json["metadata"]["unmatchedTraits"].is_array());
}
