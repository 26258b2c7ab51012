pub mod builder;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use classifier_common::{AnimalInfo, ScaleFactor};
use rand::Rng;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    aggregate::{AggregateScore, Grade, GradingScheme},
    baseline::generate_baseline,
    bcs::{BcsEstimate, BcsEstimator},
    breed_tables::ScoringConfig,
    error::{ConformationError, Result},
    extract::{FrameContext, TraitExtractor},
    keypoints::KeypointSet,
    merge::{merge_into, AppliedUpdate, ViewOutcome, ViewOutcomes, ViewStatus},
    milk_yield::{self, MilkYieldEstimate},
    record::OfficialRecord,
    registry::{KeypointDetector, ModelRegistry, ViewFrame},
    rubric::Section,
    types::ViewResult,
    view::View,
};

pub const CLASSIFIED_BY_MODELS: &str = "AI System (Keypoint Models)";
pub const CLASSIFIED_BY_BASELINE: &str = "AI System (Mock Data)";
pub const CONFIDENCE_LEVEL: u8 = 88;

/// Source of the classification timestamp
pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Header of the official classification sheet
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficialFormat {
    pub village_name: String,
    pub farmer_name: String,
    pub animal_tag_no: String,
    pub date_of_birth: String,
    pub lactation_no: u32,
    pub date_of_calving: String,
    pub classification_date: String,
    pub classified_by: String,
    pub sections: OfficialRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSummary {
    /// True when at least one view was measured in centimetres
    pub calibrated: bool,
    pub views: BTreeMap<View, ScaleFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationMetadata {
    pub views: Vec<ViewStatus>,
    pub bcs: Option<BcsEstimate>,
    pub scale: ScaleSummary,
    pub unmatched_traits: Vec<String>,
    pub applied_updates: Vec<AppliedUpdate>,
    pub grading: GradingScheme,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub animal_info: AnimalInfo,
    pub official_format: OfficialFormat,
    pub category_scores: BTreeMap<Section, f64>,
    pub overall_score: f64,
    pub grade: Grade,
    pub total_traits: usize,
    pub confidence_level: u8,
    pub milk_yield_prediction: MilkYieldEstimate,
    pub metadata: ClassificationMetadata,
}

impl ClassificationResult {
    pub fn record(&self) -> &OfficialRecord {
        &self.official_format.sections
    }
}

/// Runs detection, extraction, merge and scoring for one animal
pub struct ClassificationPipeline {
    extractors: Vec<Box<dyn TraitExtractor>>,
    bcs_estimator: Box<dyn BcsEstimator>,
    scoring: ScoringConfig,
    clock: Clock,
}

impl ClassificationPipeline {
    pub fn builder() -> builder::ClassificationPipelineBuilder {
        builder::ClassificationPipelineBuilder::new()
    }

    pub fn new(
        extractors: Vec<Box<dyn TraitExtractor>>,
        bcs_estimator: Box<dyn BcsEstimator>,
        scoring: ScoringConfig,
        clock: Clock,
    ) -> Self {
        Self {
            extractors,
            bcs_estimator,
            scoring,
            clock,
        }
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn views(&self) -> impl Iterator<Item = View> + '_ {
        self.extractors.iter().map(|e| e.view())
    }

    fn extractor(&self, view: View) -> Option<&dyn TraitExtractor> {
        self.extractors.iter().find(|e| e.view() == view).map(|e| e.as_ref())
    }

    /// Classify from frames, running each view's registered detector.
    ///
    /// Never fails: a view with no frame or no detector is left at baseline
    /// values, and a view whose detection or extraction fails is reported
    /// and skipped.
    pub fn classify<R: Rng>(
        &self,
        registry: &ModelRegistry,
        frames: &[ViewFrame],
        animal: AnimalInfo,
        rng: &mut R,
    ) -> ClassificationResult {
        let mut outcomes = ViewOutcomes::new();
        let mut rear = None;
        let mut scales = BTreeMap::new();

        for extractor in &self.extractors {
            let view = extractor.view();
            let Some(frame) = frames.iter().find(|f| f.view == view) else {
                debug!(%view, "no frame for view");
                outcomes.insert(view, ViewOutcome::Missing);
                continue;
            };
            let Some(detector) = registry.get(view) else {
                warn!(%view, "no detector registered, keeping baseline values");
                outcomes.insert(view, ViewOutcome::Missing);
                continue;
            };
            if let Some(scale) = frame.scale {
                scales.insert(view, scale);
            }

            match self.run_view(extractor.as_ref(), detector, frame) {
                Ok((keypoints, result)) => {
                    if view == View::Rear {
                        rear = Some(keypoints);
                    }
                    outcomes.insert_result(result);
                }
                Err(err) => {
                    warn!(%view, error = %err, "view failed, keeping baseline values");
                    outcomes.insert(view, ViewOutcome::Failed { reason: err.to_string() });
                }
            }
        }

        self.finish(outcomes, rear.as_ref(), scales, animal, rng)
    }

    /// Classify from keypoints the caller detected itself
    pub fn classify_keypoints<R: Rng>(
        &self,
        views: Vec<(KeypointSet, FrameContext)>,
        animal: AnimalInfo,
        rng: &mut R,
    ) -> ClassificationResult {
        let mut outcomes = ViewOutcomes::new();
        let mut rear = None;
        let mut scales = BTreeMap::new();

        for (keypoints, frame) in views {
            let view = keypoints.view();
            let Some(extractor) = self.extractor(view) else {
                warn!(%view, "no extractor for view, ignoring keypoints");
                continue;
            };
            if let Some(scale) = frame.scale {
                scales.insert(view, scale);
            }

            match extractor.extract(&keypoints, &frame) {
                Ok(result) => {
                    outcomes.insert_result(result);
                    if view == View::Rear {
                        rear = Some(keypoints);
                    }
                }
                Err(err) => {
                    warn!(%view, error = %err, "view failed, keeping baseline values");
                    outcomes.insert(view, ViewOutcome::Failed { reason: err.to_string() });
                }
            }
        }

        self.finish(outcomes, rear.as_ref(), scales, animal, rng)
    }

    fn run_view(
        &self,
        extractor: &dyn TraitExtractor,
        detector: &dyn KeypointDetector,
        frame: &ViewFrame,
    ) -> Result<(KeypointSet, ViewResult)> {
        if detector.model_name() != extractor.model_name() {
            debug!(
                view = %frame.view,
                detector = detector.model_name(),
                expected = extractor.model_name(),
                "detector model differs from extractor's"
            );
        }

        let detected = detector.detect(frame).map_err(|e| ConformationError::Detection {
            view: frame.view,
            reason: e.to_string(),
        })?;
        let keypoints = KeypointSet::from_detected(
            frame.view,
            extractor.keypoint_names(),
            &detected,
            self.scoring.min_keypoint_confidence,
        )?;
        let result = extractor.extract(&keypoints, &frame.context())?;

        Ok((keypoints, result))
    }

    fn finish<R: Rng>(
        &self,
        outcomes: ViewOutcomes,
        rear: Option<&KeypointSet>,
        scales: BTreeMap<View, ScaleFactor>,
        mut animal: AnimalInfo,
        rng: &mut R,
    ) -> ClassificationResult {
        if let Err(err) = animal.validate() {
            warn!(error = %err, "animal metadata out of range, classifying anyway");
        }
        let now = (self.clock)();
        let tag = animal.ensure_tag_number(now).to_string();

        let mut record = generate_baseline(rng);

        let (scheme, classified_by, bcs) = if outcomes.any_contributed() {
            let bcs = match self.bcs_estimator.estimate(rear) {
                Ok(bcs) => Some(bcs),
                Err(err) => {
                    warn!(error = %err, "body condition estimate failed");
                    None
                }
            };
            (GradingScheme::FourTier, CLASSIFIED_BY_MODELS, bcs)
        } else {
            info!("no view produced traits, using baseline record");
            (GradingScheme::TwoTier, CLASSIFIED_BY_BASELINE, None)
        };

        let report = merge_into(&mut record, &outcomes, bcs.as_ref());
        let aggregate = AggregateScore::compute(&record, scheme);
        let milk_yield = milk_yield::estimate(&record, &animal);

        info!(
            tag = %tag,
            contributing = ?outcomes.contributing(),
            overall = aggregate.overall_score,
            grade = %aggregate.grade,
            "classification complete"
        );

        let official_format = OfficialFormat {
            village_name: animal.village.clone(),
            farmer_name: animal.farmer_name.clone(),
            animal_tag_no: tag,
            date_of_birth: animal.date_of_birth.clone(),
            lactation_no: animal.lactation_number,
            date_of_calving: animal.date_of_calving.clone(),
            classification_date: now.format("%Y-%m-%d").to_string(),
            classified_by: classified_by.to_string(),
            sections: record,
        };

        let metadata = ClassificationMetadata {
            views: report.views,
            bcs,
            scale: ScaleSummary {
                calibrated: !scales.is_empty(),
                views: scales,
            },
            unmatched_traits: report.unmatched,
            applied_updates: report.applied,
            grading: scheme,
        };

        ClassificationResult {
            animal_info: animal,
            total_traits: official_format.sections.len(),
            official_format,
            category_scores: aggregate.category_scores,
            overall_score: aggregate.overall_score,
            grade: aggregate.grade,
            confidence_level: CONFIDENCE_LEVEL,
            milk_yield_prediction: milk_yield,
            metadata,
        }
    }
}

impl Default for ClassificationPipeline {
    fn default() -> Self {
        Self::builder().build()
    }
}
