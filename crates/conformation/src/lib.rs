//! # Conformation
//!
//! Linear type classification of dairy cattle and buffalo from pose
//! keypoints. Five photographic views are turned into the 20 official
//! traits, scored 1-9, merged over a plausible baseline into one record,
//! and summarised as section means, an overall score, a grade and a milk
//! yield estimate.
//!
//! ## Core Features
//!
//! - **Data-driven extractors**: each view is a keypoint list plus recipes
//!   (geometric measure and scoring table)
//! - **Fixed rubric**: the 20-trait official sheet in five sections
//! - **Deterministic merge**: views apply in a fixed order whatever order
//!   they arrive in, with a reported best-effort name match
//! - **Breed calibration**: optional Gir reference ranges once a scale is known
//! - **Detector seam**: pose models plug in through [`KeypointDetector`]
//!   and an explicit [`ModelRegistry`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use classifier_common::AnimalInfo;
//! use conformation::{ClassificationPipeline, ModelRegistry};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let pipeline = ClassificationPipeline::builder().build();
//! let registry = ModelRegistry::new();
//!
//! // No detectors: every view is missing and the baseline record is returned
//! let result = pipeline.classify(&registry, &[], AnimalInfo::default(), &mut StdRng::seed_from_u64(7));
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod baseline;
pub mod bcs;
pub mod breed_tables;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod keypoints;
pub mod merge;
pub mod milk_yield;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod rubric;
pub mod scoring;
pub mod types;
pub mod view;

pub use aggregate::{AggregateScore, Grade, GradingScheme};
pub use baseline::generate_baseline;
pub use bcs::{BcsEstimate, BcsEstimator, PlaceholderBcsEstimator};
pub use breed_tables::{ScoringConfig, ScoringProfile};
pub use error::{ConformationError, Result};
pub use extract::{default_extractors, extractor_for, FrameContext, RecipeExtractor, TraitExtractor};
pub use keypoints::{DetectedKeypoints, KeypointSet, RawKeypoint};
pub use merge::{merge_into, MergeReport, ViewOutcome, ViewOutcomes};
pub use milk_yield::MilkYieldEstimate;
pub use pipeline::{builder::ClassificationPipelineBuilder, ClassificationPipeline, ClassificationResult};
pub use record::{OfficialRecord, TraitSlot};
pub use registry::{DetectionError, KeypointDetector, ModelRegistry, ViewFrame};
pub use rubric::{Section, TraitDefinition, RUBRIC};
pub use types::{Score, TraitMeasurement, Unit, ViewResult};
pub use view::View;
