use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use calibration::{CalibrationConfig, CalibrationError, ScaleCalibrator};
use classifier_common::{AnimalInfo, CommonError, ScaleFactor};
use conformation::{
    BcsEstimate, BcsEstimator, ClassificationPipeline, ClassificationResult, ConformationError,
    DetectedKeypoints, DetectionError, KeypointDetector, ModelRegistry, Score, ScoringConfig, View,
    ViewFrame,
};
use rand::{rngs::StdRng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Classification(#[from] ConformationError),
    #[error("Invalid animal info: {0}")]
    AnimalInfo(#[from] CommonError),
    #[error("Invalid scale for {view} view: {value}")]
    InvalidScale { view: View, value: f64 },
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

type Result<T> = std::result::Result<T, ClassifierError>;

/// Runtime settings for the classifier binary
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Fixed seed for the baseline record; random when absent
    pub seed: Option<u64>,
    pub scoring: ScoringConfig,
    pub calibration: CalibrationConfig,
}

impl ClassifierConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ClassifierError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Save configuration, picking the format from the extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(ClassifierError::UnsupportedFileFormat),
        };
        fs::write(path, content)?;
        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// What the caller knows about one view
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewPayload {
    /// Detector output, indexed or keyed by keypoint name
    pub keypoints: Option<DetectedKeypoints>,
    /// Frame to calibrate against; relative to the request file
    pub image: Option<PathBuf>,
    /// Height of the frame the keypoints refer to
    pub image_height: Option<f64>,
    /// Model that produced the keypoints
    pub model: Option<String>,
    /// Known scale, skips marker detection
    pub cm_per_px: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassificationRequest {
    pub animal_info: AnimalInfo,
    pub views: BTreeMap<View, ViewPayload>,
    /// Body condition score from an external source
    pub bcs: Option<Score>,
}

impl ClassificationRequest {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a request and anchor its image paths to the file's directory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut request = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&fs::read_to_string(path)?)?,
            Some("toml") => toml::from_str(&fs::read_to_string(path)?)?,
            _ => return Err(ClassifierError::UnsupportedFileFormat),
        };
        if let Some(base) = path.parent() {
            request.resolve_images(base);
        }
        Ok(request)
    }

    pub fn resolve_images(&mut self, base: &Path) {
        for payload in self.views.values_mut() {
            if let Some(image) = payload.image.as_mut() {
                if image.is_relative() {
                    *image = base.join(&*image);
                }
            }
        }
    }

    /// Turn the request into detectors and frames for the pipeline
    pub fn prepare(&self, calibrator: Option<&ScaleCalibrator>) -> Result<(ModelRegistry, Vec<ViewFrame>)> {
        let mut registry = ModelRegistry::new();
        let mut frames = Vec::new();

        for (&view, payload) in &self.views {
            let mut frame = ViewFrame::new(view);

            if let Some(image) = &payload.image {
                frame = frame.with_source(image);
                if let Some(calibrator) = calibrator {
                    match calibrator.calibrate_path(image) {
                        Ok(calibrated) => {
                            frame = frame
                                .with_scale(calibrated.scale)
                                .with_image_height(f64::from(calibrated.frame_height));
                        }
                        Err(err) => warn!(%view, error = %err, "calibration skipped"),
                    }
                }
            }
            if let Some(height) = payload.image_height {
                frame = frame.with_image_height(height);
            }
            if let Some(value) = payload.cm_per_px {
                let scale = ScaleFactor::new(value).map_err(|_| ClassifierError::InvalidScale { view, value })?;
                frame = frame.with_scale(Some(scale));
            }

            if let Some(keypoints) = &payload.keypoints {
                let model = payload.model.clone().unwrap_or_else(|| "precomputed".to_string());
                registry.register(view, PrecomputedDetector::new(model, keypoints.clone()));
            }
            frames.push(frame);
        }

        Ok((registry, frames))
    }
}

/// Serves keypoints detected ahead of time
#[derive(Debug, Clone)]
pub struct PrecomputedDetector {
    model: String,
    keypoints: DetectedKeypoints,
}

impl PrecomputedDetector {
    pub fn new(model: impl Into<String>, keypoints: DetectedKeypoints) -> Self {
        Self {
            model: model.into(),
            keypoints,
        }
    }
}

impl KeypointDetector for PrecomputedDetector {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn detect(&self, _frame: &ViewFrame) -> std::result::Result<DetectedKeypoints, DetectionError> {
        Ok(self.keypoints.clone())
    }
}

/// BCS supplied with the request
#[derive(Debug, Clone, Copy)]
pub struct SuppliedBcs(pub Score);

impl BcsEstimator for SuppliedBcs {
    fn estimate(&self, _rear: Option<&conformation::KeypointSet>) -> conformation::Result<BcsEstimate> {
        Ok(BcsEstimate::new(self.0, "request"))
    }
}

pub fn build_pipeline(config: &ClassifierConfig, bcs: Option<Score>) -> ClassificationPipeline {
    let builder = ClassificationPipeline::builder().scoring(config.scoring);
    match bcs {
        Some(score) => builder.set_bcs_estimator(SuppliedBcs(score)).build(),
        None => builder.build(),
    }
}

/// Calibrate, detect, merge and score one request
pub fn classify_request(
    request: &ClassificationRequest,
    config: &ClassifierConfig,
    calibrate: bool,
) -> Result<ClassificationResult> {
    request.animal_info.validate()?;
    let calibrator = if calibrate {
        Some(ScaleCalibrator::new(config.calibration)?)
    } else {
        None
    };
    let (registry, frames) = request.prepare(calibrator.as_ref())?;
    info!(views = frames.len(), detectors = registry.len(), "request prepared");

    let pipeline = build_pipeline(config, request.bcs);
    Ok(pipeline.classify(&registry, &frames, request.animal_info.clone(), &mut config.rng()))
}
