//! Keypoint detector seam and the per-request model registry.
//!
//! Detectors are owned by whoever loads them and handed to the pipeline
//! through a [`ModelRegistry`]; nothing here holds global state.

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use classifier_common::ScaleFactor;
use thiserror::Error;
use tracing::debug;

use crate::{extract::FrameContext, keypoints::DetectedKeypoints, view::View};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("Model {0} is not available")]
    ModelUnavailable(String),

    #[error("No animal detected in frame")]
    NothingDetected,

    #[error("Detection failed: {0}")]
    Failed(String),
}

/// One photograph of the animal, as handed to a detector
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFrame {
    pub view: View,
    pub source: Option<PathBuf>,
    pub image_height: Option<f64>,
    pub scale: Option<ScaleFactor>,
}

impl ViewFrame {
    pub fn new(view: View) -> Self {
        Self {
            view,
            source: None,
            image_height: None,
            scale: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_image_height(mut self, height: f64) -> Self {
        self.image_height = Some(height);
        self
    }

    pub fn with_scale(mut self, scale: Option<ScaleFactor>) -> Self {
        self.scale = scale;
        self
    }

    pub fn context(&self) -> FrameContext {
        FrameContext {
            image_height: self.image_height,
            scale: self.scale,
        }
    }
}

/// A pose model that locates a view's keypoints in a frame
pub trait KeypointDetector: Send + Sync {
    fn model_name(&self) -> &str;

    fn detect(&self, frame: &ViewFrame) -> std::result::Result<DetectedKeypoints, DetectionError>;
}

/// Detectors available to a classification, one per view at most
#[derive(Default, Clone)]
pub struct ModelRegistry {
    detectors: BTreeMap<View, Arc<dyn KeypointDetector>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detector for a view, returning the one it replaces
    pub fn register<D>(&mut self, view: View, detector: D) -> Option<Arc<dyn KeypointDetector>>
    where
        D: KeypointDetector + 'static,
    {
        debug!(%view, model = detector.model_name(), "registering detector");
        self.detectors.insert(view, Arc::new(detector))
    }

    pub fn register_shared(&mut self, view: View, detector: Arc<dyn KeypointDetector>) -> Option<Arc<dyn KeypointDetector>> {
        self.detectors.insert(view, detector)
    }

    /// Drop a view's detector; the caller decides when the model is released
    pub fn unregister(&mut self, view: View) -> Option<Arc<dyn KeypointDetector>> {
        self.detectors.remove(&view)
    }

    pub fn get(&self, view: View) -> Option<&dyn KeypointDetector> {
        self.detectors.get(&view).map(|d| d.as_ref())
    }

    pub fn views(&self) -> impl Iterator<Item = View> + '_ {
        self.detectors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.detectors.iter().map(|(view, d)| (view, d.model_name())))
            .finish()
    }
}
