use std::collections::BTreeMap;

use classifier_common::Point2D;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConformationError, Result},
    view::View,
};

/// Named anatomical landmark located by a detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Keypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// One raw detector output point, optionally with its confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawKeypoint {
    Xy([f64; 2]),
    Scored { x: f64, y: f64, confidence: f64 },
}

impl RawKeypoint {
    pub fn point(&self) -> Point2D {
        match *self {
            Self::Xy([x, y]) => Point2D::new(x, y),
            Self::Scored { x, y, .. } => Point2D::new(x, y),
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match *self {
            Self::Xy(_) => None,
            Self::Scored { confidence, .. } => Some(confidence),
        }
    }

    fn accepted(&self, min_confidence: f64) -> bool {
        self.point().is_finite() && self.confidence().is_none_or(|c| c >= min_confidence)
    }
}

/// Detector output for one view, in either of the two shapes detectors emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DetectedKeypoints {
    /// Index `i` belongs to name `i` of the view's canonical list
    Indexed(Vec<Option<RawKeypoint>>),
    /// Keyed by canonical keypoint name
    Named(BTreeMap<String, RawKeypoint>),
}

/// A view's fixed, ordered keypoint names paired with what was detected
#[derive(Debug, Clone, PartialEq)]
pub struct KeypointSet {
    view: View,
    entries: Vec<(&'static str, Option<Point2D>)>,
}

impl KeypointSet {
    /// Empty set: every canonical name absent
    pub fn empty(view: View, names: &'static [&'static str]) -> Self {
        Self {
            view,
            entries: names.iter().map(|&name| (name, None)).collect(),
        }
    }

    /// Build from index-ordered detector output.
    ///
    /// Missing trailing indices are absent. More points than canonical names
    /// breaks the index contract with the detector.
    pub fn from_indexed(
        view: View,
        names: &'static [&'static str],
        raw: &[Option<RawKeypoint>],
        min_confidence: f64,
    ) -> Result<Self> {
        if raw.len() > names.len() {
            return Err(ConformationError::KeypointContract {
                view,
                details: format!(
                    "detector produced {} points, canonical list has {}",
                    raw.len(),
                    names.len()
                ),
            });
        }

        let entries = names
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let point = raw
                    .get(i)
                    .copied()
                    .flatten()
                    .filter(|kp| kp.accepted(min_confidence))
                    .map(|kp| kp.point());
                (name, point)
            })
            .collect();

        Ok(Self { view, entries })
    }

    /// Build from name-keyed detector output; unknown names break the contract.
    pub fn from_named(
        view: View,
        names: &'static [&'static str],
        raw: &BTreeMap<String, RawKeypoint>,
        min_confidence: f64,
    ) -> Result<Self> {
        if let Some(unknown) = raw.keys().find(|k| !names.iter().any(|n| *n == k.as_str())) {
            return Err(ConformationError::KeypointContract {
                view,
                details: format!("unknown keypoint name '{unknown}'"),
            });
        }

        let entries = names
            .iter()
            .map(|&name| {
                let point = raw
                    .get(name)
                    .filter(|kp| kp.accepted(min_confidence))
                    .map(|kp| kp.point());
                (name, point)
            })
            .collect();

        Ok(Self { view, entries })
    }

    pub fn from_detected(
        view: View,
        names: &'static [&'static str],
        detected: &DetectedKeypoints,
        min_confidence: f64,
    ) -> Result<Self> {
        match detected {
            DetectedKeypoints::Indexed(raw) => Self::from_indexed(view, names, raw, min_confidence),
            DetectedKeypoints::Named(raw) => Self::from_named(view, names, raw, min_confidence),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn get(&self, name: &str) -> Option<Point2D> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, p)| *p)
    }

    /// All requested points, or `None` as soon as one is absent
    pub fn require<const N: usize>(&self, names: [&str; N]) -> Option<[Point2D; N]> {
        let mut points = [Point2D::new(0.0, 0.0); N];
        for (slot, name) in points.iter_mut().zip(names) {
            *slot = self.get(name)?;
        }
        Some(points)
    }

    pub fn detected_count(&self) -> usize {
        self.entries.iter().filter(|(_, p)| p.is_some()).count()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    /// Detected points as named keypoints, in canonical order
    pub fn keypoints(&self) -> Vec<Keypoint> {
        self.entries
            .iter()
            .filter_map(|(name, p)| {
                p.map(|p| Keypoint {
                    name: (*name).to_string(),
                    x: p.x,
                    y: p.y,
                })
            })
            .collect()
    }
}
