use thiserror::Error;

use crate::view::View;

#[derive(Error, Debug)]
pub enum ConformationError {
    #[error("Keypoint contract violated for {view} view: {details}")]
    KeypointContract { view: View, details: String },

    #[error("Score {0} outside 1-9")]
    ScoreOutOfRange(i64),

    #[error("Extractor for {extractor} view received {keypoints} keypoints")]
    ViewMismatch { extractor: View, keypoints: View },

    #[error("Detection failed for {view} view: {reason}")]
    Detection { view: View, reason: String },

    #[error("Invalid animal metadata: {0}")]
    AnimalInfo(#[from] classifier_common::CommonError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConformationError>;
