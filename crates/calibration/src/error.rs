use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Invalid calibration config: {0}")]
    InvalidConfig(String),

    #[error("Scale error: {0}")]
    Scale(#[from] classifier_common::CommonError),
}

pub type Result<T> = std::result::Result<T, CalibrationError>;
