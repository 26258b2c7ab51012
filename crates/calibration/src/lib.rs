//! # Calibration
//!
//! Finds a square sticker of known size and colour in a frame and turns it
//! into a pixel to centimetre factor. A frame without a usable marker simply
//! has no scale; measurements then stay in pixels.
//!
//! ```rust,no_run
//! use calibration::{CalibrationConfig, ScaleCalibrator};
//!
//! let calibrator = ScaleCalibrator::new(CalibrationConfig::default())?;
//! let frame = calibrator.calibrate_path("side.jpg")?;
//! if let Some(scale) = frame.scale {
//!     println!("{} cm per pixel", scale.cm_per_px);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod calibrator;
pub mod config;
pub mod error;
pub mod hsv;
pub mod letterbox;

pub use calibrator::{FrameCalibration, MarkerMeasurement, MarkerSegmenter, ScaleCalibrator};
pub use config::CalibrationConfig;
pub use error::{CalibrationError, Result};
pub use hsv::HsvRange;
pub use letterbox::{letterbox, Letterbox};
