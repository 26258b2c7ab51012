use std::path::Path;

use classifier_common::ScaleFactor;
use geo::{Area, MinimumRotatedRect};
use geo_types::{Coord, LineString, Polygon};
use image::{GrayImage, RgbImage};
use imageproc::{
    contours::{find_contours, BorderType},
    distance_transform::Norm,
    morphology,
};
use tracing::{debug, info};

use crate::{
    config::CalibrationConfig,
    error::{CalibrationError, Result},
    hsv::HsvRange,
    letterbox::letterbox,
};

/// Produces a binary mask of marker-coloured pixels
pub trait MarkerSegmenter: Send + Sync {
    fn segment(&self, image: &RgbImage) -> GrayImage;
}

impl MarkerSegmenter for HsvRange {
    fn segment(&self, image: &RgbImage) -> GrayImage {
        self.mask(image)
    }
}

/// The marker blob that set the scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerMeasurement {
    pub area_px: f64,
    /// Sides of the minimum-area rectangle around the blob
    pub width_px: f64,
    pub height_px: f64,
    pub scale: ScaleFactor,
}

/// Scale of a frame together with the height keypoints are measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCalibration {
    pub scale: Option<ScaleFactor>,
    pub frame_height: u32,
}

pub struct ScaleCalibrator {
    segmenter: Box<dyn MarkerSegmenter>,
    config: CalibrationConfig,
}

impl ScaleCalibrator {
    pub fn new(config: CalibrationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            segmenter: Box::new(config.hsv),
            config,
        })
    }

    /// Replace the colour segmentation step
    pub fn with_segmenter<S>(mut self, segmenter: S) -> Self
    where
        S: MarkerSegmenter + 'static,
    {
        self.segmenter = Box::new(segmenter);
        self
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Find the marker and derive centimetres per pixel, `None` if absent
    pub fn measure(&self, image: &RgbImage) -> Option<MarkerMeasurement> {
        let mask = self.segmenter.segment(image);
        let radius = self.config.kernel_radius;
        let mask = morphology::open(&mask, Norm::LInf, radius);
        let mask = morphology::close(&mask, Norm::LInf, radius);

        // Outermost contours only
        let (area, polygon) = find_contours::<i32>(&mask)
            .into_iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .map(|c| {
                let coords: Vec<Coord<f64>> = c
                    .points
                    .iter()
                    .map(|p| Coord { x: f64::from(p.x), y: f64::from(p.y) })
                    .collect();
                let polygon = Polygon::new(LineString::new(coords), vec![]);
                (polygon.unsigned_area(), polygon)
            })
            .max_by(|a, b| a.0.total_cmp(&b.0))?;

        if area < self.config.min_area {
            debug!(area, min_area = self.config.min_area, "marker blob too small");
            return None;
        }

        let rect = polygon.minimum_rotated_rect()?;
        let corners = &rect.exterior().0;
        if corners.len() < 3 {
            return None;
        }
        let side = |a: Coord<f64>, b: Coord<f64>| (b.x - a.x).hypot(b.y - a.y);
        let width = side(corners[0], corners[1]);
        let height = side(corners[1], corners[2]);

        let marker_px = width.max(height);
        if marker_px < 1.0 {
            return None;
        }

        let scale = ScaleFactor::new(self.config.marker_size_cm / marker_px).ok()?;
        Some(MarkerMeasurement {
            area_px: area,
            width_px: width,
            height_px: height,
            scale,
        })
    }

    pub fn calibrate(&self, image: &RgbImage) -> Option<ScaleFactor> {
        self.measure(image).map(|m| m.scale)
    }

    /// Load a frame, letterbox it when configured, and calibrate the frame
    /// the detector will see
    pub fn calibrate_path(&self, path: impl AsRef<Path>) -> Result<FrameCalibration> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgb8();
        let image = match self.config.letterbox_size {
            Some(size) => letterbox(&image, size).image,
            None => image,
        };

        let scale = self.calibrate(&image);
        match scale {
            Some(scale) => info!(path = %path.display(), cm_per_px = scale.cm_per_px, "marker found"),
            None => info!(path = %path.display(), "no marker, measurements stay in pixels"),
        }

        Ok(FrameCalibration {
            scale,
            frame_height: image.height(),
        })
    }
}

impl std::fmt::Debug for ScaleCalibrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaleCalibrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TryFrom<CalibrationConfig> for ScaleCalibrator {
    type Error = CalibrationError;

    fn try_from(config: CalibrationConfig) -> Result<Self> {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn scene(marker: Option<(u32, u32, u32)>) -> RgbImage {
        let mut image = RgbImage::from_pixel(200, 160, Rgb([120, 90, 60]));
        if let Some((x0, y0, size)) = marker {
            for y in y0..y0 + size {
                for x in x0..x0 + size {
                    image.put_pixel(x, y, Rgb([20, 200, 40]));
                }
            }
        }
        image
    }

    fn calibrator() -> ScaleCalibrator {
        ScaleCalibrator::new(CalibrationConfig::default()).unwrap()
    }

    #[test]
    fn test_square_marker_sets_scale() {
        let measurement = calibrator().measure(&scene(Some((60, 50, 40)))).unwrap();

        // contour runs through boundary pixel centres, 39px apart
        assert!((measurement.width_px.max(measurement.height_px) - 39.0).abs() < 1e-6);
        assert!((measurement.area_px - 1521.0).abs() < 1e-6);
        assert!((measurement.scale.cm_per_px - 17.0 / 39.0).abs() < 1e-6);
    }

    #[test]
    fn test_largest_blob_wins() {
        let mut image = scene(Some((10, 10, 40)));
        for y in 100..120 {
            for x in 150..170 {
                image.put_pixel(x, y, Rgb([20, 200, 40]));
            }
        }
        let measurement = calibrator().measure(&image).unwrap();
        assert!((measurement.area_px - 1521.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_marker() {
        assert!(calibrator().calibrate(&scene(None)).is_none());
    }

    #[test]
    fn test_specks_are_rejected() {
        // removed by the opening
        assert!(calibrator().calibrate(&scene(Some((60, 50, 3)))).is_none());
        // survives the opening, area 25 under the minimum
        assert!(calibrator().calibrate(&scene(Some((60, 50, 6)))).is_none());
    }

    #[test]
    fn test_custom_segmenter() {
        // Marks a fixed 50x30 window whatever the colours
        struct Window;

        impl MarkerSegmenter for Window {
            fn segment(&self, image: &RgbImage) -> GrayImage {
                GrayImage::from_fn(image.width(), image.height(), |x, y| {
                    let inside = (20..70).contains(&x) && (40..70).contains(&y);
                    image::Luma([if inside { 255 } else { 0 }])
                })
            }
        }

        let measurement = calibrator().with_segmenter(Window).measure(&scene(None)).unwrap();
        assert!((measurement.width_px.max(measurement.height_px) - 49.0).abs() < 1e-6);
        assert!((measurement.area_px - 49.0 * 29.0).abs() < 1e-6);
    }
}
