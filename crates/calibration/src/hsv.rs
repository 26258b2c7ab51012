use image::{GrayImage, Luma, Rgb, RgbImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// RGB to HSV with hue halved into 0-179, saturation and value in 0-255
pub fn rgb_to_hsv(Rgb([r, g, b]): Rgb<u8>) -> [u8; 3] {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

    let mut hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    [(hue / 2.0).round() as u8, saturation.round() as u8, max as u8]
}

/// Inclusive HSV box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        hsv.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(v, (lo, hi))| (*lo..=*hi).contains(v))
    }

    /// Binary mask: 255 where the pixel falls in range
    pub fn mask(&self, image: &RgbImage) -> GrayImage {
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let inside = self.contains(rgb_to_hsv(*image.get_pixel(x, y)));
            Luma([if inside { 255 } else { 0 }])
        })
    }
}

/// Green sticker defaults
impl Default for HsvRange {
    fn default() -> Self {
        Self {
            lower: [25, 60, 60],
            upper: [90, 255, 255],
        }
    }
}
