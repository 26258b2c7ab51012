use image::{imageops, imageops::FilterType, Rgb, RgbImage};

pub const PAD_GREY: u8 = 114;

/// Square canvas holding the resized image, plus the mapping back
#[derive(Debug, Clone)]
pub struct Letterbox {
    pub image: RgbImage,
    /// Resize factor applied to the source
    pub scale: f64,
    pub left: u32,
    pub top: u32,
}

impl Letterbox {
    /// Map a point on the canvas back onto the source image
    pub fn to_source(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - f64::from(self.left)) / self.scale, (y - f64::from(self.top)) / self.scale)
    }
}

/// Fit the longest side to `size`, centring on a grey square
pub fn letterbox(image: &RgbImage, size: u32) -> Letterbox {
    let (width, height) = image.dimensions();
    let scale = f64::from(size) / f64::from(width.max(height).max(1));
    let new_width = ((f64::from(width) * scale) as u32).clamp(1, size);
    let new_height = ((f64::from(height) * scale) as u32).clamp(1, size);

    let resized = imageops::resize(image, new_width, new_height, FilterType::Triangle);
    let mut canvas = RgbImage::from_pixel(size, size, Rgb([PAD_GREY; 3]));
    let left = (size - new_width) / 2;
    let top = (size - new_height) / 2;
    imageops::replace(&mut canvas, &resized, i64::from(left), i64::from(top));

    Letterbox {
        image: canvas,
        scale,
        left,
        top,
    }
}
