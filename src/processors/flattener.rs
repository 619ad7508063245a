// asset-squeeze/src/processors/flattener.rs
use crate::core::ColorMode;
use image::{DynamicImage, Rgb, RgbImage};

const WHITE: [u8; 3] = [255, 255, 255];

/// Removes transparency by compositing onto an opaque background.
pub struct Flattener {
    background: [u8; 3],
}

impl Flattener {
    pub fn new() -> Self {
        Self { background: WHITE }
    }

    pub fn flatten(&self, image: DynamicImage, mode: ColorMode) -> DynamicImage {
        if !mode.needs_flattening() && !image.color().has_alpha() {
            return image;
        }

        if !image.color().has_alpha() {
            log::debug!("Converting palette image to RGB");
            return DynamicImage::ImageRgb8(image.to_rgb8());
        }

        log::debug!("Flattening {:?} image onto opaque background", image.color());
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let flattened = RgbImage::from_fn(width, height, |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            Rgb([
                blend(r, self.background[0], a),
                blend(g, self.background[1], a),
                blend(b, self.background[2], a),
            ])
        });

        DynamicImage::ImageRgb8(flattened)
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new()
    }
}

fn blend(foreground: u8, background: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    let value = foreground as u32 * alpha + background as u32 * (255 - alpha);
    ((value + 127) / 255) as u8
}
