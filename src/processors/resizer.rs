// asset-squeeze/src/processors/resizer.rs
use image::{imageops::FilterType, DynamicImage, GenericImageView};

pub struct Resizer {
    max_dimension: u32,
    filter: FilterType,
}

impl Resizer {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension,
            filter: FilterType::Lanczos3,
        }
    }

    /// Returns `None` when the image already fits and should be kept as is.
    pub fn target_dimensions(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let longest = width.max(height);
        if longest <= self.max_dimension {
            return None;
        }

        // Integer math so the long side lands on the limit exactly.
        let scale = |side: u32| -> u32 {
            let scaled = side as u64 * self.max_dimension as u64 / longest as u64;
            (scaled as u32).max(1)
        };

        if width >= height {
            Some((self.max_dimension, scale(height)))
        } else {
            Some((scale(width), self.max_dimension))
        }
    }

    pub fn fit(&self, image: DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();

        match self.target_dimensions(width, height) {
            None => {
                log::debug!("Image dimensions {}x{} within limit, skipping resize", width, height);
                image
            }
            Some((new_width, new_height)) => {
                log::debug!(
                    "Resizing image from {}x{} to {}x{}",
                    width,
                    height,
                    new_width,
                    new_height
                );
                image.resize_exact(new_width, new_height, self.filter)
            }
        }
    }
}
