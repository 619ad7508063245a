// asset-squeeze/src/processors/loader.rs
use crate::core::{AssetError, ColorMode, Result};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct LoadedImage {
    pub image: DynamicImage,
    pub color_mode: ColorMode,
    pub format: Option<ImageFormat>,
}

#[derive(Clone, Default)]
pub struct Loader;

impl Loader {
    pub fn new() -> Self {
        Self
    }

    /// Decodes by content rather than extension: earlier runs may have left
    /// PNG data behind a `.jpg` name.
    pub fn load(&self, path: &Path) -> Result<LoadedImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let image = reader.decode()?;

        let indexed = format == Some(ImageFormat::Png) && self.is_indexed_png(path)?;
        let has_alpha = image.color().has_alpha();
        let color_mode = match (indexed, has_alpha) {
            (true, has_alpha) => ColorMode::Indexed { has_alpha },
            (false, true) => ColorMode::Transparent,
            (false, false) => ColorMode::Opaque,
        };

        let (width, height) = image.dimensions();
        log::debug!(
            "Decoded {}x{} pixels, color: {:?}, mode: {:?}",
            width,
            height,
            image.color(),
            color_mode
        );

        Ok(LoadedImage {
            image,
            color_mode,
            format,
        })
    }

    /// The decoder expands palettes to RGB(A), so the header is the only
    /// place the original storage mode is still visible.
    fn is_indexed_png(&self, path: &Path) -> Result<bool> {
        let file = BufReader::new(File::open(path)?);
        let reader = png::Decoder::new(file).read_info()?;
        Ok(reader.info().color_type == png::ColorType::Indexed)
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path.metadata()?;
        if !metadata.is_file() {
            return Err(AssetError::UnsupportedPath(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        if metadata.len() == 0 {
            return Err(AssetError::EmptyFile(path.display().to_string()));
        }

        Ok(())
    }
}
