// asset-squeeze/src/processors/compressor.rs
use crate::core::{AssetError, OutputFormat, Result};
use image::{DynamicImage, GenericImageView, ImageFormat};
use jpeg_encoder::{ColorType, Encoder};
use oxipng::{optimize_from_memory, Options};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub struct Compressor {
    quality: u8,
    optimize_png: bool,
    optimize_jpeg: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            optimize_png: true,
            optimize_jpeg: true,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn with_jpeg_optimization(mut self, optimize: bool) -> Self {
        self.optimize_jpeg = optimize;
        self
    }

    /// Encodes and replaces `path`, returning the number of bytes written.
    /// A file created from scratch takes its permissions from `source`.
    pub fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
        source: &Path,
    ) -> Result<u64> {
        log::debug!(
            "Saving image to {} as {}, quality: {}",
            path.display(),
            format,
            self.quality
        );

        let data = self.compress_to_bytes(image, format)?;
        let written = write_atomic(path, &data, Some(source))?;

        log::info!("Saved image: {} ({} bytes)", path.display(), written);
        Ok(written)
    }

    pub fn compress_to_bytes(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => self.encode_png(image),
            OutputFormat::Jpeg => self.encode_jpeg(image),
        }
    }

    fn encode_png(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;

        if !self.optimize_png {
            return Ok(buffer.into_inner());
        }

        optimize_from_memory(buffer.get_ref(), &Options::default())
            .map_err(|e| AssetError::PngOptimization(e.to_string()))
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(AssetError::JpegDimensions(width, height));
        };

        let mut buffer = Vec::new();
        let mut encoder = Encoder::new(&mut buffer, self.quality);
        encoder.set_optimized_huffman_tables(self.optimize_jpeg);

        // Baseline JPEG only carries 8-bit grey or RGB.
        match image {
            DynamicImage::ImageLuma8(gray) => encoder.encode(gray.as_raw(), w, h, ColorType::Luma)?,
            DynamicImage::ImageRgb8(rgb) => encoder.encode(rgb.as_raw(), w, h, ColorType::Rgb)?,
            _ => encoder.encode(image.to_rgb8().as_raw(), w, h, ColorType::Rgb)?,
        }

        Ok(buffer)
    }
}

/// Writes next to `path` first and renames over it, so a failure never leaves
/// a truncated file behind. Permissions come from the replaced file, or from
/// `template` when `path` is new.
pub fn write_atomic(path: &Path, data: &[u8], template: Option<&Path>) -> Result<u64> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;

    let permissions = fs::metadata(path)
        .or_else(|e| match template {
            Some(template) => fs::metadata(template),
            None => Err(e),
        })
        .map(|meta| meta.permissions());
    if let Ok(permissions) = permissions {
        fs::set_permissions(temp.path(), permissions)?;
    }

    temp.persist(path).map_err(|e| AssetError::Io(e.error))?;
    Ok(data.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn png_output_decodes_back() {
        let bytes = Compressor::new(85)
            .compress_to_bytes(&gradient(64, 32), OutputFormat::Png)
            .unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (64, 32));
        assert_eq!(decoded.to_rgb8(), gradient(64, 32).to_rgb8());
    }

    #[test]
    fn oxipng_never_grows_the_plain_encoding() {
        let image = gradient(128, 128);
        let plain = Compressor::new(85)
            .with_png_optimization(false)
            .compress_to_bytes(&image, OutputFormat::Png)
            .unwrap();
        let optimized = Compressor::new(85)
            .compress_to_bytes(&image, OutputFormat::Png)
            .unwrap();
        assert!(optimized.len() <= plain.len());
    }

    #[test]
    fn jpeg_accepts_alpha_input() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([1, 2, 3, 4])));
        let bytes = Compressor::new(85)
            .compress_to_bytes(&image, OutputFormat::Jpeg)
            .unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn huffman_optimization_never_grows_jpeg() {
        let image = gradient(320, 240);
        let plain = Compressor::new(85)
            .with_jpeg_optimization(false)
            .compress_to_bytes(&image, OutputFormat::Jpeg)
            .unwrap();
        let optimized = Compressor::new(85)
            .compress_to_bytes(&image, OutputFormat::Jpeg)
            .unwrap();
        assert!(optimized.len() <= plain.len());

        let decoded = image::load_from_memory_with_format(&optimized, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (320, 240));
    }

    #[test]
    fn oversized_jpeg_dimensions_are_rejected() {
        let image = DynamicImage::ImageLuma8(image::GrayImage::new(70_000, 1));
        let result = Compressor::new(85).compress_to_bytes(&image, OutputFormat::Jpeg);
        assert!(matches!(result, Err(AssetError::JpegDimensions(70_000, 1))));
    }

    #[test]
    fn lower_quality_gives_smaller_jpeg() {
        let image = gradient(256, 256);
        let high = Compressor::new(95).compress_to_bytes(&image, OutputFormat::Jpeg).unwrap();
        let low = Compressor::new(20).compress_to_bytes(&image, OutputFormat::Jpeg).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"old bytes").unwrap();

        let written = Compressor::new(85)
            .save(&gradient(8, 8), &path, OutputFormat::Png, &path)
            .unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), written);
        assert_eq!(image::open(&path).unwrap().dimensions(), (8, 8));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn atomic_write_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.png");
        assert!(write_atomic(&path, b"data", None).is_err());
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn new_file_inherits_template_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("hero.png");
        fs::write(&source, b"png").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o640)).unwrap();
        let target = dir.path().join("hero.jpg");

        write_atomic(&target, b"jpg", Some(&source)).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn replaced_file_keeps_its_own_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.png");
        fs::write(&source, b"a").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o600)).unwrap();
        let target = dir.path().join("b.png");
        fs::write(&target, b"b").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();

        write_atomic(&target, b"new", Some(&source)).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
