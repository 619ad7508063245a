// asset-squeeze/src/core/processor.rs
use super::{FileOutcome, OptimizedFile, OptimizerConfig, OutputFormat, Result};
use crate::processors::{Compressor, Flattener, Loader, Resizer};
use crate::utils::{file_name_of, is_png, jpeg_sibling_path, progress_header};
use image::GenericImageView;
use std::path::{Path, PathBuf};

/// Shrinks a single image file.
pub struct AssetOptimizer {
    jpeg_threshold: u64,
    loader: Loader,
    resizer: Resizer,
    flattener: Flattener,
    compressor: Compressor,
}

impl AssetOptimizer {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            jpeg_threshold: config.jpeg_threshold,
            loader: Loader::new(),
            resizer: Resizer::new(config.max_dimension),
            flattener: Flattener::new(),
            compressor: Compressor::new(config.quality),
        }
    }

    /// Never fails: errors are logged and reported as `FileOutcome::Failed`.
    /// `output_path` may equal `input_path`; the replacement is atomic.
    pub fn optimize(&self, input_path: &Path, output_path: &Path) -> FileOutcome {
        println!("{}", progress_header(input_path));

        match self.try_optimize(input_path, output_path) {
            Ok(file) => {
                println!("{}", file);
                FileOutcome::Optimized(file)
            }
            Err(e) => {
                log::error!("Error processing {}: {}", input_path.display(), e);
                FileOutcome::Failed {
                    path: input_path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn try_optimize(&self, input_path: &Path, output_path: &Path) -> Result<OptimizedFile> {
        let original_size = std::fs::metadata(input_path)?.len();

        let loaded = self.loader.load(input_path)?;
        let original_dimensions = loaded.image.dimensions();

        let resized = self.resizer.fit(loaded.image);
        let image = self.flattener.flatten(resized, loaded.color_mode);

        let (format, target) = self.choose_output(input_path, output_path, original_size);
        let new_size = self.compressor.save(&image, &target, format, input_path)?;

        Ok(OptimizedFile {
            name: file_name_of(input_path),
            output_path: target,
            original_dimensions,
            new_dimensions: image.dimensions(),
            original_size,
            new_size,
            format,
        })
    }

    /// Only oversized PNGs switch to JPEG, written beside the original.
    pub fn choose_output(
        &self,
        input_path: &Path,
        output_path: &Path,
        original_size: u64,
    ) -> (OutputFormat, PathBuf) {
        if is_png(input_path) && original_size > self.jpeg_threshold {
            (OutputFormat::Jpeg, jpeg_sibling_path(output_path))
        } else {
            (OutputFormat::Png, output_path.to_path_buf())
        }
    }
}
