// asset-squeeze/src/core/mod.rs
pub mod driver;
pub mod processor;

use crate::utils::{calculate_savings_percent, format_mib};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Files larger than this that carry a `.png` extension are re-encoded as JPEG.
pub const DEFAULT_JPEG_THRESHOLD: u64 = 5 * 1024 * 1024;
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;
pub const DEFAULT_QUALITY: u8 = 85;

pub const DEFAULT_ASSET_DIRS: [&str; 3] = [
    "AdRadar/Assets.xcassets/LoginScreen.imageset",
    "AdRadar/Assets.xcassets/AppIcon.appiconset",
    "AdRadar/Assets.xcassets/image-wavy-lines-bg.imageset",
];

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub asset_dirs: Vec<PathBuf>,
    pub max_dimension: u32,
    pub quality: u8,
    pub jpeg_threshold: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            asset_dirs: DEFAULT_ASSET_DIRS.iter().map(PathBuf::from).collect(),
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            jpeg_threshold: DEFAULT_JPEG_THRESHOLD,
        }
    }
}

impl OptimizerConfig {
    pub fn with_asset_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.asset_dirs = dirs.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(AssetError::InvalidConfig(
                "Max dimension must be at least 1 pixel".to_string(),
            ));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(AssetError::InvalidConfig(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("PNG"),
            OutputFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// How the source pixels were stored, as far as flattening cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Opaque,
    Transparent,
    /// Palette image. `has_alpha` is set when a transparency chunk expanded to alpha.
    Indexed { has_alpha: bool },
}

impl ColorMode {
    pub fn needs_flattening(&self) -> bool {
        !matches!(self, ColorMode::Opaque)
    }
}

#[derive(Debug, Clone)]
pub struct OptimizedFile {
    pub name: String,
    pub output_path: PathBuf,
    pub original_dimensions: (u32, u32),
    pub new_dimensions: (u32, u32),
    pub original_size: u64,
    pub new_size: u64,
    pub format: OutputFormat,
}

impl OptimizedFile {
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.new_size as i64
    }
}

impl fmt::Display for OptimizedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ow, oh) = self.original_dimensions;
        let (nw, nh) = self.new_dimensions;
        writeln!(f, "  Original: {}x{}, {}", ow, oh, format_mib(self.original_size as i64))?;
        writeln!(
            f,
            "  Optimized: {}x{}, {} ({})",
            nw,
            nh,
            format_mib(self.new_size as i64),
            self.format
        )?;
        write!(
            f,
            "  Savings: {} ({:.1}%)",
            format_mib(self.bytes_saved()),
            calculate_savings_percent(self.original_size, self.new_size)
        )
    }
}

/// Per-file result. A failure is data, never an early return for the caller.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Optimized(OptimizedFile),
    Failed { path: PathBuf, reason: String },
}

impl FileOutcome {
    pub fn bytes_saved(&self) -> i64 {
        match self {
            FileOutcome::Optimized(file) => file.bytes_saved(),
            FileOutcome::Failed { .. } => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

#[derive(Debug, Default)]
pub struct DirectoryStats {
    pub directory: PathBuf,
    pub outcomes: Vec<FileOutcome>,
}

impl DirectoryStats {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            outcomes: Vec::new(),
        }
    }

    pub fn bytes_saved(&self) -> i64 {
        self.outcomes.iter().map(FileOutcome::bytes_saved).sum()
    }

    pub fn optimized_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG header error: {0}")]
    PngHeader(#[from] png::DecodingError),

    #[error("JPEG encoding failed: {0}")]
    JpegEncoding(#[from] jpeg_encoder::EncodingError),

    #[error("Image too large for JPEG: {0}x{1}")]
    JpegDimensions(u32, u32),

    #[error("PNG optimization failed: {0}")]
    PngOptimization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("Unsupported path: {0}")]
    UnsupportedPath(String),
}

pub type Result<T> = std::result::Result<T, AssetError>;
