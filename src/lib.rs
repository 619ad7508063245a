pub mod core;
mod processors;
mod utils;

pub use crate::core::driver::{Driver, RunSummary, RECOMMENDATIONS};
pub use crate::core::processor::AssetOptimizer;
pub use crate::core::{
    AssetError, ColorMode, DirectoryStats, FileOutcome, OptimizedFile, OptimizerConfig,
    OutputFormat, Result, DEFAULT_ASSET_DIRS, DEFAULT_JPEG_THRESHOLD, DEFAULT_MAX_DIMENSION,
    DEFAULT_QUALITY,
};
pub use processors::{
    write_atomic, BatchProcessor, Compressor, Flattener, LoadedImage, Loader, Resizer,
};
pub use utils::{
    backup_path_for, calculate_savings_percent, ensure_backup, format_mib, is_supported_format,
    jpeg_sibling_path,
};

pub mod prelude {
    pub use crate::{AssetOptimizer, BatchProcessor, Driver, FileOutcome, OptimizerConfig};
}

// Re-export commonly used types
pub use image::DynamicImage;
