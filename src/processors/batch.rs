// asset-squeeze/src/processors/batch.rs
use crate::core::processor::AssetOptimizer;
use crate::core::{AssetError, DirectoryStats, FileOutcome, OptimizerConfig, Result};
use crate::utils::{ensure_backup, file_name_of, is_supported_format};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Backs up and optimizes every asset directly inside one directory.
pub struct BatchProcessor {
    optimizer: AssetOptimizer,
}

impl BatchProcessor {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            optimizer: AssetOptimizer::new(config),
        }
    }

    pub fn optimize_directory(&self, dir: &Path) -> Result<DirectoryStats> {
        if !dir.is_dir() {
            return Err(AssetError::UnsupportedPath(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }

        println!("\nOptimizing imageset: {}", file_name_of(dir));

        let image_paths = self.collect_image_paths(dir);
        if image_paths.is_empty() {
            log::warn!("No image files found in {}", dir.display());
        } else {
            log::debug!("Found {} images in {}", image_paths.len(), dir.display());
        }

        let mut stats = DirectoryStats::new(dir);
        for path in image_paths {
            stats.outcomes.push(self.optimize_file(&path));
        }

        Ok(stats)
    }

    fn optimize_file(&self, path: &Path) -> FileOutcome {
        // Without a backup the asset is left alone.
        if let Err(e) = ensure_backup(path) {
            log::error!("Could not back up {}: {}", path.display(), e);
            return FileOutcome::Failed {
                path: path.to_path_buf(),
                reason: format!("backup failed: {}", e),
            };
        }

        self.optimizer.optimize(path, path)
    }

    fn collect_image_paths(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(image_entry)
            .collect()
    }
}

/// An unreadable entry only costs that entry, not the rest of the listing.
fn image_entry(entry: walkdir::Result<DirEntry>) -> Option<PathBuf> {
    match entry {
        Ok(entry) if entry.file_type().is_file() && is_supported_format(entry.path()) => {
            Some(entry.into_path())
        }
        Ok(_) => None,
        Err(e) => {
            log::warn!("Skipping unreadable entry: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;

    #[test]
    fn collects_only_direct_image_children() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.PNG"), b"x").unwrap();
        fs::write(dir.path().join("a.jpeg"), b"x").unwrap();
        fs::write(dir.path().join("Contents.json"), b"{}").unwrap();
        fs::write(dir.path().join("c.png.backup"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        fs::write(dir.path().join("nested.png").join("deep.png"), b"x").unwrap();

        let paths = BatchProcessor::new(&OptimizerConfig::default())
            .collect_image_paths(dir.path());

        let names: Vec<String> = paths.iter().map(|p| file_name_of(p)).collect();
        assert_eq!(names, vec!["a.jpeg", "b.PNG"]);
    }

    #[test]
    fn empty_directory_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let stats = BatchProcessor::new(&OptimizerConfig::default())
            .optimize_directory(dir.path())
            .unwrap();
        assert!(stats.outcomes.is_empty());
        assert_eq!(stats.bytes_saved(), 0);
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("icon.png");
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])).save(&file).unwrap();

        let result = BatchProcessor::new(&OptimizerConfig::default()).optimize_directory(&file);
        assert!(result.is_err());
    }

    #[test]
    fn corrupt_file_is_counted_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.jpg"), b"not a jpeg").unwrap();
        RgbImage::from_pixel(4, 4, Rgb([10, 10, 10]))
            .save(dir.path().join("fine.png"))
            .unwrap();

        let stats = BatchProcessor::new(&OptimizerConfig::default())
            .optimize_directory(dir.path())
            .unwrap();

        assert_eq!(stats.failed_count(), 1);
        assert_eq!(stats.optimized_count(), 1);
        assert!(dir.path().join("broken.jpg.backup").exists());
        assert_eq!(fs::read(dir.path().join("broken.jpg")).unwrap(), b"not a jpeg");
    }

    #[test]
    fn unreadable_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let failing = WalkDir::new(dir.path().join("vanished"))
            .into_iter()
            .next()
            .unwrap();
        assert!(failing.is_err());
        assert_eq!(image_entry(failing), None);

        let png = dir.path().join("kept.png");
        fs::write(&png, b"x").unwrap();
        let ok = WalkDir::new(&png).into_iter().next().unwrap();
        assert_eq!(image_entry(ok), Some(png));
    }
}
