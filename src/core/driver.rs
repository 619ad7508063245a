// asset-squeeze/src/core/driver.rs
use super::{DirectoryStats, OptimizerConfig, Result};
use crate::processors::BatchProcessor;
use crate::utils::format_mib;
use std::fmt;
use std::path::PathBuf;

pub const RECOMMENDATIONS: [&str; 5] = [
    "Use .jpg for large photos/backgrounds",
    "Use .png only for icons and transparent images",
    "Consider using SF Symbols instead of custom icons",
    "Use Asset Catalog's 'Preserve Vector Data' for scalable icons",
    "Test app memory usage after optimization",
];

const RULE_WIDTH: usize = 50;

#[derive(Debug, Default)]
pub struct RunSummary {
    pub directories: Vec<DirectoryStats>,
    pub missing: Vec<PathBuf>,
    pub failed_directories: Vec<(PathBuf, String)>,
}

impl RunSummary {
    pub fn total_bytes_saved(&self) -> i64 {
        self.directories.iter().map(DirectoryStats::bytes_saved).sum()
    }

    pub fn files_optimized(&self) -> usize {
        self.directories.iter().map(DirectoryStats::optimized_count).sum()
    }

    pub fn files_failed(&self) -> usize {
        self.directories.iter().map(DirectoryStats::failed_count).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = format_mib(self.total_bytes_saved());

        writeln!(f, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            f,
            "Files optimized: {}, failed: {}",
            self.files_optimized(),
            self.files_failed()
        )?;
        writeln!(f, "Total memory savings: {}", total)?;
        writeln!(f, "Estimated app size reduction: {}", total)?;

        writeln!(f, "\nAdditional Recommendations:")?;
        for (i, line) in RECOMMENDATIONS.iter().enumerate() {
            write!(f, "{}. {}", i + 1, line)?;
            if i + 1 < RECOMMENDATIONS.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Runs the batch over every configured asset directory.
pub struct Driver {
    config: OptimizerConfig,
    batch: BatchProcessor,
}

impl Driver {
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let batch = BatchProcessor::new(&config);
        Ok(Self { config, batch })
    }

    /// Missing or unreadable directories are logged and skipped.
    pub fn run(&self) -> RunSummary {
        println!("Asset Optimization Tool");
        println!("{}", "=".repeat(RULE_WIDTH));

        let mut summary = RunSummary::default();

        for dir in &self.config.asset_dirs {
            if !dir.exists() {
                log::warn!("Path not found: {}", dir.display());
                summary.missing.push(dir.clone());
                continue;
            }

            match self.batch.optimize_directory(dir) {
                Ok(stats) => {
                    log::info!(
                        "{}: {} optimized, {} failed, {} saved",
                        dir.display(),
                        stats.optimized_count(),
                        stats.failed_count(),
                        format_mib(stats.bytes_saved())
                    );
                    summary.directories.push(stats);
                }
                Err(e) => {
                    log::error!("Error processing directory {}: {}", dir.display(), e);
                    summary.failed_directories.push((dir.clone(), e.to_string()));
                }
            }
        }

        println!("{}", summary);
        summary
    }
}
