// asset-squeeze/src/utils/mod.rs
use crate::core::{AssetError, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

const ASSET_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub const BACKUP_SUFFIX: &str = ".backup";

/// Signed, since a re-encode can come out larger than its source.
pub fn format_mib(bytes: i64) -> String {
    format!("{:.1} MB", bytes as f64 / BYTES_PER_MIB)
}

pub fn calculate_savings_percent(original_size: u64, new_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }

    (original_size as f64 - new_size as f64) / original_size as f64 * 100.0
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

pub fn is_supported_format(path: &Path) -> bool {
    get_file_extension(path)
        .map(|ext| ASSET_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn is_png(path: &Path) -> bool {
    get_file_extension(path).as_deref() == Some("png")
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Printed before a file is decoded, so failures still show up in the progress.
pub fn progress_header(path: &Path) -> String {
    format!("Processing: {}", file_name_of(path))
}

/// `icon.png` -> `icon.png.backup`, next to the original.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

pub fn jpeg_sibling_path(path: &Path) -> PathBuf {
    path.with_extension("jpg")
}

/// Copies `path` to its `.backup` sibling unless one is already there.
/// Returns whether a new backup was written. Existing backups are never touched.
pub fn ensure_backup(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Err(AssetError::UnsupportedPath(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    let backup = backup_path_for(path);
    if backup.exists() {
        log::debug!("Backup already present: {}", backup.display());
        return Ok(false);
    }

    // fs::copy carries permission bits over; the timestamp has to follow by hand.
    fs::copy(path, &backup)?;
    let modified = fs::metadata(path)?.modified()?;
    File::options()
        .write(true)
        .open(&backup)?
        .set_modified(modified)?;

    log::debug!("Created backup: {}", backup.display());
    Ok(true)
}
