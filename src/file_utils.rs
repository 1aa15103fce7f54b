use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{AppError, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returns true when the path carries a supported image extension (any case).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collects supported image files below `dir`.
///
/// Entries that cannot be read are skipped. Order follows directory traversal.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if dir.as_os_str().is_empty() {
        return Err(AppError::DirectoryScan("No directory selected".to_string()));
    }
    if !dir.is_dir() {
        return Err(AppError::DirectoryScan(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let image_files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_supported_image(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    Ok(image_files)
}
