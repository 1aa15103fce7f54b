//! Index of image files under the current source directory.

use crate::file_utils;
use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};

/// Image paths found by the last scan. Rebuilt wholesale on every rescan.
#[derive(Debug, Default)]
pub struct ImageIndex {
    source: Option<PathBuf>,
    image_files: Vec<PathBuf>,
}

impl ImageIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the index with the images found below `dir`.
    ///
    /// A missing, empty or unreadable `dir` leaves the index empty.
    pub fn rescan(&mut self, dir: &Path) -> usize {
        let start = std::time::Instant::now();
        debug!("Starting scan of {}", dir.display());

        self.source = (!dir.as_os_str().is_empty()).then(|| dir.to_path_buf());
        self.image_files = match file_utils::scan_directory(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        };

        info!(
            "Found {} images in {} ({:?})",
            self.image_files.len(),
            dir.display(),
            start.elapsed()
        );
        self.image_files.len()
    }

    /// Uniformly picks one image; `None` when the index is empty.
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Path> {
        self.image_files.choose(rng).map(PathBuf::as_path)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.image_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_files.is_empty()
    }
}
