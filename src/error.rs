//! Unified error types for the slideshow application.

use std::fmt;
use std::path::PathBuf;

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error loading or decoding an image file
    ImageLoad(String),
    /// Error scanning directory for image files
    DirectoryScan(String),
    /// Source image has a zero extent and cannot be scaled
    DegenerateImage { width: u32, height: u32 },
    /// Viewport has not been laid out yet
    ViewportNotReady { width: u32, height: u32 },
    /// Settings file could not be read, parsed or written
    Settings(String),
    /// Word list resource could not be read
    WordList { path: PathBuf, reason: String },
    /// Previous refresh timer did not stop within its bound
    TimerStopTimeout { generation: u64 },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ImageLoad(msg) => write!(f, "Image load error: {}", msg),
            AppError::DirectoryScan(msg) => write!(f, "Directory scan error: {}", msg),
            AppError::DegenerateImage { width, height } => {
                write!(f, "Image has no area ({}x{})", width, height)
            }
            AppError::ViewportNotReady { width, height } => {
                write!(f, "Viewport not ready ({}x{})", width, height)
            }
            AppError::Settings(msg) => write!(f, "Settings error: {}", msg),
            AppError::WordList { path, reason } => {
                write!(f, "Failed to read word list {:?}: {}", path, reason)
            }
            AppError::TimerStopTimeout { generation } => {
                write!(f, "Refresh timer #{} did not stop in time", generation)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::DirectoryScan(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Settings(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
