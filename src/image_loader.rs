use crate::error::{AppError, Result};
use image::DynamicImage;
use std::path::Path;

/// Decodes an image file, sniffing the format from its contents.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let image = image::ImageReader::open(path)
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .decode()?;
    Ok(image)
}
