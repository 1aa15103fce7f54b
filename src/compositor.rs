//! Fits an image into the viewport and letterboxes it onto a solid canvas.

use crate::config::MIN_VIEWPORT_EXTENT;
use crate::error::{AppError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, Rgba, RgbaImage};

/// Size of the display region in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// False until the layout has given the region a real size.
    pub fn is_ready(&self) -> bool {
        self.width > MIN_VIEWPORT_EXTENT && self.height > MIN_VIEWPORT_EXTENT
    }
}

/// Where the resized image lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Computes the aspect-preserving size and centered offset of a
/// `src_width`x`src_height` image inside `viewport`.
///
/// The image fits the limiting dimension, then its height is capped at
/// `floor(viewport.height * margin_fraction)`.
pub fn fit_geometry(
    src_width: u32,
    src_height: u32,
    viewport: Viewport,
    margin_fraction: f64,
) -> Result<Placement> {
    if !viewport.is_ready() {
        return Err(AppError::ViewportNotReady {
            width: viewport.width,
            height: viewport.height,
        });
    }
    if src_width == 0 || src_height == 0 {
        return Err(AppError::DegenerateImage {
            width: src_width,
            height: src_height,
        });
    }

    let view_w = viewport.width as f64;
    let view_h = viewport.height as f64;
    let image_aspect = src_width as f64 / src_height as f64;
    let viewport_aspect = view_w / view_h;

    let (mut width, mut height) = if image_aspect > viewport_aspect {
        (viewport.width, (view_w / image_aspect).round() as u32)
    } else {
        ((view_h * image_aspect).round() as u32, viewport.height)
    };

    // Small epsilon so that e.g. 200 * 0.8 floors to 160, not 159.
    let margin = margin_fraction.clamp(0.0, 1.0);
    let max_height = (view_h * margin + 1e-9).floor() as u32;
    if height > max_height {
        height = max_height;
        width = (max_height as f64 * image_aspect).round() as u32;
    }

    width = width.clamp(1, viewport.width);
    height = height.clamp(1, viewport.height);

    Ok(Placement {
        width,
        height,
        x: (viewport.width - width) / 2,
        y: (viewport.height - height) / 2,
    })
}

/// Produces a `viewport`-sized bitmap with `source` resized (Lanczos3) and
/// centered on a `background` fill.
pub fn composite(
    source: &DynamicImage,
    viewport: Viewport,
    margin_fraction: f64,
    background: Rgb<u8>,
) -> Result<RgbaImage> {
    let placement = fit_geometry(source.width(), source.height(), viewport, margin_fraction)?;

    let resized = imageops::resize(
        &source.to_rgba8(),
        placement.width,
        placement.height,
        FilterType::Lanczos3,
    );

    let [r, g, b] = background.0;
    let mut canvas = RgbaImage::from_pixel(viewport.width, viewport.height, Rgba([r, g, b, 255]));
    imageops::overlay(&mut canvas, &resized, placement.x as i64, placement.y as i64);

    Ok(canvas)
}
