//! Slint side of the presenter port.
//!
//! Frames arrive already composited to the viewport size; they are only
//! wrapped into a `slint::Image` here.

use crate::compositor::Viewport;
use crate::services::{Presenter, TickSink};
use image::RgbaImage;
use slint::{ComponentHandle, Rgba8Pixel, SharedPixelBuffer};
use std::sync::Arc;
use std::time::Duration;

/// Converts a composited frame into a Slint image.
pub fn create_slint_image(frame: &RgbaImage) -> slint::Image {
    let (width, height) = frame.dimensions();
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(frame.as_raw(), width, height);
    slint::Image::from_rgba8(buffer)
}

/// Builds the tick sink for the refresh timer. The timer thread never touches
/// the UI; the tick is forwarded to `Logic.auto-refresh` on the event loop.
pub fn tick_sink(ui: slint::Weak<crate::AppWindow>) -> TickSink {
    Arc::new(move |generation| {
        let ui = ui.clone();
        let _ = slint::invoke_from_event_loop(move || {
            if let Some(ui) = ui.upgrade() {
                ui.global::<crate::Logic>()
                    .invoke_auto_refresh(generation as i32);
            }
        });
    })
}

pub struct SlintPresenter {
    ui: slint::Weak<crate::AppWindow>,
}

impl SlintPresenter {
    pub fn new(ui: slint::Weak<crate::AppWindow>) -> Self {
        Self { ui }
    }
}

impl Presenter for SlintPresenter {
    fn viewport(&self) -> Viewport {
        let Some(ui) = self.ui.upgrade() else {
            return Viewport::new(0, 0);
        };

        // Layout sizes are logical; frames are rendered at physical resolution.
        let scale = ui.window().scale_factor();
        Viewport::new(
            (ui.get_viewport_width() * scale).round() as u32,
            (ui.get_viewport_height() * scale).round() as u32,
        )
    }

    fn schedule_render_retry(&self, delay: Duration) {
        let ui = self.ui.clone();
        slint::Timer::single_shot(delay, move || {
            if let Some(ui) = ui.upgrade() {
                ui.global::<crate::Logic>().invoke_retry_render();
            }
        });
    }

    fn show_image(&self, frame: RgbaImage) {
        if let Some(ui) = self.ui.upgrade() {
            crate::ui::set_frame(&ui, create_slint_image(&frame));
        }
    }

    fn show_words(&self, words: &[String]) {
        if let Some(ui) = self.ui.upgrade() {
            crate::ui::set_words(&ui, words);
        }
    }
}
