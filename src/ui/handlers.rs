//! Event handlers for UI callbacks.
//!
//! Wires every `Logic` callback to the shared slideshow controller. All of
//! them run on the Slint event loop.

use crate::services::Slideshow;
use crate::state::Speed;
use crate::ui::SlintPresenter;
use log::{debug, warn};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Controller shared between the UI callbacks. Only used on the UI thread.
pub type SharedSlideshow = Rc<RefCell<Slideshow<SlintPresenter>>>;

/// Sets up all UI event handlers for the application.
pub fn setup_handlers(ui: &crate::AppWindow, slideshow: SharedSlideshow) {
    let logic = ui.global::<crate::Logic>();

    // Folder selection handler
    // Uses slint::spawn_local because AsyncFileDialog must run on the main thread
    logic.on_select_source({
        let ui_handle = ui.as_weak();
        let slideshow = slideshow.clone();
        move || {
            let ui_handle = ui_handle.clone();
            let slideshow = slideshow.clone();
            let start_dir = slideshow
                .borrow()
                .runtime()
                .index
                .source()
                .map(Path::to_path_buf)
                .unwrap_or_default();

            let spawned = slint::spawn_local(async move {
                let Some(folder) = AsyncFileDialog::new()
                    .set_title("Select Source Directory")
                    .set_directory(&start_dir)
                    .pick_folder()
                    .await
                else {
                    debug!("No folder selected");
                    return;
                };

                slideshow.borrow_mut().on_source_changed(folder.path());

                if let Some(ui) = ui_handle.upgrade() {
                    if slideshow.borrow().runtime().index.is_empty() {
                        ui.global::<crate::ViewState>().set_status_message(
                            format!("No images found in {}", folder.path().display()).into(),
                        );
                    }
                }
            });

            if let Err(e) = spawned {
                warn!("Failed to open folder dialog: {}", e);
            }
        }
    });

    // Speed selector handler
    logic.on_speed_selected({
        let ui_handle = ui.as_weak();
        let slideshow = slideshow.clone();
        move |label| {
            let Some(speed) = Speed::from_label(&label) else {
                warn!("Unknown speed label {:?}", label);
                return;
            };

            let result = slideshow.borrow_mut().on_speed_changed(speed);
            debug!("Refresh timer {:?}", slideshow.borrow().scheduler_state());
            if let Err(e) = result {
                if let Some(ui) = ui_handle.upgrade() {
                    crate::ui::sync_controls(&ui, slideshow.borrow().settings());
                    crate::ui::set_error_with_prefix(&ui, "Speed not changed", e.to_string());
                }
            }
        }
    });

    // Word count selector handler
    logic.on_noun_count_selected({
        let slideshow = slideshow.clone();
        move |label| match label.trim().parse::<u32>() {
            Ok(count) => slideshow.borrow_mut().on_noun_count_changed(count),
            Err(e) => warn!("Invalid word count {:?}: {}", label, e),
        }
    });

    // Manual refresh handler
    logic.on_refresh({
        let slideshow = slideshow.clone();
        move || slideshow.borrow_mut().request_manual_refresh()
    });

    // Timer ticks forwarded from the refresh thread
    logic.on_auto_refresh({
        let slideshow = slideshow.clone();
        move |generation| slideshow.borrow_mut().handle_tick(generation as u64)
    });

    // Deferred render once the layout has a size
    logic.on_retry_render({
        let slideshow = slideshow.clone();
        move || slideshow.borrow_mut().retry_pending_render()
    });

    logic.on_close(|| {
        if let Err(e) = slint::quit_event_loop() {
            warn!("Failed to quit event loop: {}", e);
        }
    });
}
