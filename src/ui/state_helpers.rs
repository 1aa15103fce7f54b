//! Helper functions to set grouped ViewState properties.

use crate::config::MAX_NOUN_COUNT;
use crate::state::{Settings, Speed};
use log::error;
use slint::ComponentHandle;

/// Shows a composited frame.
pub fn set_frame(ui: &crate::AppWindow, image: slint::Image) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_frame(image);
    view_state.set_frame_loaded(true);
    view_state.set_status_message("".into());
}

/// Replaces the word chips.
pub fn set_words(ui: &crate::AppWindow, words: &[String]) {
    let words: Vec<slint::SharedString> = words
        .iter()
        .map(|word| slint::SharedString::from(word.as_str()))
        .collect();
    ui.global::<crate::ViewState>()
        .set_words(slint::ModelRc::new(slint::VecModel::from(words)));
}

/// Points the speed and word-count selectors at the given settings.
pub fn sync_controls(ui: &crate::AppWindow, settings: &Settings) {
    let view_state = ui.global::<crate::ViewState>();

    let speed_index = Speed::ALL
        .iter()
        .position(|s| *s == settings.speed)
        .unwrap_or_default();
    view_state.set_speed_index(speed_index as i32);

    let count = settings.noun_count.clamp(1, MAX_NOUN_COUNT);
    view_state.set_noun_count_index(count as i32 - 1);
}

/// Logs the error and shows it below the image.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::ViewState>()
        .set_status_message(error_message.into());
}
