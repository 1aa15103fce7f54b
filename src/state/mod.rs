//! State management for the slideshow application.

use std::path::PathBuf;

pub mod image_index;
pub mod settings;
pub mod word_list;

pub use image_index::ImageIndex;
pub use settings::{Settings, SettingsStore, Speed};
pub use word_list::WordList;

/// Render request waiting for the viewport to be laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRender {
    pub path: PathBuf,
    pub attempts: u32,
}

/// Session state that is not persisted. Only touched from the UI thread.
#[derive(Debug)]
pub struct RuntimeState {
    pub index: ImageIndex,
    pub words: WordList,
    pub current_words: Vec<String>,
    pub current_image: Option<PathBuf>,
    pub pending_render: Option<PendingRender>,
    /// A retry callback has been requested from the shell and not yet run.
    pub retry_scheduled: bool,
}

impl RuntimeState {
    pub fn new(words: WordList) -> Self {
        Self {
            index: ImageIndex::new(),
            words,
            current_words: Vec::new(),
            current_image: None,
            pending_render: None,
            retry_scheduled: false,
        }
    }
}
