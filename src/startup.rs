use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use slint::ComponentHandle;

use crate::config::STARTUP_DELAY;
use crate::paths;
use crate::services::{Slideshow, SlideshowOptions};
use crate::state::{SettingsStore, WordList};
use crate::ui::{SharedSlideshow, SlintPresenter};

/// First non-flag argument naming an existing directory.
fn startup_source_from_args() -> Option<PathBuf> {
    std::env::args_os()
        .skip(1)
        .filter_map(|arg| {
            let arg_str = arg.to_string_lossy();
            if arg_str.starts_with('-') {
                None
            } else {
                Some(PathBuf::from(arg))
            }
        })
        .find(|path| path.is_dir())
}

/// Loads settings and the word list and creates the controller.
///
/// A directory given on the command line replaces the stored source and is
/// saved like a choice made in the folder dialog.
pub fn build_slideshow(app: &crate::AppWindow) -> SharedSlideshow {
    let store = SettingsStore::new(paths::state_file());
    let mut settings = store.load();

    if let Some(dir) = startup_source_from_args() {
        log::info!("Using source from command line: {}", dir.display());
        settings.source = dir.to_string_lossy().into_owned();
        store.save(&settings);
    }

    let words = WordList::load(&paths::word_list_file());

    let slideshow = Slideshow::initialize(
        settings,
        store,
        words,
        SlintPresenter::new(app.as_weak()),
        crate::ui::tick_sink(app.as_weak()),
        SlideshowOptions::default(),
    );
    crate::ui::sync_controls(app, slideshow.settings());

    Rc::new(RefCell::new(slideshow))
}

/// Runs the first cycle shortly after the window opens.
pub fn schedule_first_cycle(slideshow: &SharedSlideshow) {
    let slideshow = slideshow.clone();
    slint::Timer::single_shot(STARTUP_DELAY, move || slideshow.borrow_mut().start());
}
