// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod compositor;
mod config;
mod error;
mod file_utils;
mod image_loader;
mod paths;
mod services;
mod startup;
mod state;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let app = AppWindow::new()?;
    let slideshow = startup::build_slideshow(&app);

    // Setup all UI event handlers
    ui::setup_handlers(&app, slideshow.clone());
    startup::schedule_first_cycle(&slideshow);

    app.run()?;

    slideshow.borrow_mut().shutdown();

    Ok(())
}
