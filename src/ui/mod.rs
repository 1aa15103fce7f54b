//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - Every `Logic` callback runs on the Slint event loop and borrows the
//!   shared [`Slideshow`](crate::services::Slideshow) there.
//! - `slint::spawn_local`: the folder dialog, which must stay on the main thread.
//! - `slint::invoke_from_event_loop`: the refresh timer thread hands its ticks
//!   to the event loop through [`tick_sink`].
//! - `slint::Timer::single_shot`: deferred renders and the first cycle.

pub mod handlers;
pub mod image_display;
mod state_helpers;

pub use handlers::{SharedSlideshow, setup_handlers};
pub use image_display::{SlintPresenter, tick_sink};
pub use state_helpers::*;
