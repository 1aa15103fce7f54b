//! Service layer for business logic.
//!
//! Keeps the slideshow logic independent of Slint so it can be driven from tests.

pub mod refresh_scheduler;
pub mod slideshow_service;

pub use refresh_scheduler::TickSink;
pub use slideshow_service::{Presenter, Slideshow, SlideshowOptions};
