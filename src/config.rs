//! Application configuration constants.

use std::time::Duration;

/// Supported image file extensions for scanning directories.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

/// Maximum share of the viewport height the image may occupy.
pub const IMAGE_MARGIN_FRACTION: f64 = 0.8;

/// Letterbox fill, matches the window background (#808080).
pub const BACKGROUND_COLOR: [u8; 3] = [0x80, 0x80, 0x80];

/// Viewport extents at or below this are treated as "not laid out yet".
pub const MIN_VIEWPORT_EXTENT: u32 = 1;

/// Delay between readiness polls of the viewport.
pub const RENDER_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Upper bound on readiness polls for a single render request.
pub const RENDER_MAX_ATTEMPTS: u32 = 50;

/// Delay before the first content cycle so the window can lay out.
pub const STARTUP_DELAY: Duration = Duration::from_millis(100);

/// Length of one scheduler time unit; the timer sleeps one unit per slice.
pub const TIMER_TIME_UNIT: Duration = Duration::from_secs(1);

/// How long a speed change waits for the previous timer to exit.
pub const TIMER_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Words shown when no count has been configured.
pub const DEFAULT_NOUN_COUNT: u32 = 3;

/// Largest word count offered by the selector.
pub const MAX_NOUN_COUNT: u32 = 10;

/// Words used when the bundled word list cannot be read.
pub const FALLBACK_WORDS: [&str; 3] = ["Error", "Loading", "Words"];
