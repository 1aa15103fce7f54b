//! Slideshow controller.
//!
//! Owns the settings and all runtime state and is only used from the UI
//! thread. The shell talks to it through the `on_*`/`request_*` entry points
//! and receives output through the [`Presenter`] port.

use crate::compositor::{self, Viewport};
use crate::config::{
    BACKGROUND_COLOR, IMAGE_MARGIN_FRACTION, MAX_NOUN_COUNT, RENDER_MAX_ATTEMPTS,
    RENDER_RETRY_DELAY,
};
use crate::error::Result;
use crate::image_loader;
use crate::services::refresh_scheduler::{
    RefreshScheduler, SchedulerState, SchedulerTiming, TickSink,
};
use crate::state::{PendingRender, RuntimeState, Settings, SettingsStore, Speed, WordList};
use image::{Rgb, RgbaImage};
use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What the presentation shell provides to the controller.
pub trait Presenter {
    /// Current size of the image region in physical pixels.
    fn viewport(&self) -> Viewport;
    /// Arrange for [`Slideshow::retry_pending_render`] to run after `delay`.
    fn schedule_render_retry(&self, delay: Duration);
    fn show_image(&self, frame: RgbaImage);
    fn show_words(&self, words: &[String]);
}

pub struct SlideshowOptions {
    pub margin_fraction: f64,
    pub background: Rgb<u8>,
    /// Used when the stored source is empty.
    pub default_source: PathBuf,
    pub timing: SchedulerTiming,
    pub seed: Option<u64>,
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self {
            margin_fraction: IMAGE_MARGIN_FRACTION,
            background: Rgb(BACKGROUND_COLOR),
            default_source: crate::paths::default_source_dir(),
            timing: SchedulerTiming::default(),
            seed: None,
        }
    }
}

pub struct Slideshow<P: Presenter> {
    settings: Settings,
    store: SettingsStore,
    runtime: RuntimeState,
    scheduler: RefreshScheduler,
    presenter: P,
    margin_fraction: f64,
    background: Rgb<u8>,
    rng: StdRng,
}

impl<P: Presenter> Slideshow<P> {
    /// Builds the image index from `settings` and arms the refresh timer.
    /// Nothing is displayed until [`Slideshow::start`].
    ///
    /// An empty `source` scans `options.default_source` instead. The
    /// substitute lives only in the index and is never saved.
    pub fn initialize(
        settings: Settings,
        store: SettingsStore,
        words: WordList,
        presenter: P,
        on_tick: TickSink,
        options: SlideshowOptions,
    ) -> Self {
        let scan_dir = if settings.source.trim().is_empty() {
            info!(
                "No source configured, using {}",
                options.default_source.display()
            );
            options.default_source.clone()
        } else {
            PathBuf::from(&settings.source)
        };

        let mut runtime = RuntimeState::new(words);
        runtime.index.rescan(&scan_dir);

        let mut scheduler = RefreshScheduler::new(options.timing, on_tick);
        if let Err(e) = scheduler.set_speed(settings.speed) {
            warn!("Failed to arm refresh timer: {}", e);
        }

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            settings,
            store,
            runtime,
            scheduler,
            presenter,
            margin_fraction: options.margin_fraction,
            background: options.background,
            rng,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn runtime(&self) -> &RuntimeState {
        &self.runtime
    }

    #[cfg(test)]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Runs the first content cycle.
    pub fn start(&mut self) {
        self.run_cycle();
    }

    /// Automatic refresh posted by the timer thread.
    pub fn handle_tick(&mut self, generation: u64) {
        if !self.scheduler.is_current(generation) {
            debug!("Ignoring tick from replaced timer #{}", generation);
            return;
        }
        self.run_cycle();
    }

    /// Refresh button: new content now, and the interval starts over.
    pub fn request_manual_refresh(&mut self) {
        self.run_cycle();
        if let Err(e) = self.scheduler.rearm() {
            warn!("Refresh timer not restarted: {}", e);
        }
    }

    /// Applies a new speed. When the old timer cannot be stopped the change
    /// is abandoned and the previous speed stays in effect.
    pub fn on_speed_changed(&mut self, speed: Speed) -> Result<()> {
        if let Err(e) = self.scheduler.set_speed(speed) {
            warn!("Speed change to {} aborted: {}", speed.label(), e);
            return Err(e);
        }

        info!("Speed set to {}", speed.label());
        self.settings.speed = speed;
        self.store.save(&self.settings);
        Ok(())
    }

    pub fn on_source_changed(&mut self, path: &Path) {
        info!("Source set to {}", path.display());
        self.settings.source = path.to_string_lossy().into_owned();
        self.store.save(&self.settings);

        self.runtime.index.rescan(path);
        self.request_manual_refresh();
    }

    /// Stores the new count and shows a fresh word selection of that size.
    /// Counts above [`MAX_NOUN_COUNT`] are capped.
    pub fn on_noun_count_changed(&mut self, count: u32) {
        if count == 0 {
            warn!("Ignoring word count of 0");
            return;
        }

        self.settings.noun_count = count.min(MAX_NOUN_COUNT);
        self.store.save(&self.settings);
        self.refresh_words();
    }

    /// Called by the shell after a delay requested via
    /// [`Presenter::schedule_render_retry`].
    pub fn retry_pending_render(&mut self) {
        self.runtime.retry_scheduled = false;
        self.try_render();
    }

    pub fn shutdown(&mut self) {
        if let Err(e) = self.scheduler.shutdown() {
            warn!("Refresh timer still running at shutdown: {}", e);
        }
        self.runtime.pending_render = None;
        info!(
            "Slideshow stopped, last image {:?}",
            self.runtime.current_image
        );
    }

    /// One content update: random image (if any), then fresh words.
    fn run_cycle(&mut self) {
        let next = self
            .runtime
            .index
            .pick_random(&mut self.rng)
            .map(Path::to_path_buf);

        match next {
            Some(path) => {
                self.runtime.pending_render = Some(PendingRender { path, attempts: 0 });
                self.try_render();
            }
            None => debug!("No images to show from {:?}", self.runtime.index.source()),
        }

        self.refresh_words();
    }

    fn refresh_words(&mut self) {
        let count = self.settings.noun_count as usize;
        let words = self.runtime.words.pick(count, &mut self.rng);
        self.presenter.show_words(&words);
        self.runtime.current_words = words;
    }

    fn try_render(&mut self) {
        let Some(pending) = self.runtime.pending_render.take() else {
            return;
        };

        let viewport = self.presenter.viewport();
        if !viewport.is_ready() {
            let attempts = pending.attempts + 1;
            if attempts >= RENDER_MAX_ATTEMPTS {
                warn!(
                    "Viewport still {}x{} after {} attempts, dropping {}",
                    viewport.width,
                    viewport.height,
                    attempts,
                    pending.path.display()
                );
                return;
            }

            debug!("Viewport not ready, deferring {}", pending.path.display());
            self.runtime.pending_render = Some(PendingRender {
                path: pending.path,
                attempts,
            });
            if !self.runtime.retry_scheduled {
                self.runtime.retry_scheduled = true;
                self.presenter.schedule_render_retry(RENDER_RETRY_DELAY);
            }
            return;
        }

        match self.render(&pending.path, viewport) {
            Ok(frame) => {
                debug!("Showing {}", pending.path.display());
                self.presenter.show_image(frame);
                self.runtime.current_image = Some(pending.path);
            }
            Err(e) => error!("Failed to display {}: {}", pending.path.display(), e),
        }
    }

    fn render(&self, path: &Path, viewport: Viewport) -> Result<RgbaImage> {
        let image = image_loader::load_image(path)?;
        compositor::composite(&image, viewport, self.margin_fraction, self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;

    #[derive(Default)]
    struct RecordingPresenter {
        viewport: Cell<(u32, u32)>,
        retries: RefCell<Vec<Duration>>,
        images: RefCell<Vec<(u32, u32)>>,
        words: RefCell<Vec<Vec<String>>>,
    }

    impl RecordingPresenter {
        fn with_viewport(width: u32, height: u32) -> Self {
            let presenter = Self::default();
            presenter.viewport.set((width, height));
            presenter
        }
    }

    impl Presenter for RecordingPresenter {
        fn viewport(&self) -> Viewport {
            let (w, h) = self.viewport.get();
            Viewport::new(w, h)
        }

        fn schedule_render_retry(&self, delay: Duration) {
            self.retries.borrow_mut().push(delay);
        }

        fn show_image(&self, frame: RgbaImage) {
            self.images.borrow_mut().push(frame.dimensions());
        }

        fn show_words(&self, words: &[String]) {
            self.words.borrow_mut().push(words.to_vec());
        }
    }

    fn quiet_sink() -> TickSink {
        Arc::new(|_| {})
    }

    fn options(default_source: &Path) -> SlideshowOptions {
        SlideshowOptions {
            default_source: default_source.to_path_buf(),
            timing: SchedulerTiming {
                time_unit: Duration::from_secs(1),
                stop_timeout: Duration::from_secs(5),
            },
            seed: Some(42),
            ..SlideshowOptions::default()
        }
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, image::Rgb([10, 200, 30]))
            .save(path)
            .unwrap();
    }

    fn words() -> WordList {
        WordList::from_text("owl\nheron\nwren\nkite\ncrow\nrook").unwrap()
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        images: PathBuf,
        store: SettingsStore,
    }

    fn fixture(image_count: usize) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir_all(&images).unwrap();
        for i in 0..image_count {
            write_png(&images.join(format!("{}.png", i)), 40 + i as u32, 30);
        }
        let store = SettingsStore::new(dir.path().join("state.json"));
        Fixture {
            _dir: dir,
            images,
            store,
        }
    }

    fn settings_for(source: &Path, speed: Speed) -> Settings {
        Settings {
            source: source.to_string_lossy().into_owned(),
            speed,
            noun_count: 3,
        }
    }

    #[test]
    fn cycle_shows_image_and_words() {
        let fx = fixture(3);
        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Normal),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );
        assert_eq!(show.scheduler_state(), SchedulerState::Armed);

        show.start();
        let presenter = show.presenter();
        assert_eq!(*presenter.images.borrow(), vec![(300, 200)]);
        assert_eq!(presenter.words.borrow().len(), 1);
        assert_eq!(presenter.words.borrow()[0].len(), 3);
        assert!(show.runtime().current_image.is_some());

        show.shutdown();
        assert_eq!(show.scheduler_state(), SchedulerState::Idle);
    }

    #[test]
    fn empty_source_still_refreshes_words() {
        let fx = fixture(0);
        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Paused),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );

        show.request_manual_refresh();
        assert!(show.presenter().images.borrow().is_empty());
        assert_eq!(show.presenter().words.borrow().len(), 1);
        assert_eq!(show.runtime().current_words.len(), 3);
    }

    #[test]
    fn empty_setting_uses_default_source() {
        let fx = fixture(1);
        let mut settings = Settings::default();
        settings.speed = Speed::Paused;
        let show = Slideshow::initialize(
            settings,
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );
        assert_eq!(show.settings().source, "");
        assert_eq!(show.runtime().index.source(), Some(fx.images.as_path()));
        assert_eq!(show.runtime().index.len(), 1);
    }

    #[test]
    fn default_source_is_not_written_back() {
        let fx = fixture(1);
        let mut settings = Settings::default();
        settings.speed = Speed::Paused;
        let mut show = Slideshow::initialize(
            settings,
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );

        show.on_noun_count_changed(4);
        show.on_speed_changed(Speed::Slow).unwrap();
        let stored = fx.store.load();
        assert_eq!(stored.source, "");
        assert_eq!(stored.noun_count, 4);
        assert_eq!(stored.speed, Speed::Slow);

        show.start();
        assert_eq!(show.presenter().images.borrow().len(), 1);
        show.shutdown();
    }

    #[test]
    fn oversized_word_count_is_capped() {
        let fx = fixture(0);
        let state_file = fx.images.parent().unwrap().join("state.json");
        fs::write(&state_file, r#"{"nounCount": 1000000, "speed": "Paused"}"#).unwrap();
        let settings = fx.store.load();
        assert_eq!(settings.noun_count, MAX_NOUN_COUNT);

        let mut show = Slideshow::initialize(
            settings,
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );
        show.start();
        assert_eq!(
            show.presenter().words.borrow()[0].len(),
            MAX_NOUN_COUNT as usize
        );

        show.on_noun_count_changed(u32::MAX);
        assert_eq!(show.settings().noun_count, MAX_NOUN_COUNT);
        assert_eq!(fx.store.load().noun_count, MAX_NOUN_COUNT);
        assert_eq!(
            show.presenter().words.borrow().last().unwrap().len(),
            MAX_NOUN_COUNT as usize
        );
    }

    #[test]
    fn unready_viewport_defers_until_laid_out() {
        let fx = fixture(1);
        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Paused),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(0, 0),
            quiet_sink(),
            options(&fx.images),
        );

        show.start();
        assert!(show.presenter().images.borrow().is_empty());
        assert_eq!(*show.presenter().retries.borrow(), vec![RENDER_RETRY_DELAY]);
        assert_eq!(show.presenter().words.borrow().len(), 1);

        // A second request while a retry is outstanding does not poll twice.
        show.request_manual_refresh();
        assert_eq!(show.presenter().retries.borrow().len(), 1);

        show.presenter().viewport.set((300, 200));
        show.retry_pending_render();
        assert_eq!(*show.presenter().images.borrow(), vec![(300, 200)]);
        assert!(show.runtime().pending_render.is_none());
    }

    #[test]
    fn deferred_render_gives_up_after_bounded_attempts() {
        let fx = fixture(1);
        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Paused),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(1, 1),
            quiet_sink(),
            options(&fx.images),
        );

        show.start();
        for _ in 0..RENDER_MAX_ATTEMPTS * 2 {
            show.retry_pending_render();
        }
        assert!(show.runtime().pending_render.is_none());
        assert_eq!(
            show.presenter().retries.borrow().len(),
            (RENDER_MAX_ATTEMPTS - 1) as usize
        );
        assert!(show.presenter().images.borrow().is_empty());
    }

    #[test]
    fn undecodable_image_keeps_previous_frame() {
        let fx = fixture(0);
        fs::write(fx.images.join("broken.jpg"), b"not a jpeg").unwrap();
        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Paused),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );

        show.start();
        assert!(show.presenter().images.borrow().is_empty());
        assert!(show.runtime().current_image.is_none());
        assert_eq!(show.presenter().words.borrow().len(), 1);
    }

    #[test]
    fn changes_are_persisted_immediately() {
        let fx = fixture(1);
        let other = fx.images.join("other");
        fs::create_dir_all(&other).unwrap();
        write_png(&other.join("x.bmp.png"), 8, 8);

        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Paused),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );

        show.on_noun_count_changed(5);
        assert_eq!(fx.store.load().noun_count, 5);
        assert_eq!(show.presenter().words.borrow().last().unwrap().len(), 5);

        show.on_speed_changed(Speed::Slow).unwrap();
        assert_eq!(fx.store.load().speed, Speed::Slow);
        assert_eq!(show.scheduler_state(), SchedulerState::Armed);

        show.on_source_changed(&other);
        let stored = fx.store.load();
        assert_eq!(stored.source, other.to_string_lossy());
        assert_eq!(stored.noun_count, 5);
        assert_eq!(show.runtime().index.len(), 1);
        assert_eq!(show.presenter().images.borrow().len(), 1);

        show.shutdown();
    }

    #[test]
    fn zero_word_count_is_ignored() {
        let fx = fixture(0);
        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Paused),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );
        show.on_noun_count_changed(0);
        assert_eq!(show.settings().noun_count, 3);
        assert!(show.presenter().words.borrow().is_empty());
    }

    #[test]
    fn pausing_mid_interval_stops_automatic_cycles() {
        let fx = fixture(1);
        let (tx, rx) = mpsc::channel();
        let sink: TickSink = Arc::new(move |generation| {
            let _ = tx.send(generation);
        });
        let mut opts = options(&fx.images);
        opts.timing.time_unit = Duration::from_millis(1);

        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Normal),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            sink,
            opts,
        );

        // Let the first automatic tick arrive and run it like the UI loop would.
        let first = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        show.handle_tick(first);
        assert_eq!(show.presenter().words.borrow().len(), 1);

        show.on_speed_changed(Speed::Paused).unwrap();
        assert_eq!(show.scheduler_state(), SchedulerState::Paused);

        thread::sleep(Duration::from_millis(700));
        let late: Vec<u64> = rx.try_iter().collect();
        for generation in late {
            show.handle_tick(generation);
        }
        assert_eq!(show.presenter().words.borrow().len(), 1);

        // Manual refresh still works while paused.
        show.request_manual_refresh();
        assert_eq!(show.presenter().words.borrow().len(), 2);
        assert_eq!(show.scheduler_state(), SchedulerState::Paused);
    }

    #[test]
    fn stale_tick_is_ignored_after_manual_refresh() {
        let fx = fixture(1);
        let mut show = Slideshow::initialize(
            settings_for(&fx.images, Speed::Fast),
            fx.store.clone(),
            words(),
            RecordingPresenter::with_viewport(300, 200),
            quiet_sink(),
            options(&fx.images),
        );
        let before = show.scheduler.current_generation().unwrap();

        show.request_manual_refresh();
        assert_eq!(show.presenter().words.borrow().len(), 1);

        show.handle_tick(before);
        assert_eq!(show.presenter().words.borrow().len(), 1);

        let current = show.scheduler.current_generation().unwrap();
        show.handle_tick(current);
        assert_eq!(show.presenter().words.borrow().len(), 2);
        show.shutdown();
    }
}
