//! Background refresh timer.
//!
//! At most one timer thread is current at any time. The thread only sleeps
//! and reports ticks through the tick sink; the sink is expected to hand the
//! tick to the UI event loop. Each timer has its own stop flag and a
//! generation number so late ticks from a replaced timer can be ignored.

use crate::config::{TIMER_STOP_TIMEOUT, TIMER_TIME_UNIT};
use crate::error::{AppError, Result};
use crate::state::Speed;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Receives the generation of the timer that fired. Called on the timer thread.
pub type TickSink = Arc<dyn Fn(u64) + Send + Sync>;

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer, either before the first arm or after shutdown.
    Idle,
    /// A timer thread is running at the current interval.
    Armed,
    /// Automatic refresh is off; manual refresh still works.
    Paused,
}

/// Timing parameters, shortened in tests.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerTiming {
    pub time_unit: Duration,
    pub stop_timeout: Duration,
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        Self {
            time_unit: TIMER_TIME_UNIT,
            stop_timeout: TIMER_STOP_TIMEOUT,
        }
    }
}

struct TimerWorker {
    generation: u64,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct RefreshScheduler {
    timing: SchedulerTiming,
    speed: Speed,
    /// Set by the first `set_speed`, cleared by `shutdown`.
    active: bool,
    next_generation: u64,
    worker: Option<TimerWorker>,
    on_tick: TickSink,
}

impl RefreshScheduler {
    pub fn new(timing: SchedulerTiming, on_tick: TickSink) -> Self {
        Self {
            timing,
            speed: Speed::Paused,
            active: false,
            next_generation: 1,
            worker: None,
            on_tick,
        }
    }

    pub fn state(&self) -> SchedulerState {
        match &self.worker {
            Some(worker) if !worker.stop.load(Ordering::SeqCst) && !worker.handle.is_finished() => {
                SchedulerState::Armed
            }
            _ if self.active && self.speed == Speed::Paused => SchedulerState::Paused,
            _ => SchedulerState::Idle,
        }
    }

    #[cfg(test)]
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Generation of the current timer, if one is running.
    #[cfg(test)]
    pub fn current_generation(&self) -> Option<u64> {
        self.worker.as_ref().map(|w| w.generation)
    }

    /// True when `generation` belongs to the current, non-stopped timer.
    pub fn is_current(&self, generation: u64) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| w.generation == generation && !w.stop.load(Ordering::SeqCst))
    }

    /// Switches to `speed`: stops the running timer and arms a new one unless
    /// paused. If the old timer does not stop in time nothing changes.
    pub fn set_speed(&mut self, speed: Speed) -> Result<()> {
        self.stop_current()?;
        self.speed = speed;
        self.active = true;
        self.arm();
        Ok(())
    }

    /// Restarts the interval from zero; used after a manual refresh.
    pub fn rearm(&mut self) -> Result<()> {
        if !self.active || self.speed == Speed::Paused {
            return Ok(());
        }
        self.stop_current()?;
        self.arm();
        Ok(())
    }

    /// Stops the timer for good.
    pub fn shutdown(&mut self) -> Result<()> {
        self.stop_current()?;
        self.active = false;
        Ok(())
    }

    fn arm(&mut self) {
        let Some(units) = self.speed.interval_units() else {
            debug!("Refresh paused, no timer armed");
            return;
        };

        let generation = self.next_generation;
        self.next_generation += 1;

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let on_tick = self.on_tick.clone();
        let time_unit = self.timing.time_unit;

        let handle =
            thread::spawn(move || run_timer(generation, units, time_unit, thread_stop, on_tick));

        info!(
            "Armed refresh timer #{} ({}, {} x {:?})",
            generation,
            self.speed.label(),
            units,
            time_unit
        );
        self.worker = Some(TimerWorker {
            generation,
            stop,
            handle,
        });
    }

    /// Signals the current timer and waits up to `stop_timeout` for it to exit.
    /// On timeout the stop request is withdrawn and the old timer keeps running.
    fn stop_current(&mut self) -> Result<()> {
        let Some(worker) = self.worker.as_ref() else {
            return Ok(());
        };

        worker.stop.store(true, Ordering::SeqCst);
        debug!("Waiting for refresh timer #{} to stop", worker.generation);

        let deadline = Instant::now() + self.timing.stop_timeout;
        let poll = self.timing.time_unit.min(Duration::from_millis(10));
        while !worker.handle.is_finished() {
            if Instant::now() >= deadline {
                if !withdraw_stop(worker) {
                    break;
                }
                warn!(
                    "Refresh timer #{} did not stop within {:?}, keeping it",
                    worker.generation, self.timing.stop_timeout
                );
                return Err(AppError::TimerStopTimeout {
                    generation: worker.generation,
                });
            }
            thread::sleep(poll);
        }

        if let Some(worker) = self.worker.take() {
            if worker.handle.join().is_err() {
                warn!("Refresh timer #{} panicked", worker.generation);
            }
        }
        Ok(())
    }
}

/// Clears a stop request. Returns false if the thread exited before the
/// request was withdrawn, in which case it has to be replaced.
fn withdraw_stop(worker: &TimerWorker) -> bool {
    worker.stop.store(false, Ordering::SeqCst);
    !worker.handle.is_finished()
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(worker) = &self.worker {
            worker.stop.store(true, Ordering::SeqCst);
        }
    }
}

fn run_timer(
    generation: u64,
    units: u32,
    time_unit: Duration,
    stop: Arc<AtomicBool>,
    on_tick: TickSink,
) {
    loop {
        for _ in 0..units {
            if stop.load(Ordering::SeqCst) {
                debug!("Refresh timer #{} stopping early", generation);
                return;
            }
            thread::sleep(time_unit);
        }

        if stop.load(Ordering::SeqCst) {
            return;
        }
        on_tick(generation);
    }
}
