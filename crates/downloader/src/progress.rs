// crates/downloader/src/progress.rs
//! Download progress reporting
//!
//! The byte counter is exact; only the terminal display is throttled.
//! Counter update and throttle check happen under one lock, so concurrent
//! writers cannot corrupt either.

use crate::terminal::{self, Terminal};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Minimum wall-clock gap between progress line rewrites.
const REPORT_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct ProgressState {
    total: i64,
    current: i64,
    last_report: Option<Instant>,
}

/// Byte counter for one transfer, throttling status lines to the terminal.
///
/// `total <= 0` means the size is unknown and the percentage stays blank.
/// The final state is not flushed after the transfer; the last emission is
/// whichever write last opened the 500 ms window.
#[derive(Clone)]
pub struct ProgressMeter {
    state: Arc<Mutex<ProgressState>>,
    terminal: Terminal,
}

impl ProgressMeter {
    /// Creates a meter. `current` carries bytes already present when
    /// resuming, so the percentage reflects true completion from the
    /// first write.
    pub fn new(terminal: Terminal, total: i64, current: i64) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProgressState {
                total,
                current,
                last_report: None,
            })),
            terminal,
        }
    }

    /// Records `n` freshly transferred bytes. Never fails.
    pub fn record(&self, n: usize) {
        self.record_at(n, Instant::now());
    }

    /// Exact byte count so far, including the initial resume offset.
    pub fn current(&self) -> i64 {
        self.state
            .lock()
            .map(|state| state.current)
            .unwrap_or_default()
    }

    /// Expected total size, non-positive when unknown.
    pub fn total(&self) -> i64 {
        self.state
            .lock()
            .map(|state| state.total)
            .unwrap_or_default()
    }

    // returns whether this call opened a report window
    fn record_at(&self, n: usize, now: Instant) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };

        state.current += n as i64;

        // efficient not to report on every write
        if let Some(last) = state.last_report {
            if now.duration_since(last) < REPORT_INTERVAL {
                return false;
            }
        }

        state.last_report = Some(now);
        self.terminal
            .print_progress(&terminal::percentage(state.current, state.total));
        true
    }
}
