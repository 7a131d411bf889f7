// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Progress bar and spinner displayed during network scans and file reads.
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{log_enabled, Level};

/// The bar is redrawn every `UPDATE` evaluated segments.
const UPDATE: u64 = 100;
/// Interval between two automatic ticks of a spinner.
const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Returns a progress bar of the given length, hidden unless logging at Info level.
fn new_bar(length: u64) -> ProgressBar {
    if log_enabled!(Level::Info) {
        ProgressBar::new(length)
    } else {
        ProgressBar::hidden()
    }
}

/// A progress bar that can be shared by the threads of a parallel scan.
#[derive(Debug, Clone)]
pub struct ScanProgressBar {
    bp: ProgressBar,
    done: Arc<AtomicU64>,
}

impl ScanProgressBar {
    /// Returns a [ScanProgressBar] for a scan of `length` items, with the given message.
    pub fn new(length: usize, msg: impl Into<Cow<'static, str>>) -> Self {
        let bp = new_bar(length as u64).with_message(msg);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg} {bar:40} {pos}/{len}") {
            bp.set_style(style);
        }
        ScanProgressBar {
            bp,
            done: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Marks one more item as done.
    pub fn inc(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % UPDATE == 0 {
            self.bp.set_position(done);
        }
    }

    /// Returns the number of items marked as done.
    pub fn position(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }

    /// Clears the progress bar.
    pub fn finish(&self) {
        self.bp.set_position(self.position());
        self.bp.finish_and_clear();
    }
}

/// A spinner, for tasks of unknown length.
#[derive(Debug)]
pub struct Spinner(ProgressBar);

impl Spinner {
    /// Starts a [Spinner] with the given message.
    pub fn new(msg: &str) -> Self {
        let bp = new_bar(1).with_message(msg.to_owned());
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            bp.set_style(style);
        }
        bp.enable_steady_tick(TICK_INTERVAL);
        Spinner(bp)
    }

    /// Clears the spinner.
    pub fn finish(&mut self) {
        self.0.finish_and_clear();
    }
}
