//! Navigation session options.
//!
//! [`GrabberOptions`] is a builder that carries the handful of runtime
//! settings the navigator and the window need, so the command-line layer
//! can map its flags onto one value.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use framegrab::GrabberOptions;
//!
//! let options = GrabberOptions::new()
//!     .with_poll_interval(Duration::from_millis(40))
//!     .with_coarse_step(25)
//!     .with_output_directory("captures")
//!     .with_start_paused(true);
//! assert_eq!(options.coarse_step(), 25);
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::action::DEFAULT_COARSE_STEP;

/// Default wait for an input event per loop iteration.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(120);

/// Default title of the display window.
pub const DEFAULT_WINDOW_TITLE: &str = "Frame Grabber";

/// Default initial window size in pixels.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (2400, 1600);

/// Settings for a navigation session.
#[derive(Debug, Clone)]
pub struct GrabberOptions {
    poll_interval: Duration,
    coarse_step: u32,
    output_directory: PathBuf,
    window_title: String,
    window_size: (u32, u32),
    start_paused: bool,
}

impl Default for GrabberOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl GrabberOptions {
    /// Create options with default settings.
    ///
    /// Defaults: 120 ms poll interval, coarse step 10, output to the current
    /// directory, a 2400×1600 window titled "Frame Grabber", playback running.
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            coarse_step: DEFAULT_COARSE_STEP,
            output_directory: PathBuf::from("."),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            window_size: DEFAULT_WINDOW_SIZE,
            start_paused: false,
        }
    }

    /// Set how long each loop iteration waits for input.
    ///
    /// Clamped to a minimum of one millisecond.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Set the magnitude of the coarse skip bound to `A` / `D`.
    ///
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_coarse_step(mut self, step: u32) -> Self {
        self.coarse_step = step.max(1);
        self
    }

    /// Set the directory saved images are written to.
    #[must_use]
    pub fn with_output_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.output_directory = directory.as_ref().to_path_buf();
        self
    }

    /// Set the display window title.
    #[must_use]
    pub fn with_window_title<S: Into<String>>(mut self, title: S) -> Self {
        self.window_title = title.into();
        self
    }

    /// Set the initial window size in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    /// Start the session paused instead of playing.
    #[must_use]
    pub fn with_start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn coarse_step(&self) -> u32 {
        self.coarse_step
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn start_paused(&self) -> bool {
        self.start_paused
    }
}
