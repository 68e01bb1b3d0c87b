//! # framegrab
//!
//! Scrub through a video, preview frames, and save the ones you want as PNG
//! images, optionally with a labelled rectangle drawn on them.
//!
//! The crate is built around [`Navigator`], a single-threaded event loop
//! that keeps track of the displayed frame and reacts to keys, trackbar
//! moves and double clicks. It talks to three collaborators through traits:
//!
//! - [`FrameSource`]: seek and decode. [`VideoFile`] implements it on top of
//!   FFmpeg via [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next).
//! - [`Surface`]: show frames, deliver input, select regions.
//!   [`SdlWindow`] implements it with SDL2 (feature `window`, on by
//!   default).
//! - [`Prompt`]: ask for a label. [`TerminalPrompt`] reads a line from the
//!   terminal.
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "window")]
//! # fn main() -> Result<(), framegrab::FrameGrabError> {
//! use framegrab::{GrabberOptions, Navigator, SdlWindow, TerminalPrompt, VideoFile};
//!
//! let options = GrabberOptions::new().with_output_directory("captures");
//! let video = VideoFile::open("input.mp4")?;
//! let window = SdlWindow::open(&options, video.metadata().frame_count)?;
//! let mut navigator =
//!     Navigator::new(video, window, TerminalPrompt::new(), "input.mp4", options)?;
//! navigator.run()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "window"))]
//! # fn main() {}
//! ```
//!
//! ## Controls
//!
//! | Input | Effect |
//! |-------|--------|
//! | `d` / `a` | one frame forward / backward |
//! | `D` / `A` | coarse skip forward / backward (10 frames by default) |
//! | `s`, double click | save the current frame as `image_<epoch seconds>.png` |
//! | `r` | select a region, enter a label, save `<video>_frame_<n>_ROI.png` |
//! | `p` | play / pause |
//! | `q`, close window | quit |
//! | trackbar | jump to a frame |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed, and SDL2 when the
//! `window` feature is enabled.

pub mod action;
pub mod annotate;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod navigator;
pub mod options;
pub mod prompt;
pub mod source;
pub mod surface;
mod utilities;
pub mod video;
#[cfg(feature = "window")]
pub mod window;

pub use action::{ActionTable, Command};
pub use error::FrameGrabError;
pub use ffmpeg::{FfmpegLogLevel, ffmpeg_version, set_ffmpeg_log_level};
pub use metadata::VideoMetadata;
pub use navigator::{LoopControl, Navigator, PlaybackState, Session};
pub use options::GrabberOptions;
pub use prompt::{Prompt, TerminalPrompt};
pub use source::FrameSource;
pub use surface::{InputEvent, Region, Surface};
pub use video::VideoFile;
#[cfg(feature = "window")]
pub use window::SdlWindow;
