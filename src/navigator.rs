//! The frame-navigation and action-dispatch loop.
//!
//! [`Navigator`] owns the [`Session`] (displayed frame, its index, play
//! state) together with the three collaborators it coordinates: a
//! [`FrameSource`] to decode from, a [`Surface`] to show frames and collect
//! input, and a [`Prompt`] for region labels.
//!
//! One loop iteration ([`Navigator::tick`]) advances playback by one frame
//! when playing, prints the current index, waits up to the poll interval for
//! a single input event and dispatches it. Everything runs on the calling
//! thread; region selection and the label prompt block the loop until they
//! return.
//!
//! # Position arithmetic
//!
//! The source reports the index of the *next* frame to be read, so after a
//! successful read the displayed frame is `position - 1`. Steps are taken
//! from the session's `current_index` rather than from the source, since the
//! two disagree after a trackbar seek whose frame could not be decoded. The
//! trackbar shows `position` after a step, i.e. the 1-based number of the
//! displayed frame, which is the same convention [`InputEvent::Seek`] uses.
//!
//! # Decode failures
//!
//! None of them reach the caller:
//!
//! - a failed step leaves the frame *and* the index unchanged;
//! - a failed trackbar seek still moves the index to the seek target, the
//!   last good frame stays on screen;
//! - a failed playback read (end of stream) leaves everything as it was.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::{
    action::{ActionTable, Command},
    annotate,
    error::FrameGrabError,
    options::GrabberOptions,
    prompt::Prompt,
    source::FrameSource,
    surface::{InputEvent, Surface},
};

/// Text shown by the label prompt.
pub const LABEL_PROMPT: &str = "Enter some text below!";

/// Whether playback advances on every loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

impl PlaybackState {
    fn toggled(self) -> Self {
        match self {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
        }
    }
}

/// Whether the loop should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Navigation state of one open video.
#[derive(Debug, Clone)]
pub struct Session {
    total_frame_count: u64,
    current_index: u64,
    playback: PlaybackState,
    frame: RgbImage,
}

impl Session {
    pub fn total_frame_count(&self) -> u64 {
        self.total_frame_count
    }

    /// 0-based index of the displayed frame.
    pub fn current_index(&self) -> u64 {
        self.current_index
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    /// The frame currently on display.
    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }
}

/// Drives a [`Session`] from user input.
///
/// # Example
///
/// ```no_run
/// # #[cfg(feature = "window")]
/// # fn main() -> Result<(), framegrab::FrameGrabError> {
/// use framegrab::{GrabberOptions, Navigator, SdlWindow, TerminalPrompt, VideoFile};
///
/// let options = GrabberOptions::new();
/// let video = VideoFile::open("input.mp4")?;
/// let window = SdlWindow::open(&options, video.metadata().frame_count)?;
/// let mut navigator =
///     Navigator::new(video, window, TerminalPrompt::new(), "input.mp4", options)?;
/// navigator.run()?;
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "window"))]
/// # fn main() {}
/// ```
pub struct Navigator<F, S, P> {
    source: F,
    surface: S,
    prompt: P,
    actions: ActionTable,
    options: GrabberOptions,
    video_path: PathBuf,
    session: Session,
}

impl<F: FrameSource, S: Surface, P: Prompt> Navigator<F, S, P> {
    /// Start a session on an opened source.
    ///
    /// Decodes the first frame, shows it and syncs the trackbar. The session
    /// starts playing unless the options say otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::VideoDecodeError`] if the first frame cannot
    /// be decoded, or any error from the surface.
    pub fn new<Q: AsRef<Path>>(
        mut source: F,
        mut surface: S,
        prompt: P,
        video_path: Q,
        options: GrabberOptions,
    ) -> Result<Self, FrameGrabError> {
        let video_path = video_path.as_ref().to_path_buf();

        let frame = source.read().map_err(|error| {
            FrameGrabError::VideoDecodeError(format!(
                "Could not read/decode frames from {}: {error}",
                video_path.display()
            ))
        })?;

        surface.show(&frame)?;
        surface.set_position(source.position())?;

        let playback = if options.start_paused() {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        };

        let session = Session {
            total_frame_count: source.frame_count(),
            current_index: source.position().saturating_sub(1),
            playback,
            frame,
        };

        log::debug!(
            "Session started on {} ({} frames, {:?})",
            video_path.display(),
            session.total_frame_count,
            session.playback,
        );

        Ok(Self {
            source,
            surface,
            prompt,
            actions: ActionTable::new(options.coarse_step()),
            options,
            video_path,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Move `delta` frames away from the current index.
    ///
    /// On a failed seek or decode the displayed frame and index stay as
    /// they were.
    pub fn step(&mut self, delta: i64) -> Result<(), FrameGrabError> {
        let requested = self.session.current_index as i64 + delta;

        if let Err(error) = self.source.seek(requested) {
            log::debug!("Step {delta:+} to frame {requested}: seek failed: {error}");
            return Ok(());
        }

        match self.source.read() {
            Ok(frame) => {
                self.session.frame = frame;
                self.session.current_index = self.source.position().saturating_sub(1);
                self.surface.set_position(self.source.position())?;
                self.surface.show(&self.session.frame)?;
            }
            Err(error) => {
                log::debug!("Step {delta:+} to frame {requested}: keeping previous frame: {error}");
            }
        }
        Ok(())
    }

    /// Jump to a 1-based trackbar value.
    ///
    /// Unlike [`step`](Navigator::step) the index always follows the seek,
    /// even when the frame there cannot be decoded.
    pub fn seek_to_absolute(&mut self, value: u64) -> Result<(), FrameGrabError> {
        let requested = value as i64 - 1;

        if let Err(error) = self.source.seek(requested) {
            log::debug!("Trackbar seek to frame {requested} failed: {error}");
        }
        self.session.current_index = self.source.position();

        match self.source.read() {
            Ok(frame) => {
                self.session.frame = frame;
                self.session.current_index = self.source.position().saturating_sub(1);
            }
            Err(error) => {
                log::debug!("Trackbar seek to frame {requested}: nothing decoded: {error}");
            }
        }
        self.surface.show(&self.session.frame)
    }

    /// Write the displayed frame to `image_<epoch seconds>.png`.
    pub fn save_current_frame(&mut self) -> Result<PathBuf, FrameGrabError> {
        let path = annotate::save_png(
            &self.session.frame,
            self.options.output_directory(),
            &annotate::snapshot_file_name_now(),
        )?;
        log::info!(
            "Saved frame {} to {}",
            self.session.current_index,
            path.display()
        );
        Ok(path)
    }

    /// Select a region, ask for a label, draw both onto the displayed frame
    /// and write it to `<stem>_frame_<index>_ROI.png`.
    ///
    /// A cancelled prompt draws no label but still saves.
    pub fn select_region_and_annotate(&mut self) -> Result<PathBuf, FrameGrabError> {
        let region = self.surface.select_region(&self.session.frame)?;
        log::debug!("Selected region {region:?}");

        let mut annotated = self.session.frame.clone();
        annotate::draw_region(&mut annotated, region);
        self.session.frame = annotated;
        self.surface.show(&self.session.frame)?;

        let label = self.prompt.prompt_text(LABEL_PROMPT)?.unwrap_or_default();

        let mut annotated = self.session.frame.clone();
        annotate::draw_region_label(&mut annotated, region, &label);
        self.session.frame = annotated;
        self.surface.show(&self.session.frame)?;

        let file_name = annotate::region_file_name(&self.video_path, self.session.current_index);
        let path = annotate::save_png(
            &self.session.frame,
            self.options.output_directory(),
            &file_name,
        )?;
        log::info!(
            "Saved annotated frame {} to {}",
            self.session.current_index,
            path.display()
        );
        Ok(path)
    }

    pub fn toggle_play(&mut self) {
        self.session.playback = self.session.playback.toggled();
        log::debug!("Playback {:?}", self.session.playback);
    }

    /// Read the next frame for playback and show whatever is current
    /// afterwards. The trackbar is left alone.
    pub fn advance_playback(&mut self) -> Result<(), FrameGrabError> {
        match self.source.read() {
            Ok(frame) => {
                self.session.frame = frame;
                self.session.current_index = self.source.position().saturating_sub(1);
            }
            Err(error) => log::trace!("Playback read failed: {error}"),
        }
        self.surface.show(&self.session.frame)
    }

    /// Perform one command.
    pub fn dispatch(&mut self, command: Command) -> Result<LoopControl, FrameGrabError> {
        log::debug!("Dispatching {command:?}");
        match command {
            Command::Step(delta) => self.step(delta)?,
            Command::SaveFrame => {
                self.save_current_frame()?;
            }
            Command::SelectRegionAndAnnotate => {
                self.select_region_and_annotate()?;
            }
            Command::TogglePlay => self.toggle_play(),
            Command::Quit => return Ok(LoopControl::Quit),
        }
        Ok(LoopControl::Continue)
    }

    /// React to one input event. Unbound keys do nothing.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<LoopControl, FrameGrabError> {
        match event {
            InputEvent::Key(key) => match self.actions.lookup(key) {
                Some(command) => self.dispatch(command),
                None => Ok(LoopControl::Continue),
            },
            InputEvent::DoubleClick { .. } => self.dispatch(Command::SaveFrame),
            InputEvent::Seek(value) => {
                self.seek_to_absolute(value)?;
                Ok(LoopControl::Continue)
            }
            InputEvent::Close => Ok(LoopControl::Quit),
        }
    }

    /// Run one loop iteration.
    pub fn tick(&mut self) -> Result<LoopControl, FrameGrabError> {
        if self.session.is_playing() {
            self.advance_playback()?;
        }

        println!("{}", self.session.current_index);

        match self.surface.poll_event(self.options.poll_interval())? {
            Some(event) => self.handle_event(event),
            None => Ok(LoopControl::Continue),
        }
    }

    /// Loop until the user quits or closes the window.
    pub fn run(&mut self) -> Result<(), FrameGrabError> {
        while self.tick()? == LoopControl::Continue {}
        log::info!("Quit at frame {}", self.session.current_index);
        Ok(())
    }
}
