//! Scripted in-memory collaborators for driving a `Navigator` in tests.

#![allow(dead_code)]

use std::{
    collections::{HashSet, VecDeque},
    path::Path,
    time::Duration,
};

use framegrab::{
    FrameGrabError, FrameSource, GrabberOptions, InputEvent, Navigator, Prompt, Region, Surface,
    source::clamp_frame_number,
};
use image::{Rgb, RgbImage};

pub const FRAME_SIZE: u32 = 64;

/// A synthetic frame whose first pixel encodes its frame number.
pub fn synthetic_frame(frame_number: u64) -> RgbImage {
    RgbImage::from_pixel(
        FRAME_SIZE,
        FRAME_SIZE,
        Rgb([(frame_number % 256) as u8, (frame_number / 256) as u8, 7]),
    )
}

/// Recover the frame number encoded by [`synthetic_frame`].
pub fn frame_number_of(frame: &RgbImage) -> u64 {
    let pixel = frame.get_pixel(FRAME_SIZE - 1, FRAME_SIZE - 1);
    pixel[0] as u64 + pixel[1] as u64 * 256
}

/// Frame source over `frame_count` synthetic frames.
#[derive(Debug, Default)]
pub struct MemorySource {
    frame_count: u64,
    position: u64,
    undecodable: HashSet<u64>,
    pub seeks: Vec<i64>,
    pub reads: usize,
}

impl MemorySource {
    pub fn new(frame_count: u64) -> Self {
        Self {
            frame_count,
            ..Self::default()
        }
    }

    /// Make reads at these frame numbers fail with a decode error.
    pub fn with_undecodable(mut self, frames: impl IntoIterator<Item = u64>) -> Self {
        self.undecodable.extend(frames);
        self
    }
}

impl FrameSource for MemorySource {
    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, frame_number: i64) -> Result<(), FrameGrabError> {
        self.seeks.push(frame_number);
        self.position = clamp_frame_number(frame_number, self.frame_count);
        Ok(())
    }

    fn read(&mut self) -> Result<RgbImage, FrameGrabError> {
        self.reads += 1;
        if self.position >= self.frame_count {
            return Err(FrameGrabError::EndOfStream {
                position: self.position,
            });
        }
        if self.undecodable.contains(&self.position) {
            return Err(FrameGrabError::VideoDecodeError(format!(
                "frame {} is corrupt",
                self.position
            )));
        }
        let frame = synthetic_frame(self.position);
        self.position += 1;
        Ok(frame)
    }
}

/// Surface that replays queued events and records what it was asked to do.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    events: VecDeque<InputEvent>,
    region: Region,
    pub shown: Vec<u64>,
    pub trackbar: Vec<u64>,
    pub polls: usize,
    pub selections: usize,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = InputEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn last_shown(&self) -> Option<u64> {
        self.shown.last().copied()
    }
}

impl Surface for ScriptedSurface {
    fn show(&mut self, frame: &RgbImage) -> Result<(), FrameGrabError> {
        self.shown.push(frame_number_of(frame));
        Ok(())
    }

    fn set_position(&mut self, value: u64) -> Result<(), FrameGrabError> {
        self.trackbar.push(value);
        Ok(())
    }

    fn poll_event(&mut self, _timeout: Duration) -> Result<Option<InputEvent>, FrameGrabError> {
        self.polls += 1;
        Ok(self.events.pop_front())
    }

    fn select_region(&mut self, _frame: &RgbImage) -> Result<Region, FrameGrabError> {
        self.selections += 1;
        Ok(self.region)
    }
}

/// Prompt with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct FixedPrompt {
    answer: Option<String>,
}

impl FixedPrompt {
    pub fn answering(text: &str) -> Self {
        Self {
            answer: Some(text.to_string()),
        }
    }

    pub fn cancelled() -> Self {
        Self { answer: None }
    }
}

impl Prompt for FixedPrompt {
    fn prompt_text(&mut self, _message: &str) -> Result<Option<String>, FrameGrabError> {
        Ok(self.answer.clone())
    }
}

pub type TestNavigator = Navigator<MemorySource, ScriptedSurface, FixedPrompt>;

/// Navigator over `frame_count` synthetic frames writing into `output`.
pub fn navigator(frame_count: u64, output: &Path) -> TestNavigator {
    navigator_with(
        MemorySource::new(frame_count),
        ScriptedSurface::new(),
        FixedPrompt::answering("t"),
        GrabberOptions::new().with_output_directory(output),
    )
}

pub fn navigator_with(
    source: MemorySource,
    surface: ScriptedSurface,
    prompt: FixedPrompt,
    options: GrabberOptions,
) -> TestNavigator {
    let Ok(navigator) = Navigator::new(source, surface, prompt, "videos/sample.mp4", options)
    else {
        panic!("navigator should start on a decodable source");
    };
    navigator
}

/// Number of files in `directory`.
pub fn file_count(directory: &Path) -> usize {
    std::fs::read_dir(directory)
        .expect("Failed to list output directory")
        .count()
}
