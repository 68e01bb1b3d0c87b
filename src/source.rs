//! The frame source abstraction.
//!
//! [`FrameSource`] is the seek-and-decode contract the
//! [`Navigator`](crate::Navigator) drives. Its position model follows the
//! usual capture-device convention: [`position`](FrameSource::position) is
//! the index of the frame the next [`read`](FrameSource::read) will return,
//! so right after a successful read the displayed frame is
//! `position() - 1`.
//!
//! The source is the only authority on clamping. Callers may seek to
//! negative positions or past the end; the source pins the request into
//! `0..=frame_count()` and a read at the end fails with
//! [`FrameGrabError::EndOfStream`].

use image::RgbImage;

use crate::error::FrameGrabError;

/// Indexed seek-and-decode access to a video's frames.
pub trait FrameSource {
    /// Total number of frames, fixed when the source was opened.
    fn frame_count(&self) -> u64;

    /// Index of the frame the next [`read`](FrameSource::read) returns.
    fn position(&self) -> u64;

    /// Move the read position to `frame_number`, clamped to
    /// `0..=frame_count()`.
    fn seek(&mut self, frame_number: i64) -> Result<(), FrameGrabError>;

    /// Decode the frame at [`position`](FrameSource::position) and advance
    /// past it.
    fn read(&mut self) -> Result<RgbImage, FrameGrabError>;
}

/// Clamp a requested frame number into `0..=frame_count`.
pub fn clamp_frame_number(frame_number: i64, frame_count: u64) -> u64 {
    if frame_number <= 0 {
        0
    } else {
        (frame_number as u64).min(frame_count)
    }
}
