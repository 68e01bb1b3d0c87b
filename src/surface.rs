//! The display and input abstraction.
//!
//! A [`Surface`] shows the current frame, carries the position trackbar and
//! reports what the user did since the last poll. The navigator never talks
//! to a windowing library directly; the SDL2 implementation lives in
//! [`window`](crate::window) behind the `window` feature.

use std::time::Duration;

use image::RgbImage;

use crate::error::FrameGrabError;

/// One input event reported by a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable key, with shift already applied (`'a'` vs `'A'`).
    Key(char),
    /// A left-button double click on the frame, in frame pixels.
    DoubleClick {
        /// Horizontal position.
        x: u32,
        /// Vertical position.
        y: u32,
    },
    /// The user moved the trackbar. The value is 1-based: `n` addresses
    /// frame `n - 1`, and `0` is pinned to the first frame.
    Seek(u64),
    /// The window was closed.
    Close,
}

/// A rectangle in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build the region spanned by two corner points, in any order.
    pub fn from_corners((x0, y0): (u32, u32), (x1, y1): (u32, u32)) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: x0.abs_diff(x1),
            height: y0.abs_diff(y1),
        }
    }

    /// A cancelled selection yields an empty region.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Window surface and input delivery.
pub trait Surface {
    /// Display `frame`, replacing whatever was shown.
    fn show(&mut self, frame: &RgbImage) -> Result<(), FrameGrabError>;

    /// Move the trackbar to `value` without emitting a
    /// [`InputEvent::Seek`].
    fn set_position(&mut self, value: u64) -> Result<(), FrameGrabError>;

    /// Wait up to `timeout` for the next input event.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>, FrameGrabError>;

    /// Let the user drag out a rectangle over `frame`.
    ///
    /// Blocks until the selection is confirmed or cancelled; a cancelled
    /// selection returns an empty [`Region`].
    fn select_region(&mut self, frame: &RgbImage) -> Result<Region, FrameGrabError>;
}

#[cfg(test)]
mod tests {
    use super::Region;

    #[test]
    fn corners_in_any_order() {
        let expected = Region::new(10, 20, 40, 30);
        assert_eq!(Region::from_corners((10, 20), (50, 50)), expected);
        assert_eq!(Region::from_corners((50, 50), (10, 20)), expected);
        assert_eq!(Region::from_corners((50, 20), (10, 50)), expected);
    }

    #[test]
    fn degenerate_regions_are_empty() {
        assert!(Region::default().is_empty());
        assert!(Region::new(5, 5, 0, 10).is_empty());
        assert!(Region::new(5, 5, 10, 0).is_empty());
        assert!(!Region::new(0, 0, 1, 1).is_empty());
    }
}
