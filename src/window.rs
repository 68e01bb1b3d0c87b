//! SDL2 implementation of [`Surface`].
//!
//! The window shows the frame letterboxed above a thin trackbar. Clicking or
//! dragging the trackbar reports [`InputEvent::Seek`]; a left double click on
//! the picture reports [`InputEvent::DoubleClick`]; printable keys arrive
//! through SDL text input so shifted letters come through as capitals.
//!
//! Region selection is a nested event loop: drag with the left button,
//! confirm with Enter or Space, cancel with Escape or `c`.

use std::time::{Duration, Instant};

use image::RgbImage;
use sdl2::{
    EventPump, Sdl, VideoSubsystem,
    event::{Event, WindowEvent},
    keyboard::Keycode,
    mouse::MouseButton,
    pixels::{Color, PixelFormatEnum},
    rect::Rect,
    render::{Canvas, TextureCreator},
    video::{Window, WindowContext},
};

use crate::{
    error::FrameGrabError,
    options::GrabberOptions,
    surface::{InputEvent, Region, Surface},
};

const TRACKBAR_HEIGHT: u32 = 28;
const BACKGROUND: Color = Color::RGB(0, 0, 0);
const TRACK_COLOR: Color = Color::RGB(48, 48, 48);
const FILL_COLOR: Color = Color::RGB(90, 140, 220);
const KNOB_COLOR: Color = Color::RGB(235, 235, 235);
const SELECTION_COLOR: Color = Color::RGB(255, 0, 0);

fn window_error<E: ToString>(error: E) -> FrameGrabError {
    FrameGrabError::WindowError(error.to_string())
}

/// A resizable SDL2 window with a position trackbar.
pub struct SdlWindow {
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    event_pump: EventPump,
    frame_count: u64,
    position: u64,
    frame: Option<RgbImage>,
    dragging_trackbar: bool,
    _video: VideoSubsystem,
    _context: Sdl,
}

impl SdlWindow {
    /// Open the window. The trackbar ranges over `0..=frame_count`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGrabError::WindowError`] if SDL cannot be initialised
    /// or the window cannot be created.
    pub fn open(options: &GrabberOptions, frame_count: u64) -> Result<Self, FrameGrabError> {
        let context = sdl2::init().map_err(window_error)?;
        let video = context.video().map_err(window_error)?;

        let (width, height) = options.window_size();
        let window = video
            .window(options.window_title(), width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(window_error)?;
        let canvas = window.into_canvas().build().map_err(window_error)?;
        let texture_creator = canvas.texture_creator();
        let event_pump = context.event_pump().map_err(window_error)?;

        video.text_input().start();

        log::debug!(
            "Opened {width}x{height} window \"{}\" (trackbar 0..={frame_count})",
            options.window_title()
        );

        Ok(Self {
            canvas,
            texture_creator,
            event_pump,
            frame_count,
            position: 0,
            frame: None,
            dragging_trackbar: false,
            _video: video,
            _context: context,
        })
    }

    /// Picture area and trackbar area, in window pixels.
    fn layout(&self) -> Result<(Rect, Rect), FrameGrabError> {
        let (width, height) = self.canvas.output_size().map_err(window_error)?;
        Ok(split_layout(width, height))
    }

    /// Where the current frame is drawn, in window pixels.
    fn frame_target(&self) -> Result<Option<Rect>, FrameGrabError> {
        let (picture, _) = self.layout()?;
        Ok(self
            .frame
            .as_ref()
            .map(|frame| fit_rect((frame.width(), frame.height()), picture)))
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame
            .as_ref()
            .map_or((0, 0), |frame| (frame.width(), frame.height()))
    }

    fn render(&mut self, selection: Option<Rect>) -> Result<(), FrameGrabError> {
        let (picture, trackbar) = self.layout()?;

        self.canvas.set_draw_color(BACKGROUND);
        self.canvas.clear();

        if let Some(frame) = &self.frame {
            let mut texture = self
                .texture_creator
                .create_texture_streaming(PixelFormatEnum::RGB24, frame.width(), frame.height())
                .map_err(window_error)?;
            texture
                .update(None, frame.as_raw(), frame.width() as usize * 3)
                .map_err(window_error)?;
            let target = fit_rect((frame.width(), frame.height()), picture);
            self.canvas
                .copy(&texture, None, Some(target))
                .map_err(window_error)?;
        }

        if let Some(selection) = selection {
            self.canvas.set_draw_color(SELECTION_COLOR);
            self.canvas.draw_rect(selection).map_err(window_error)?;
        }

        self.draw_trackbar(trackbar)?;
        self.canvas.present();
        Ok(())
    }

    fn draw_trackbar(&mut self, trackbar: Rect) -> Result<(), FrameGrabError> {
        self.canvas.set_draw_color(TRACK_COLOR);
        self.canvas.fill_rect(trackbar).map_err(window_error)?;

        let filled = if self.frame_count == 0 {
            0
        } else {
            (trackbar.width() as u64 * self.position.min(self.frame_count) / self.frame_count)
                as i32
        };
        let groove = trackbar.height() / 3;

        self.canvas.set_draw_color(FILL_COLOR);
        self.canvas
            .fill_rect(Rect::new(
                trackbar.x(),
                trackbar.y() + groove as i32,
                filled.max(1) as u32,
                groove,
            ))
            .map_err(window_error)?;

        self.canvas.set_draw_color(KNOB_COLOR);
        self.canvas
            .fill_rect(Rect::new(
                trackbar.x() + filled - 3,
                trackbar.y() + 2,
                6,
                trackbar.height().saturating_sub(4),
            ))
            .map_err(window_error)
    }

    fn move_trackbar(&mut self, x: i32, trackbar: Rect) -> Result<InputEvent, FrameGrabError> {
        self.position = trackbar_value(x, trackbar, self.frame_count);
        self.render(None)?;
        Ok(InputEvent::Seek(self.position))
    }

    fn translate(&mut self, event: Event) -> Result<Option<InputEvent>, FrameGrabError> {
        let input = match event {
            Event::Quit { .. } => Some(InputEvent::Close),
            Event::TextInput { text, .. } => text.chars().next().map(InputEvent::Key),
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                clicks,
                x,
                y,
                ..
            } => {
                let (_, trackbar) = self.layout()?;
                if trackbar.contains_point((x, y)) {
                    self.dragging_trackbar = true;
                    Some(self.move_trackbar(x, trackbar)?)
                } else if clicks >= 2 {
                    let (x, y) = match self.frame_target()? {
                        Some(target) => window_to_frame((x, y), target, self.frame_size()),
                        None => (0, 0),
                    };
                    Some(InputEvent::DoubleClick { x, y })
                } else {
                    None
                }
            }
            Event::MouseMotion { mousestate, x, .. }
                if self.dragging_trackbar && mousestate.left() =>
            {
                let (_, trackbar) = self.layout()?;
                if trackbar_value(x, trackbar, self.frame_count) == self.position {
                    None
                } else {
                    Some(self.move_trackbar(x, trackbar)?)
                }
            }
            Event::MouseButtonUp {
                mouse_btn: MouseButton::Left,
                ..
            } => {
                self.dragging_trackbar = false;
                None
            }
            Event::Window {
                win_event: WindowEvent::Resized(..) | WindowEvent::SizeChanged(..) | WindowEvent::Exposed,
                ..
            } => {
                self.render(None)?;
                None
            }
            _ => None,
        };
        Ok(input)
    }
}

impl Surface for SdlWindow {
    fn show(&mut self, frame: &RgbImage) -> Result<(), FrameGrabError> {
        self.frame = Some(frame.clone());
        self.render(None)
    }

    fn set_position(&mut self, value: u64) -> Result<(), FrameGrabError> {
        self.position = value.min(self.frame_count);
        self.render(None)
    }

    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>, FrameGrabError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            let wait = remaining.as_millis().clamp(1, u32::MAX as u128) as u32;
            let Some(event) = self.event_pump.wait_event_timeout(wait) else {
                return Ok(None);
            };
            if let Some(input) = self.translate(event)? {
                return Ok(Some(input));
            }
        }
    }

    fn select_region(&mut self, frame: &RgbImage) -> Result<Region, FrameGrabError> {
        self.frame = Some(frame.clone());
        self.dragging_trackbar = false;
        self.render(None)?;

        let mut anchor: Option<(i32, i32)> = None;
        let mut cursor: Option<(i32, i32)> = None;

        loop {
            match self.event_pump.wait_event() {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape | Keycode::C),
                    ..
                } => {
                    log::debug!("Region selection cancelled");
                    self.render(None)?;
                    return Ok(Region::default());
                }
                Event::KeyDown {
                    keycode: Some(Keycode::Return | Keycode::KpEnter | Keycode::Space),
                    ..
                } => break,
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    anchor = Some((x, y));
                    cursor = anchor;
                }
                Event::MouseMotion { mousestate, x, y, .. }
                    if mousestate.left() && anchor.is_some() =>
                {
                    cursor = Some((x, y));
                }
                Event::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } if anchor.is_some() => {
                    cursor = Some((x, y));
                }
                Event::Window { .. } => {}
                _ => continue,
            }

            let selection = anchor.zip(cursor).map(|((x0, y0), (x1, y1))| {
                Rect::new(
                    x0.min(x1),
                    y0.min(y1),
                    x0.abs_diff(x1).max(1),
                    y0.abs_diff(y1).max(1),
                )
            });
            self.render(selection)?;
        }

        let (Some(anchor), Some(cursor), Some(target)) = (anchor, cursor, self.frame_target()?)
        else {
            return Ok(Region::default());
        };
        let size = self.frame_size();
        let region = Region::from_corners(
            window_to_frame(anchor, target, size),
            window_to_frame(cursor, target, size),
        );
        self.render(None)?;
        Ok(region)
    }
}

/// Split a window of `width`×`height` into picture and trackbar areas.
fn split_layout(width: u32, height: u32) -> (Rect, Rect) {
    let width = width.max(1);
    let picture_height = height.saturating_sub(TRACKBAR_HEIGHT).max(1);
    (
        Rect::new(0, 0, width, picture_height),
        Rect::new(0, picture_height as i32, width, TRACKBAR_HEIGHT),
    )
}

/// Largest rectangle with the frame's aspect ratio centred inside `area`.
fn fit_rect((frame_width, frame_height): (u32, u32), area: Rect) -> Rect {
    if frame_width == 0 || frame_height == 0 {
        return area;
    }
    let scale = f64::min(
        area.width() as f64 / frame_width as f64,
        area.height() as f64 / frame_height as f64,
    );
    let width = ((frame_width as f64 * scale).round() as u32).max(1);
    let height = ((frame_height as f64 * scale).round() as u32).max(1);
    Rect::new(
        area.x() + (area.width().saturating_sub(width) / 2) as i32,
        area.y() + (area.height().saturating_sub(height) / 2) as i32,
        width,
        height,
    )
}

/// Map a window point onto frame pixels, clamping to the frame edges.
fn window_to_frame(
    (x, y): (i32, i32),
    target: Rect,
    (frame_width, frame_height): (u32, u32),
) -> (u32, u32) {
    let scale_axis = |offset: i32, extent: u32, size: u32| {
        let ratio = (offset as f64 / extent as f64).clamp(0.0, 1.0);
        (ratio * size as f64).round() as u32
    };
    (
        scale_axis(x - target.x(), target.width(), frame_width),
        scale_axis(y - target.y(), target.height(), frame_height),
    )
}

/// Trackbar value under horizontal window position `x`.
fn trackbar_value(x: i32, trackbar: Rect, frame_count: u64) -> u64 {
    let ratio = ((x - trackbar.x()) as f64 / trackbar.width() as f64).clamp(0.0, 1.0);
    (ratio * frame_count as f64).round() as u64
}
