//! FFmpeg-backed [`FrameSource`].
//!
//! [`VideoFile`] keeps one demuxer, one decoder and one RGB24 scaler open for
//! the lifetime of the navigation session. Reads decode forward from the
//! current packet position; seeks jump to the nearest keyframe before the
//! target and then discard decoded frames until the target is reached.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{
    error::FrameGrabError,
    metadata::VideoMetadata,
    source::{FrameSource, clamp_frame_number},
    utilities,
};

/// An open video file positioned on a single frame.
///
/// # Example
///
/// ```no_run
/// use framegrab::{FrameSource, VideoFile};
///
/// let mut video = VideoFile::open("input.mp4")?;
/// video.seek(100)?;
/// let frame = video.read()?;
/// frame.save("frame_100.png")?;
/// # Ok::<(), framegrab::FrameGrabError>(())
/// ```
pub struct VideoFile {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    time_base: Rational,
    /// Stream start time in `time_base` units; subtracted from every PTS.
    start_pts: i64,
    metadata: VideoMetadata,
    file_path: PathBuf,
    position: u64,
    /// Frames numbered below this are dropped (set by the last seek).
    discard_before: u64,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file for navigation.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, selects the best
    /// video stream and prepares a decoder and RGB24 converter for it. No
    /// frame is decoded yet.
    ///
    /// # Errors
    ///
    /// - [`FrameGrabError::FileOpen`] if the file cannot be opened or its
    ///   video decoder cannot be created.
    /// - [`FrameGrabError::NoVideoStream`] if the file has no video.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameGrabError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video file: {}", file_path.display());

        ffmpeg_next::init().map_err(|error| FrameGrabError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FrameGrabError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let container_duration = {
            let microseconds = input_context.duration();
            if microseconds > 0 {
                Duration::from_micros(microseconds as u64)
            } else {
                Duration::ZERO
            }
        };
        let format = input_context.format().name().to_string();

        let (video_stream_index, time_base, start_pts, frames_per_second, stream_frames, decoder) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or(FrameGrabError::NoVideoStream)?;

            let frame_rate = stream.avg_frame_rate();
            let frames_per_second = if frame_rate.denominator() != 0 {
                frame_rate.numerator() as f64 / frame_rate.denominator() as f64
            } else {
                let rate = stream.rate();
                if rate.denominator() != 0 {
                    rate.numerator() as f64 / rate.denominator() as f64
                } else {
                    0.0
                }
            };

            // AV_NOPTS_VALUE is i64::MIN.
            let start_pts = if stream.start_time() == i64::MIN {
                0
            } else {
                stream.start_time()
            };

            let decoder_context =
                CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                    FrameGrabError::FileOpen {
                        path: file_path.clone(),
                        reason: format!("Failed to read video codec parameters: {error}"),
                    }
                })?;
            let decoder =
                decoder_context
                    .decoder()
                    .video()
                    .map_err(|error| FrameGrabError::FileOpen {
                        path: file_path.clone(),
                        reason: format!("Failed to create video decoder: {error}"),
                    })?;

            (
                stream.index(),
                stream.time_base(),
                start_pts,
                frames_per_second,
                stream.frames(),
                decoder,
            )
        };

        let frame_count = if stream_frames > 0 {
            stream_frames as u64
        } else {
            utilities::estimate_frame_count(container_duration.as_secs_f64(), frames_per_second)
        };
        if frame_count == 0 {
            log::warn!(
                "Could not determine the frame count of {}; seeking will be pinned to frame 0",
                file_path.display()
            );
        }

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
            codec,
            format,
            duration: container_duration,
        };

        log::info!(
            "Opened video file: {} ({}x{}, {:.2} fps, {} frames, codec={})",
            file_path.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            video_stream_index,
            time_base,
            start_pts,
            metadata,
            file_path,
            position: 0,
            discard_before: 0,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
        })
    }

    /// Get a reference to the cached video metadata.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Pull the next decoded frame into `decoded_frame`.
    ///
    /// Returns `Ok(false)` once the decoder is drained after end of file.
    fn receive_next(&mut self) -> Result<bool, FrameGrabError> {
        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return Ok(true);
            }

            if self.eof_sent {
                return Ok(false);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Frame number of the frame currently held in `decoded_frame`.
    fn decoded_frame_number(&self) -> u64 {
        let timestamp = self
            .decoded_frame
            .timestamp()
            .or_else(|| self.decoded_frame.pts());
        match timestamp {
            Some(pts) if self.metadata.frames_per_second > 0.0 => utilities::pts_to_frame_number(
                pts - self.start_pts,
                self.time_base,
                self.metadata.frames_per_second,
            ),
            // Without timing information frames are counted sequentially.
            _ => self.position,
        }
    }

    fn convert_current_frame(&mut self) -> Result<RgbImage, FrameGrabError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;

        let width = self.metadata.width;
        let height = self.metadata.height;
        let buffer = utilities::frame_to_buffer(&self.rgb_frame, width, height, 3);
        RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            FrameGrabError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }
}

impl FrameSource for VideoFile {
    fn frame_count(&self) -> u64 {
        self.metadata.frame_count
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, frame_number: i64) -> Result<(), FrameGrabError> {
        let target = clamp_frame_number(frame_number, self.metadata.frame_count);
        let timestamp =
            utilities::frame_number_to_seek_timestamp(target, self.metadata.frames_per_second);

        log::debug!("Seeking to frame {target} (requested {frame_number}, timestamp {timestamp}us)");

        self.input_context.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.eof_sent = false;
        self.position = target;
        self.discard_before = target;
        Ok(())
    }

    fn read(&mut self) -> Result<RgbImage, FrameGrabError> {
        loop {
            if !self.receive_next()? {
                return Err(FrameGrabError::EndOfStream {
                    position: self.position,
                });
            }

            let frame_number = self.decoded_frame_number();
            if frame_number < self.discard_before {
                continue;
            }

            self.discard_before = 0;
            self.position = frame_number + 1;
            return self.convert_current_frame();
        }
    }
}
