//! Internal utility functions.
//!
//! Pixel-plane copying and the frame-number/timestamp conversions shared by
//! [`VideoFile`](crate::VideoFile) seeking and decoding.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy pixel data from an FFmpeg video frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width ×
/// `bytes_per_pixel`). The padding is stripped so the result can be handed
/// straight to [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Convert a frame number to a seek timestamp in AV_TIME_BASE (microseconds).
///
/// `Input::seek` with no stream selected expects container time, so the
/// stream time base is bypassed entirely.
pub(crate) fn frame_number_to_seek_timestamp(frame_number: u64, frames_per_second: f64) -> i64 {
    if frames_per_second <= 0.0 {
        return 0;
    }
    let seconds = frame_number as f64 / frames_per_second;
    (seconds * 1_000_000.0) as i64
}

/// Rescale a PTS value from stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Rescale a PTS value (relative to the stream start) to a frame number.
///
/// Rounds to the nearest frame so NTSC rates such as 30000/1001 do not
/// land one frame short.
pub(crate) fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts_to_seconds(pts, time_base);
    (seconds * frames_per_second).round().max(0.0) as u64
}

/// Estimate a stream's frame count from its duration and frame rate.
pub(crate) fn estimate_frame_count(duration_seconds: f64, frames_per_second: f64) -> u64 {
    if duration_seconds > 0.0 && frames_per_second > 0.0 {
        (duration_seconds * frames_per_second).round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_timestamp_is_in_microseconds() {
        assert_eq!(frame_number_to_seek_timestamp(0, 25.0), 0);
        assert_eq!(frame_number_to_seek_timestamp(25, 25.0), 1_000_000);
        assert_eq!(frame_number_to_seek_timestamp(10, 0.0), 0);
    }

    #[test]
    fn ntsc_pts_rounds_to_the_right_frame() {
        // 29.97 fps in a 1/30000 time base: frame k has pts k * 1001.
        let time_base = Rational::new(1, 30000);
        let fps = 30000.0 / 1001.0;
        for frame in [0_u64, 1, 7, 299, 1000] {
            let pts = (frame * 1001) as i64;
            assert_eq!(pts_to_frame_number(pts, time_base, fps), frame);
        }
    }

    #[test]
    fn negative_pts_clamps_to_first_frame() {
        assert_eq!(pts_to_frame_number(-512, Rational::new(1, 12800), 25.0), 0);
    }

    #[test]
    fn frame_count_estimate() {
        assert_eq!(estimate_frame_count(4.0, 25.0), 100);
        assert_eq!(estimate_frame_count(0.0, 25.0), 0);
        assert_eq!(estimate_frame_count(4.0, 0.0), 0);
    }
}
