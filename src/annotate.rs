//! Region annotation and output naming.
//!
//! Annotated captures get a red three-pixel rectangle around the selected
//! region and the label in green, scaled 8×8 bitmap glyphs whose baseline
//! sits a tenth of the region's height below its top edge.

use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{ImageError, ImageFormat, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut},
    rect::Rect,
};

use crate::{error::FrameGrabError, surface::Region};

pub const REGION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const REGION_THICKNESS: u32 = 3;
/// Each glyph pixel is drawn as a `LABEL_SCALE`² block.
pub const LABEL_SCALE: u32 = 4;

const GLYPH_SIZE: u32 = 8;

/// Draw the region outline and its label onto `frame`.
///
/// An empty region draws nothing but the label; an empty label draws
/// nothing but the outline.
pub fn annotate_region(frame: &mut RgbImage, region: Region, label: &str) {
    draw_region(frame, region);
    draw_region_label(frame, region, label);
}

/// Outline `region`. Empty regions are skipped.
pub fn draw_region(frame: &mut RgbImage, region: Region) {
    if region.is_empty() {
        return;
    }
    // The outline is centred on the region edge, like a thick pen stroke.
    let half = (REGION_THICKNESS / 2) as i32;
    for inset in 0..REGION_THICKNESS as i32 {
        let offset = inset - half;
        let width = region.width as i64 - 2 * offset as i64;
        let height = region.height as i64 - 2 * offset as i64;
        if width <= 0 || height <= 0 {
            break;
        }
        let rect = Rect::at(region.x as i32 + offset, region.y as i32 + offset)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(frame, rect, REGION_COLOR);
    }
}

/// Draw `label` at the region's top-left corner, baseline `0.1 * height`
/// below the top edge.
pub fn draw_region_label(frame: &mut RgbImage, region: Region, label: &str) {
    let baseline = region.y as i32 + (0.1 * region.height as f64) as i32;
    draw_label(frame, region.x as i32, baseline, label);
}

/// Draw `label` with its bottom-left corner at `(x, baseline)`.
pub fn draw_label(frame: &mut RgbImage, x: i32, baseline: i32, label: &str) {
    let cell = (GLYPH_SIZE * LABEL_SCALE) as i32;
    let top = baseline - cell;

    for (column, character) in label.chars().enumerate() {
        let glyph = BASIC_FONTS
            .get(character)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);
        let left = x + column as i32 * cell;

        for (row, bits) in glyph.iter().enumerate() {
            for bit in 0..GLYPH_SIZE {
                if bits & (1 << bit) == 0 {
                    continue;
                }
                let block = Rect::at(
                    left + (bit * LABEL_SCALE) as i32,
                    top + row as i32 * LABEL_SCALE as i32,
                )
                .of_size(LABEL_SCALE, LABEL_SCALE);
                draw_filled_rect_mut(frame, block, LABEL_COLOR);
            }
        }
    }
}

/// `image_<seconds since the epoch, 5 decimals>.png`
pub fn snapshot_file_name(since_epoch: Duration) -> String {
    format!("image_{:.5}.png", since_epoch.as_secs_f64())
}

/// Snapshot file name for the current wall-clock time.
pub fn snapshot_file_name_now() -> String {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    snapshot_file_name(since_epoch)
}

/// `<video file stem>_frame_<index>_ROI.png`
pub fn region_file_name(video_path: &Path, frame_index: u64) -> String {
    let stem = video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    format!("{stem}_frame_{frame_index}_ROI.png")
}

/// Encode `frame` as PNG at `directory/file_name`.
///
/// Write failures surface as [`FrameGrabError::IoError`] with the original
/// [`std::io::ErrorKind`].
pub fn save_png(
    frame: &RgbImage,
    directory: &Path,
    file_name: &str,
) -> Result<PathBuf, FrameGrabError> {
    let path = directory.join(file_name);
    frame
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|error| match error {
            ImageError::IoError(io_error) => FrameGrabError::IoError(io_error),
            other => FrameGrabError::ImageError(other),
        })?;
    log::debug!("Saved {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([0, 0, 0]))
    }

    #[test]
    fn snapshot_names_carry_five_decimals() {
        let name = snapshot_file_name(Duration::from_millis(1_700_000_000_123));
        assert_eq!(name, "image_1700000000.12300.png");
    }

    #[test]
    fn region_names_use_the_file_stem() {
        assert_eq!(
            region_file_name(Path::new("/videos/clip.final.mp4"), 42),
            "clip.final_frame_42_ROI.png"
        );
        assert_eq!(region_file_name(Path::new("plain"), 0), "plain_frame_0_ROI.png");
    }

    #[test]
    fn outline_is_three_pixels_wide() {
        let mut frame = blank(100, 100);
        annotate_region(&mut frame, Region::new(10, 10, 50, 50), "");

        // Left edge spans x = 9..=11, interior stays untouched.
        for x in 9..=11 {
            assert_eq!(*frame.get_pixel(x, 30), REGION_COLOR, "x = {x}");
        }
        assert_eq!(*frame.get_pixel(8, 30), Rgb([0, 0, 0]));
        assert_eq!(*frame.get_pixel(12, 30), Rgb([0, 0, 0]));
        assert_eq!(*frame.get_pixel(35, 35), Rgb([0, 0, 0]));
        // Bottom-right corner.
        assert_eq!(*frame.get_pixel(59, 59), REGION_COLOR);
    }

    #[test]
    fn label_sits_above_its_baseline() {
        let mut frame = blank(200, 200);
        annotate_region(&mut frame, Region::new(20, 100, 50, 50), "t");

        let baseline = 100 + 5;
        let green: Vec<(u32, u32)> = frame
            .enumerate_pixels()
            .filter(|(_, _, pixel)| **pixel == LABEL_COLOR)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!green.is_empty(), "label should be drawn");
        assert!(green.iter().all(|&(x, y)| {
            y < baseline && y >= baseline - 32 && (20..20 + 32).contains(&x)
        }));
    }

    #[test]
    fn empty_region_draws_no_outline() {
        let mut frame = blank(40, 40);
        annotate_region(&mut frame, Region::default(), "");
        assert!(frame.pixels().all(|pixel| *pixel == Rgb([0, 0, 0])));
    }

    #[test]
    fn drawing_off_the_edge_is_clipped() {
        let mut frame = blank(30, 30);
        annotate_region(&mut frame, Region::new(20, 0, 50, 50), "edge");
        assert_eq!(*frame.get_pixel(20, 20), REGION_COLOR);
    }

    #[test]
    fn save_png_reports_io_kind() {
        let directory = tempfile::tempdir().unwrap();
        let missing = directory.path().join("does").join("not").join("exist");
        let error = save_png(&blank(4, 4), &missing, "x.png").unwrap_err();
        assert!(matches!(error, FrameGrabError::IoError(_)), "{error:?}");
    }

    #[test]
    fn save_png_writes_a_png() {
        let directory = tempfile::tempdir().unwrap();
        let path = save_png(&blank(4, 4), directory.path(), "x.png").unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }
}
