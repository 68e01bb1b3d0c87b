//! Navigator behaviour against in-memory collaborators.

mod common;

use std::io::ErrorKind;

use common::{
    FixedPrompt, MemorySource, ScriptedSurface, file_count, frame_number_of, navigator,
    navigator_with,
};
use framegrab::{
    Command, FrameGrabError, GrabberOptions, InputEvent, LoopControl, Navigator, PlaybackState,
    Region, annotate::REGION_COLOR,
};
use image::Rgb;

fn paused(output: &std::path::Path) -> GrabberOptions {
    GrabberOptions::new()
        .with_output_directory(output)
        .with_start_paused(true)
}

#[test]
fn session_starts_on_first_frame() {
    let output = tempfile::tempdir().unwrap();
    let navigator = navigator(100, output.path());

    let session = navigator.session();
    assert_eq!(session.total_frame_count(), 100);
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.playback(), PlaybackState::Playing);
    assert_eq!(frame_number_of(session.frame()), 0);
    assert_eq!(navigator.surface().shown, vec![0]);
    assert_eq!(navigator.surface().trackbar, vec![1]);
}

#[test]
fn start_paused_option() {
    let output = tempfile::tempdir().unwrap();
    let navigator = navigator_with(
        MemorySource::new(10),
        ScriptedSurface::new(),
        FixedPrompt::cancelled(),
        paused(output.path()),
    );
    assert_eq!(navigator.session().playback(), PlaybackState::Paused);
}

#[test]
fn undecodable_first_frame_is_fatal() {
    let result = Navigator::new(
        MemorySource::new(10).with_undecodable([0]),
        ScriptedSurface::new(),
        FixedPrompt::cancelled(),
        "broken.mp4",
        GrabberOptions::new(),
    );
    let Err(FrameGrabError::VideoDecodeError(message)) = result else {
        panic!("expected a decode error for an unreadable first frame");
    };
    assert!(message.contains("broken.mp4"));
}

#[test]
fn empty_video_is_fatal() {
    let result = Navigator::new(
        MemorySource::new(0),
        ScriptedSurface::new(),
        FixedPrompt::cancelled(),
        "empty.mp4",
        GrabberOptions::new(),
    );
    assert!(matches!(result, Err(FrameGrabError::VideoDecodeError(_))));
}

#[test]
fn fine_and_coarse_steps_then_save() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());

    for _ in 0..5 {
        navigator.handle_event(InputEvent::Key('d')).unwrap();
    }
    navigator.handle_event(InputEvent::Key('D')).unwrap();
    assert_eq!(navigator.session().current_index(), 15);
    assert_eq!(frame_number_of(navigator.session().frame()), 15);
    assert_eq!(navigator.surface().trackbar.last(), Some(&16));

    navigator.handle_event(InputEvent::Key('s')).unwrap();
    assert_eq!(file_count(output.path()), 1);
}

#[test]
fn backward_steps() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());
    navigator.seek_to_absolute(51).unwrap();
    assert_eq!(navigator.session().current_index(), 50);

    navigator.handle_event(InputEvent::Key('a')).unwrap();
    assert_eq!(navigator.session().current_index(), 49);
    navigator.handle_event(InputEvent::Key('A')).unwrap();
    assert_eq!(navigator.session().current_index(), 39);
    assert_eq!(navigator.surface().last_shown(), Some(39));
}

#[test]
fn step_and_trackbar_agree() {
    let output = tempfile::tempdir().unwrap();

    for target in [0_u64, 1, 17, 63, 99] {
        let mut stepped = navigator(100, output.path());
        stepped.step(target as i64).unwrap();

        let mut sought = navigator(100, output.path());
        sought.seek_to_absolute(target + 1).unwrap();

        assert_eq!(stepped.session().current_index(), target);
        assert_eq!(sought.session().current_index(), target);
        assert_eq!(
            frame_number_of(stepped.session().frame()),
            frame_number_of(sought.session().frame()),
        );
    }
}

#[test]
fn trackbar_zero_pins_to_first_frame() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());
    navigator.seek_to_absolute(30).unwrap();

    navigator.handle_event(InputEvent::Seek(0)).unwrap();
    assert_eq!(navigator.session().current_index(), 0);
    assert_eq!(navigator.surface().last_shown(), Some(0));
}

#[test]
fn steps_at_either_end_do_not_fail() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());

    navigator.step(-1).unwrap();
    assert_eq!(navigator.session().current_index(), 0);
    assert_eq!(frame_number_of(navigator.session().frame()), 0);

    navigator.seek_to_absolute(100).unwrap();
    assert_eq!(navigator.session().current_index(), 99);

    navigator.step(1).unwrap();
    assert_eq!(navigator.session().current_index(), 99);
    assert_eq!(frame_number_of(navigator.session().frame()), 99);
}

#[test]
fn unbound_key_is_ignored() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());
    navigator.step(3).unwrap();
    let shown = navigator.surface().shown.len();

    let control = navigator.handle_event(InputEvent::Key('x')).unwrap();
    assert_eq!(control, LoopControl::Continue);
    assert_eq!(navigator.session().current_index(), 3);
    assert_eq!(navigator.session().playback(), PlaybackState::Playing);
    assert_eq!(navigator.surface().shown.len(), shown);
    assert_eq!(navigator.source().seeks.len(), 1);
    assert_eq!(file_count(output.path()), 0);
}

#[test]
fn failed_step_keeps_previous_frame() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator_with(
        MemorySource::new(100).with_undecodable([6]),
        ScriptedSurface::new(),
        FixedPrompt::cancelled(),
        paused(output.path()),
    );
    navigator.step(5).unwrap();
    let trackbar_moves = navigator.surface().trackbar.len();

    navigator.step(1).unwrap();
    assert_eq!(navigator.session().current_index(), 5);
    assert_eq!(frame_number_of(navigator.session().frame()), 5);
    assert_eq!(navigator.surface().trackbar.len(), trackbar_moves);
}

#[test]
fn failed_trackbar_seek_still_moves_index() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator_with(
        MemorySource::new(100).with_undecodable([40]),
        ScriptedSurface::new(),
        FixedPrompt::cancelled(),
        paused(output.path()),
    );
    navigator.step(2).unwrap();

    navigator.handle_event(InputEvent::Seek(41)).unwrap();
    assert_eq!(navigator.session().current_index(), 40);
    assert_eq!(frame_number_of(navigator.session().frame()), 2);
    assert_eq!(navigator.surface().last_shown(), Some(2));
}

#[test]
fn steps_after_failed_trackbar_seek_start_from_its_target() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator_with(
        MemorySource::new(100).with_undecodable([40]),
        ScriptedSurface::new(),
        FixedPrompt::cancelled(),
        paused(output.path()),
    );
    navigator.handle_event(InputEvent::Seek(41)).unwrap();
    assert_eq!(navigator.session().current_index(), 40);

    navigator.handle_event(InputEvent::Key('a')).unwrap();
    assert_eq!(navigator.session().current_index(), 39);
    assert_eq!(navigator.surface().last_shown(), Some(39));

    navigator.handle_event(InputEvent::Seek(41)).unwrap();
    navigator.handle_event(InputEvent::Key('d')).unwrap();
    assert_eq!(navigator.session().current_index(), 41);
    assert_eq!(frame_number_of(navigator.session().frame()), 41);
    assert_eq!(navigator.surface().trackbar.last(), Some(&42));
}

#[test]
fn toggle_play_twice_restores_state() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());

    navigator.handle_event(InputEvent::Key('p')).unwrap();
    assert_eq!(navigator.session().playback(), PlaybackState::Paused);
    navigator.handle_event(InputEvent::Key('p')).unwrap();
    assert_eq!(navigator.session().playback(), PlaybackState::Playing);
}

#[test]
fn paused_ticks_do_not_advance() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator_with(
        MemorySource::new(100),
        ScriptedSurface::new(),
        FixedPrompt::cancelled(),
        paused(output.path()),
    );

    for _ in 0..3 {
        assert_eq!(navigator.tick().unwrap(), LoopControl::Continue);
    }
    assert_eq!(navigator.session().current_index(), 0);
    assert_eq!(navigator.source().reads, 1);
    assert_eq!(navigator.surface().polls, 3);
}

#[test]
fn playing_ticks_advance_without_moving_trackbar() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());

    for _ in 0..4 {
        navigator.tick().unwrap();
    }
    assert_eq!(navigator.session().current_index(), 4);
    assert_eq!(navigator.surface().shown, vec![0, 1, 2, 3, 4]);
    assert_eq!(navigator.surface().trackbar, vec![1]);
}

#[test]
fn playback_holds_last_frame_at_end_of_stream() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(3, output.path());

    for _ in 0..5 {
        navigator.tick().unwrap();
    }
    assert_eq!(navigator.session().current_index(), 2);
    assert_eq!(frame_number_of(navigator.session().frame()), 2);
    assert!(navigator.session().is_playing());
}

#[test]
fn region_annotation_is_saved_with_frame_index() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator_with(
        MemorySource::new(100),
        ScriptedSurface::new().with_region(Region::new(10, 20, 30, 20)),
        FixedPrompt::answering("t"),
        paused(output.path()),
    );
    navigator.step(7).unwrap();

    let path = navigator.select_region_and_annotate().unwrap();
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("sample_frame_7_ROI.png"),
    );
    assert!(path.exists());

    let saved = image::open(&path).unwrap().to_rgb8();
    assert_eq!(*saved.get_pixel(10, 30), REGION_COLOR);
    assert!(saved.pixels().any(|pixel| *pixel == Rgb([0, 255, 0])));
    assert_eq!(frame_number_of(&saved), 7);
    assert_eq!(navigator.surface().selections, 1);
}

#[test]
fn cancelled_label_still_saves() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator_with(
        MemorySource::new(100),
        ScriptedSurface::new().with_region(Region::new(10, 20, 30, 20)),
        FixedPrompt::cancelled(),
        paused(output.path()),
    );

    navigator
        .dispatch(Command::SelectRegionAndAnnotate)
        .unwrap();

    let path = output.path().join("sample_frame_0_ROI.png");
    let saved = image::open(&path).unwrap().to_rgb8();
    assert_eq!(*saved.get_pixel(10, 30), REGION_COLOR);
    assert!(!saved.pixels().any(|pixel| *pixel == Rgb([0, 255, 0])));
}

#[test]
fn double_click_saves_frame() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());

    let control = navigator
        .handle_event(InputEvent::DoubleClick { x: 5, y: 5 })
        .unwrap();
    assert_eq!(control, LoopControl::Continue);

    let saved: Vec<_> = std::fs::read_dir(output.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].starts_with("image_") && saved[0].ends_with(".png"));
}

#[test]
fn save_into_missing_directory_fails() {
    let output = tempfile::tempdir().unwrap();
    let missing = output.path().join("does-not-exist");
    let mut navigator = navigator(100, &missing);

    let Err(FrameGrabError::IoError(error)) = navigator.save_current_frame() else {
        panic!("expected an I/O error");
    };
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[test]
fn quit_and_close_end_the_loop() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator(100, output.path());

    assert_eq!(
        navigator.handle_event(InputEvent::Key('q')).unwrap(),
        LoopControl::Quit
    );
    assert_eq!(
        navigator.handle_event(InputEvent::Close).unwrap(),
        LoopControl::Quit
    );
}

#[test]
fn run_processes_events_until_quit() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator_with(
        MemorySource::new(100),
        ScriptedSurface::new().with_events([
            InputEvent::Key('d'),
            InputEvent::Key('d'),
            InputEvent::Key('D'),
            InputEvent::Key('q'),
            InputEvent::Key('d'),
        ]),
        FixedPrompt::cancelled(),
        paused(output.path()),
    );

    navigator.run().unwrap();
    assert_eq!(navigator.session().current_index(), 12);
    assert_eq!(navigator.surface().polls, 4);
}

#[test]
fn custom_coarse_step() {
    let output = tempfile::tempdir().unwrap();
    let mut navigator = navigator_with(
        MemorySource::new(100),
        ScriptedSurface::new(),
        FixedPrompt::cancelled(),
        paused(output.path()).with_coarse_step(25),
    );
    assert_eq!(navigator.actions().lookup('D'), Some(Command::Step(25)));
    assert_eq!(navigator.actions().lookup('A'), Some(Command::Step(-25)));
    assert_eq!(navigator.actions().bindings().len(), 8);

    navigator.handle_event(InputEvent::Key('D')).unwrap();
    assert_eq!(navigator.session().current_index(), 25);
    navigator.handle_event(InputEvent::Key('A')).unwrap();
    assert_eq!(navigator.session().current_index(), 0);
}
