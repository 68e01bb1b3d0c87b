use std::{
    fmt::Display,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{CommandFactory, Parser, error::ErrorKind};
use colored::Colorize;
use framegrab::{
    ActionTable, FfmpegLogLevel, GrabberOptions, Navigator, SdlWindow, TerminalPrompt,
    VideoFile, VideoMetadata,
    options::{DEFAULT_WINDOW_SIZE, DEFAULT_WINDOW_TITLE},
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Controls:
  a / d           previous / next frame
  A / D           skip backward / forward (see --skip)
  s, dbl click    save the current frame as image_<epoch seconds>.png
  r               select a region, enter a label, save <video>_frame_<n>_ROI.png
  p               play / pause
  q               quit
  trackbar        jump to a frame

Region selection: drag with the left mouse button, Enter or Space to confirm,
Escape or c to cancel. The label is typed into this terminal.

Examples:
  framegrab input.mp4
  framegrab input.mp4 --out captures --skip 25 --paused
  framegrab input.mp4 --info --json";

#[derive(Debug, Parser)]
#[command(
    name = "framegrab",
    version,
    about = "Select and save frames from a video",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Path to the video file.
    video: PathBuf,

    /// Directory saved images are written to.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Number of frames skipped by A / D.
    #[arg(long, default_value_t = 10)]
    skip: u32,

    /// Milliseconds to wait for input per loop iteration.
    #[arg(long, default_value_t = 120)]
    interval: u64,

    /// Start paused instead of playing.
    #[arg(long)]
    paused: bool,

    /// Window title.
    #[arg(long, default_value = DEFAULT_WINDOW_TITLE)]
    title: String,

    /// Initial window size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_window_size, default_value_t = WindowSize(DEFAULT_WINDOW_SIZE))]
    size: WindowSize,

    /// Print video metadata and exit without opening a window.
    #[arg(long)]
    info: bool,

    /// With --info, print metadata as machine-readable JSON.
    #[arg(long, requires = "info")]
    json: bool,

    /// Show debug logging output.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, default_value = "error")]
    log_level: FfmpegLogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowSize((u32, u32));

impl std::fmt::Display for WindowSize {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let WindowSize((width, height)) = self;
        write!(formatter, "{width}x{height}")
    }
}

fn parse_window_size(value: &str) -> Result<WindowSize, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |part: &str| match part.trim().parse::<u32>() {
        Ok(pixels) if pixels > 0 => Ok(pixels),
        _ => Err(format!("invalid window dimension '{part}'")),
    };
    Ok(WindowSize((parse(width)?, parse(height)?)))
}

fn log_bindings(actions: &ActionTable) {
    for (key, command) in actions.bindings() {
        log::debug!("Key '{key}' -> {command:?}");
    }
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::MissingRequiredArgument
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = Cli::command().print_long_help();
                std::process::exit(1);
            }
            _ => error.exit(),
        },
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn print_metadata(
    path: &Path,
    metadata: &VideoMetadata,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if as_json {
        let payload = json!({
            "path": path.display().to_string(),
            "format": metadata.format,
            "codec": metadata.codec,
            "width": metadata.width,
            "height": metadata.height,
            "fps": metadata.frames_per_second,
            "frame_count": metadata.frame_count,
            "duration_seconds": metadata.duration.as_secs_f64(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("File: {}", path.display());
        println!("Format: {}", metadata.format);
        println!(
            "Video: {}x{} @ {:.2} fps [{}]",
            metadata.width, metadata.height, metadata.frames_per_second, metadata.codec,
        );
        println!("Frames: {}", metadata.frame_count);
        println!("Duration: {:?}", metadata.duration);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(cli.verbose);
    framegrab::set_ffmpeg_log_level(cli.log_level);

    if cli.info {
        let video = VideoFile::open(&cli.video)?;
        return print_metadata(&cli.video, video.metadata(), cli.json);
    }

    println!("Using FFmpeg {}", framegrab::ffmpeg_version());

    let video = VideoFile::open(&cli.video)?;
    let frame_count = video.metadata().frame_count;
    println!("{} has {} frames", cli.video.display(), frame_count);

    fs::create_dir_all(&cli.out)?;

    let options = GrabberOptions::new()
        .with_output_directory(&cli.out)
        .with_coarse_step(cli.skip)
        .with_poll_interval(Duration::from_millis(cli.interval))
        .with_start_paused(cli.paused)
        .with_window_title(&cli.title)
        .with_window_size(cli.size.0.0, cli.size.0.1);

    let window = SdlWindow::open(&options, frame_count)?;
    let mut navigator = Navigator::new(video, window, TerminalPrompt::new(), &cli.video, options)?;
    log_bindings(navigator.actions());
    navigator.run()?;

    Ok(())
}

/// Fatal errors go to stdout, alongside the startup diagnostics.
fn report_fatal<W: Write>(output: &mut W, error: &dyn Display) -> io::Result<()> {
    writeln!(output, "{} {error}", "error:".red().bold())?;
    output.flush()
}

fn main() {
    let cli = parse_cli();
    if let Err(error) = run(cli) {
        let _ = report_fatal(&mut io::stdout().lock(), &error);
        std::process::exit(1);
    }
}
