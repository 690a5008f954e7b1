use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use emotion_overlay_core::analysis::domain::engine_config::EngineConfig;
use emotion_overlay_core::analysis::domain::face_analyzer::FaceAnalyzer;
use emotion_overlay_core::analysis::infrastructure::replay_face_analyzer::ReplayFaceAnalyzer;
use emotion_overlay_core::analysis::infrastructure::stub_face_analyzer::StubFaceAnalyzer;
use emotion_overlay_core::analysis::infrastructure::threaded_frame_detector::ThreadedFrameDetector;
use emotion_overlay_core::analysis::infrastructure::threaded_video_detector::{
    SourceFactory, ThreadedVideoDetector,
};
use emotion_overlay_core::capture::domain::frame_source::FrameSource;
use emotion_overlay_core::capture::infrastructure::image_file_source::ImageFileSource;
use emotion_overlay_core::rendering::domain::display_surface::DisplaySurface;
use emotion_overlay_core::rendering::domain::score_log::ScoreLog;
use emotion_overlay_core::rendering::infrastructure::headless_display::HeadlessDisplay;
use emotion_overlay_core::rendering::infrastructure::snapshot_display::SnapshotDisplay;
use emotion_overlay_core::rendering::plotting_listener::PlottingListener;
use emotion_overlay_core::session::session_error::{ErrorKind, SessionError};
use emotion_overlay_core::session::video_session_use_case::VideoSessionUseCase;
use emotion_overlay_core::session::webcam_session_use_case::WebcamSessionUseCase;
use emotion_overlay_core::shared::constants::{
    DEFAULT_BUFFER_LENGTH, DEFAULT_CAMERA_FPS, DEFAULT_CAMERA_INDEX, DEFAULT_PROCESS_FRAME_RATE,
    DISPLAY_PACING_MS, IMAGE_EXTENSIONS, LOG_FILE,
};
use emotion_overlay_core::shared::rate::SharedRate;

/// Overlays face landmarks, expression and emotion scores on webcam or video frames.
#[derive(Parser)]
#[command(name = "emotion-overlay")]
struct Cli {
    /// Video or image file to analyze. Captures from the camera when omitted.
    input: Option<PathBuf>,

    /// Camera device index.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: i32,

    /// Frame rate requested from the camera.
    #[arg(long, default_value_t = DEFAULT_CAMERA_FPS)]
    camera_fps: u32,

    /// Directory holding the analyzer's classifier data.
    #[arg(long)]
    classifier_path: Option<PathBuf>,

    /// License file for the analyzer.
    #[arg(long)]
    license_path: Option<PathBuf>,

    /// Maximum frames analyzed per second.
    #[arg(long, default_value_t = DEFAULT_PROCESS_FRAME_RATE)]
    framerate: u32,

    /// Frames buffered between capture and analysis (camera mode).
    #[arg(long, default_value_t = DEFAULT_BUFFER_LENGTH)]
    buffer_length: usize,

    /// Score log written for every single-face frame.
    #[arg(long, default_value = LOG_FILE)]
    log_file: PathBuf,

    /// Replay recorded face results (JSON lines) instead of the stub analyzer.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Do not open a window.
    #[arg(long)]
    headless: bool,

    /// Save annotated frames as PNG files in this directory.
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// Disable expression scores.
    #[arg(long)]
    no_expressions: bool,

    /// Disable emotion scores.
    #[arg(long)]
    no_emotions: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        let kind = e
            .downcast_ref::<SessionError>()
            .map(SessionError::kind)
            .unwrap_or(ErrorKind::Other);
        eprintln!("Encountered {}: {e}", kind.label());
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = cancelled.clone();
        ctrlc::set_handler(move || {
            log::info!("Interrupt received, stopping");
            cancelled.store(true, Ordering::SeqCst);
        })?;
    }

    let score_log = ScoreLog::create(&cli.log_file).map_err(SessionError::from)?;
    let capture_rate = SharedRate::new();
    let display = build_display(&cli, &cancelled)?;
    let listener = Box::new(PlottingListener::new(
        capture_rate.clone(),
        score_log,
        display,
    ));
    let analyzer = build_analyzer(&cli)?;
    let config = EngineConfig {
        detect_all_expressions: !cli.no_expressions,
        detect_all_emotions: !cli.no_emotions,
        classifier_path: cli.classifier_path.clone(),
        license_path: cli.license_path.clone(),
        frame_rate: cli.framerate,
        buffer_length: cli.buffer_length,
    };

    match &cli.input {
        Some(input) => {
            let detector =
                ThreadedVideoDetector::new(config, source_factory(), analyzer, listener)
                    .with_capture_rate(capture_rate);
            let mut use_case = VideoSessionUseCase::new(Box::new(detector), cancelled);
            use_case.execute(input)?;
        }
        None => {
            let source = open_camera(&cli)?;
            let detector = ThreadedFrameDetector::new(config, analyzer, listener);
            let mut use_case =
                WebcamSessionUseCase::new(source, Box::new(detector), capture_rate, cancelled);
            use_case.execute()?;
        }
    }

    log::info!("Scores written to {}", cli.log_file.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.framerate == 0 {
        return Err("Frame rate must be positive".into());
    }
    if cli.buffer_length == 0 {
        return Err("Buffer length must be positive".into());
    }
    if cli.camera_fps == 0 {
        return Err("Camera frame rate must be positive".into());
    }
    if cli.headless && cli.snapshots.is_some() {
        log::debug!("--headless has no effect together with --snapshots");
    }
    Ok(())
}

fn build_analyzer(cli: &Cli) -> Result<Box<dyn FaceAnalyzer>, Box<dyn std::error::Error>> {
    match &cli.replay {
        Some(path) => {
            let analyzer = ReplayFaceAnalyzer::from_path(path)?;
            log::info!(
                "Replaying {} recorded frames from {}",
                analyzer.len(),
                path.display()
            );
            Ok(Box::new(analyzer))
        }
        None => {
            log::warn!("No analyzer backend configured, frames will report no faces");
            Ok(Box::new(StubFaceAnalyzer::new()))
        }
    }
}

fn build_display(
    cli: &Cli,
    cancelled: &Arc<AtomicBool>,
) -> Result<Box<dyn DisplaySurface>, Box<dyn std::error::Error>> {
    if let Some(dir) = &cli.snapshots {
        log::info!("Saving annotated frames to {}", dir.display());
        return Ok(Box::new(SnapshotDisplay::new(
            dir,
            Duration::from_millis(DISPLAY_PACING_MS),
        )?));
    }
    if cli.headless {
        return Ok(headless_display());
    }
    window_display(cancelled)
}

fn headless_display() -> Box<dyn DisplaySurface> {
    Box::new(HeadlessDisplay::new(Duration::from_millis(DISPLAY_PACING_MS)))
}

#[cfg(feature = "opencv")]
fn window_display(
    cancelled: &Arc<AtomicBool>,
) -> Result<Box<dyn DisplaySurface>, Box<dyn std::error::Error>> {
    use emotion_overlay_core::rendering::infrastructure::highgui_display::HighguiDisplay;
    use emotion_overlay_core::shared::constants::WINDOW_TITLE;
    Ok(Box::new(HighguiDisplay::new(
        WINDOW_TITLE,
        DISPLAY_PACING_MS,
        cancelled.clone(),
    )?))
}

#[cfg(not(feature = "opencv"))]
fn window_display(
    _cancelled: &Arc<AtomicBool>,
) -> Result<Box<dyn DisplaySurface>, Box<dyn std::error::Error>> {
    log::warn!("Built without the `opencv` feature, running headless");
    Ok(headless_display())
}

#[cfg(feature = "opencv")]
fn open_camera(cli: &Cli) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    use emotion_overlay_core::capture::infrastructure::opencv_camera_source::OpencvCameraSource;
    log::info!("Setting the webcam frame rate to: {}", cli.camera_fps);
    Ok(Box::new(OpencvCameraSource::new(
        cli.camera,
        cli.camera_fps,
        std::time::Instant::now(),
    )))
}

#[cfg(not(feature = "opencv"))]
fn open_camera(cli: &Cli) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    Err(format!(
        "Camera {} needs a build with the `opencv` feature; pass a video or image file instead",
        cli.camera
    )
    .into())
}

fn source_factory() -> SourceFactory {
    Box::new(|path: &Path| -> Box<dyn FrameSource> {
        if is_image(path) {
            return Box::new(ImageFileSource::new(path));
        }
        video_source(path)
    })
}

#[cfg(feature = "ffmpeg")]
fn video_source(path: &Path) -> Box<dyn FrameSource> {
    use emotion_overlay_core::capture::infrastructure::ffmpeg_file_source::FfmpegFileSource;
    Box::new(FfmpegFileSource::new(path))
}

/// Without ffmpeg only still images decode; anything else fails at open.
#[cfg(not(feature = "ffmpeg"))]
fn video_source(path: &Path) -> Box<dyn FrameSource> {
    Box::new(ImageFileSource::new(path))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
