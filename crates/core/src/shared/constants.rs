pub const LOG_FILE: &str = "log.csv";
pub const LOG_DELIMITER: char = ';';
pub const LOG_TIME_COLUMN: &str = "time";

pub const WINDOW_TITLE: &str = "analyze-image";

/// Fixed pause after each displayed frame (caps the display rate near 33 fps).
pub const DISPLAY_PACING_MS: u64 = 30;

pub const DEFAULT_CAMERA_INDEX: i32 = 0;
pub const DEFAULT_CAMERA_FPS: u32 = 30;
pub const DEFAULT_PROCESS_FRAME_RATE: u32 = 30;
pub const DEFAULT_BUFFER_LENGTH: usize = 2;

/// How often the video session checks whether the engine has finished.
pub const RUNNING_POLL_MS: u64 = 10;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
