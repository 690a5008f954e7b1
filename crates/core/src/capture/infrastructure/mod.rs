#[cfg(feature = "ffmpeg")]
pub mod ffmpeg_file_source;
pub mod image_file_source;
#[cfg(feature = "opencv")]
pub mod opencv_camera_source;
