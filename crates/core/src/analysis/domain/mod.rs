pub mod engine_config;
pub mod engine_error;
pub mod face_analyzer;
pub mod frame_detector;
pub mod image_listener;
pub mod video_detector;
