pub mod session_error;
pub mod video_session_use_case;
pub mod webcam_session_use_case;
