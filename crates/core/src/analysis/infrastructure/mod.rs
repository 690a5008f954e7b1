pub mod frame_throttle;
pub mod replay_face_analyzer;
pub mod result_dispatcher;
pub mod stub_face_analyzer;
pub mod threaded_frame_detector;
pub mod threaded_video_detector;
