pub mod display_surface;
pub mod overlay;
pub mod score_log;
