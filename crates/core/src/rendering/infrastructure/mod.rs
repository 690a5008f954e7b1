pub mod headless_display;
#[cfg(feature = "opencv")]
pub mod highgui_display;
pub mod snapshot_display;
