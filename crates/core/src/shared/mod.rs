pub mod constants;
pub mod face;
pub mod frame;
pub mod rate;
