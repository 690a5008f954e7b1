pub mod domain;
pub mod infrastructure;
pub mod plotting_listener;
