pub mod config;
pub mod core;
pub mod submit;
pub mod utils;
