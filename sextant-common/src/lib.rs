pub mod canvas;
pub mod config;
pub mod error;
pub mod interval;
pub mod types;
