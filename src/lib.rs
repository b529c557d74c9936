pub mod analysis;
pub mod audio;
pub mod config;
pub mod core;
pub mod gui;
pub mod transcription;
pub mod utils;

pub use crate::core::AnalyzerCore;
