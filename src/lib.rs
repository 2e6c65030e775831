//! Cubepulse library - microphone-reactive cube field

pub mod app;
pub mod audio;
pub mod camera;
pub mod cli;
pub mod clock;
pub mod driver;
pub mod error;
pub mod field;
pub mod mesh;
pub mod params;
pub mod rendering;
pub mod scheduler;
pub mod viewport;
