pub mod acceleration;
pub mod config;
pub mod entry;
pub mod error;
pub mod frame_sync;
pub mod geometry;
pub mod render_mode;
pub mod sample;

#[cfg(windows)]
pub mod d3d12;
#[cfg(windows)]
pub mod win32_application;

/// Size and caption of the sample window.
pub const SAMPLE_WIDTH: u32 = 1280;
pub const SAMPLE_HEIGHT: u32 = 720;
pub const SAMPLE_TITLE: &str = "D3D12 Hello Triangle";
