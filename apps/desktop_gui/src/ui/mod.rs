//! UI layer for desktop GUI: app shell, panels, and preview textures.

pub mod app;
pub mod panels;
pub mod previews;

pub use app::{StagingApp, StartupConfig};
