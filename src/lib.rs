//! PosterForge - Terminal Poster Composition Studio
//!
//! A TUI application for composing a photo with a styled caption bar and
//! exporting the result as a pixel-exact PNG.

pub mod asset;
pub mod color;
pub mod composition;
pub mod config;
pub mod export;
pub mod fonts;
pub mod input;
pub mod perf_monitor;
pub mod render;
pub mod state;
pub mod style;
pub mod terminal_capabilities;
pub mod textutil;
pub mod ui;
pub mod worker;

// Re-export commonly used types
pub use composition::{CompositionModel, PosterPlan};
pub use config::Config;
pub use state::AppState;
pub use style::{StyleEdit, StyleState};
