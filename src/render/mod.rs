//! Rendering engines
//!
//! `raster` turns a poster plan into pixels; `preview` presents those pixels
//! in the terminal. Export and preview share the raster path.

pub mod preview;
pub mod raster;

pub use raster::{rasterize, wrap_caption, RenderError};
