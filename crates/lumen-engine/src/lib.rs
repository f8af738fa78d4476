//! Lumen engine crate.
//!
//! Immediate-mode UI rendering on wgpu: primitives are declared into a
//! per-frame batch, uploaded into growable device buffers and drawn with a
//! single indexed draw against one coverage atlas.
//!
//! Layers, bottom up:
//! - [`batch`]: vertex format, frame batch and phase machine
//! - [`atlas`]: packed coverage atlas with a reserved white region
//! - [`render`]: buffer growth, upload, projection and the draw
//! - [`ui`]: the per-frame front end and primitive helpers
//! - [`device`], [`window`], [`core`]: GPU surface and platform loop

pub mod atlas;
pub mod batch;
pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;
pub mod ui;
pub mod window;

pub use config::UiConfig;
pub use error::UiError;
