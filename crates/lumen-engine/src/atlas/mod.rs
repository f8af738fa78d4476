//! Shared single-channel coverage atlas.
//!
//! Glyph bitmaps and one solid-white block are packed once at startup into an
//! `R8Unorm` image. Text samples glyph regions; every other primitive samples
//! the white region, so all UI geometry goes through one pipeline and one
//! draw call.

mod builder;
mod coverage;
mod region;

pub use builder::{AtlasBuilder, DEFAULT_GLYPH_PADDING, DEFAULT_WHITE_BLOCK};
pub use coverage::Atlas;
pub use region::{AtlasRegion, PixelRect, UvRect};
