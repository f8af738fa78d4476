//! Screen-space geometry.
//!
//! Canonical CPU space for declared primitives:
//! - pixels, origin top-left
//! - +X right, +Y down
//!
//! The projection uniform maps this space to clip space on the GPU.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
