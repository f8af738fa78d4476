//! Vertex color model.

mod color;

pub use color::Color;
