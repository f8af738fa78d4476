//! Glyph baking and text layout against a prebuilt atlas.

mod font_atlas;

pub use font_atlas::{FontAtlas, PlacedGlyph, PRINTABLE_ASCII};
