use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::atlas::{Atlas, UvRect};
use crate::config::UiConfig;
use crate::coords::{Rect, Vec2};
use crate::error::AtlasBuildError;

/// Printable ASCII, the default character set to bake.
pub const PRINTABLE_ASCII: std::ops::RangeInclusive<char> = ' '..='~';

/// A glyph positioned on screen with its atlas coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    pub rect: Rect,
    pub uv: UvRect,
}

/// One font baked at one pixel size into an [`Atlas`].
///
/// The glyph set is fixed at construction. Characters outside it are laid out
/// (they still advance the pen) but produce no quads.
pub struct FontAtlas {
    font: fontdue::Font,
    px: f32,
    line_height: f32,
    atlas: Atlas,
}

impl FontAtlas {
    pub fn bake(
        font_bytes: &[u8],
        charset: impl IntoIterator<Item = char>,
        config: &UiConfig,
    ) -> Result<Self, AtlasBuildError> {
        let px = config.font_px;
        let settings = fontdue::FontSettings { scale: px, ..fontdue::FontSettings::default() };
        let font = fontdue::Font::from_bytes(font_bytes, settings)
            .map_err(|e| AtlasBuildError::Font(e.to_string()))?;

        let mut builder = config.atlas_builder();
        for ch in charset {
            let (metrics, bitmap) = font.rasterize(ch, px);
            builder.add_glyph(ch, metrics.width as u32, metrics.height as u32, bitmap)?;
        }
        let atlas = builder.build()?;

        let line_height = font
            .horizontal_line_metrics(px)
            .map_or(px * 1.2, |m| m.new_line_size);

        log::info!(
            "baked {} glyphs at {px}px into a {}x{} atlas",
            atlas.glyph_count(),
            atlas.width(),
            atlas.height()
        );
        Ok(Self { font, px, line_height, atlas })
    }

    #[inline]
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    #[inline]
    pub fn px(&self) -> f32 {
        self.px
    }

    #[inline]
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    fn run(&self, origin: Vec2, text: &str) -> Layout<()> {
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings { x: origin.x, y: origin.y, ..LayoutSettings::default() });
        layout.append(&[&self.font], &TextStyle::new(text, self.px, 0));
        layout
    }

    /// Lays `text` out with its top-left at `origin` (pixels, +Y down).
    pub fn layout(&self, origin: Vec2, text: &str) -> Vec<PlacedGlyph> {
        self.run(origin, text)
            .glyphs()
            .iter()
            .filter(|g| g.width > 0 && g.height > 0)
            .filter_map(|g| {
                let region = self.atlas.glyph(g.parent)?;
                Some(PlacedGlyph {
                    ch: g.parent,
                    rect: Rect::new(g.x, g.y, g.width as f32, g.height as f32),
                    uv: region.uv,
                })
            })
            .collect()
    }

    /// Size of the laid-out text. Width is the pen position after the last
    /// glyph; height is at least one line.
    pub fn measure(&self, text: &str) -> Vec2 {
        let layout = self.run(Vec2::zero(), text);
        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::new(0.0, self.line_height);
        }

        let w = glyphs
            .iter()
            .map(|g| {
                let m = self.font.metrics_indexed(g.key.glyph_index, self.px);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = (layout.height()).max(self.line_height);
        Vec2::new(w, h)
    }
}
