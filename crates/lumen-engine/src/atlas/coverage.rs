use std::collections::HashMap;

use super::{AtlasRegion, UvRect};

/// Packed coverage atlas. Immutable once built.
///
/// Holds the `R8Unorm` pixel data that is uploaded to the GPU once, the UV
/// table for glyphs and the reserved white region.
#[derive(Debug, Clone)]
pub struct Atlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    glyphs: HashMap<char, AtlasRegion>,
    white: AtlasRegion,
}

impl Atlas {
    pub(super) fn from_parts(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        glyphs: HashMap<char, AtlasRegion>,
        white: AtlasRegion,
    ) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self { width, height, pixels, glyphs, white }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major coverage bytes, one per texel.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn glyph(&self, id: char) -> Option<&AtlasRegion> {
        self.glyphs.get(&id)
    }

    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The solid region used by every non-text primitive.
    #[inline]
    pub fn white(&self) -> &AtlasRegion {
        &self.white
    }

    #[inline]
    pub fn white_uv(&self) -> UvRect {
        self.white.uv
    }

    /// Raw texel value; out-of-range coordinates clamp to the edge.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> u8 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// CPU replica of what the linear, clamp-to-edge sampler returns at `uv`.
    pub fn coverage_at(&self, uv: [f32; 2]) -> f32 {
        let px = uv[0] * self.width as f32 - 0.5;
        let py = uv[1] * self.height as f32 - 0.5;

        let fx = px - px.floor();
        let fy = py - py.floor();
        let x0 = px.floor() as i64;
        let y0 = py.floor() as i64;

        let tap = |x: i64, y: i64| {
            let x = x.clamp(0, i64::from(self.width) - 1) as u32;
            let y = y.clamp(0, i64::from(self.height) - 1) as u32;
            self.texel(x, y) as f32 / 255.0
        };
        let top = lerp(tap(x0, y0), tap(x0 + 1, y0), fx);
        let bottom = lerp(tap(x0, y0 + 1), tap(x0 + 1, y0 + 1), fx);
        lerp(top, bottom, fy)
    }
}

// `a + (b - a) * t` is exact when `a == b`, which the white-region guarantee relies on.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
