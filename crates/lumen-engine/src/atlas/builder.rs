use std::collections::HashMap;

use crate::error::AtlasBuildError;

use super::{Atlas, AtlasRegion, PixelRect, UvRect};

/// Pixels between packed entries.
pub const DEFAULT_GLYPH_PADDING: u32 = 1;

/// Side length of the solid-white block, in texels.
pub const DEFAULT_WHITE_BLOCK: u32 = 4;

struct PendingGlyph {
    id: char,
    width: u32,
    height: u32,
    bitmap: Vec<u8>,
}

/// Packs glyph bitmaps and the reserved white block into one atlas image.
///
/// Packing is a simple shelf allocator: entries are placed left to right and a
/// new shelf starts when the current one is full. Glyphs are placed tallest
/// first; the white block always takes the first slot.
pub struct AtlasBuilder {
    width: u32,
    height: u32,
    padding: u32,
    white_block: u32,
    glyphs: Vec<PendingGlyph>,
}

impl AtlasBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: DEFAULT_GLYPH_PADDING,
            white_block: DEFAULT_WHITE_BLOCK,
            glyphs: Vec::new(),
        }
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// White block side length; clamped to at least one texel.
    pub fn white_block(mut self, size: u32) -> Self {
        self.white_block = size.max(1);
        self
    }

    /// Queues a single-channel glyph bitmap (`width * height` bytes, row-major).
    ///
    /// Zero-area glyphs (whitespace) are accepted and produce no region. A
    /// repeated `id` keeps the first bitmap.
    pub fn add_glyph(
        &mut self,
        id: char,
        width: u32,
        height: u32,
        bitmap: Vec<u8>,
    ) -> Result<&mut Self, AtlasBuildError> {
        let expected = width as usize * height as usize;
        if bitmap.len() != expected {
            return Err(AtlasBuildError::BitmapSize { glyph: id, expected, actual: bitmap.len() });
        }
        if expected == 0 {
            return Ok(self);
        }
        if self.glyphs.iter().any(|g| g.id == id) {
            log::debug!("atlas: duplicate glyph {id:?} ignored");
            return Ok(self);
        }
        self.glyphs.push(PendingGlyph { id, width, height, bitmap });
        Ok(self)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Packs everything queued so far.
    ///
    /// Fails if any entry (the white block included) does not fit.
    pub fn build(mut self) -> Result<Atlas, AtlasBuildError> {
        let (aw, ah) = (self.width, self.height);
        if aw == 0 || ah == 0 {
            return Err(AtlasBuildError::ZeroSize { width: aw, height: ah });
        }

        let mut pixels = vec![0u8; aw as usize * ah as usize];
        let mut shelf = Shelf::new(aw, ah, self.padding);

        let wb = self.white_block;
        let white_px = shelf.place(wb, wb).ok_or(AtlasBuildError::DoesNotFit {
            glyph: None,
            width: wb,
            height: wb,
            atlas_width: aw,
            atlas_height: ah,
        })?;
        fill(&mut pixels, aw, white_px, 0xFF);
        let white = AtlasRegion {
            pixels: white_px,
            uv: UvRect::texel_centers(white_px, aw, ah),
        };

        // Stable: equal heights keep insertion order.
        self.glyphs.sort_by(|a, b| b.height.cmp(&a.height));

        let mut glyphs = HashMap::with_capacity(self.glyphs.len());
        for g in &self.glyphs {
            let px = shelf.place(g.width, g.height).ok_or(AtlasBuildError::DoesNotFit {
                glyph: Some(g.id),
                width: g.width,
                height: g.height,
                atlas_width: aw,
                atlas_height: ah,
            })?;
            blit(&mut pixels, aw, px, &g.bitmap);
            glyphs.insert(g.id, AtlasRegion { pixels: px, uv: UvRect::covering(px, aw, ah) });
        }

        log::debug!(
            "atlas: packed {} glyphs into {aw}x{ah} ({} rows used)",
            glyphs.len(),
            shelf.used_height()
        );

        Ok(Atlas::from_parts(aw, ah, pixels, glyphs, white))
    }
}

struct Shelf {
    width: u32,
    height: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl Shelf {
    fn new(width: u32, height: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
        }
    }

    fn place(&mut self, w: u32, h: u32) -> Option<PixelRect> {
        let pad = self.padding;

        // Start a new shelf when the entry doesn't fit horizontally.
        if self.cursor_x + w + pad > self.width {
            self.cursor_y += self.row_height + pad;
            self.cursor_x = pad;
            self.row_height = 0;
        }

        if self.cursor_x + w + pad > self.width || self.cursor_y + h + pad > self.height {
            return None;
        }

        let rect = PixelRect { x: self.cursor_x, y: self.cursor_y, w, h };
        self.cursor_x += w + pad;
        self.row_height = self.row_height.max(h);
        Some(rect)
    }

    fn used_height(&self) -> u32 {
        self.cursor_y + self.row_height
    }
}

fn fill(pixels: &mut [u8], stride: u32, px: PixelRect, value: u8) {
    for row in px.y..px.y + px.h {
        let start = (row * stride + px.x) as usize;
        pixels[start..start + px.w as usize].fill(value);
    }
}

fn blit(pixels: &mut [u8], stride: u32, px: PixelRect, bitmap: &[u8]) {
    for (i, src) in bitmap.chunks_exact(px.w as usize).enumerate() {
        let start = ((px.y + i as u32) * stride + px.x) as usize;
        pixels[start..start + px.w as usize].copy_from_slice(src);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, v: u8) -> Vec<u8> {
        vec![v; (w * h) as usize]
    }

    fn overlaps(a: PixelRect, b: PixelRect) -> bool {
        a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
    }

    #[test]
    fn white_block_is_reserved_first_and_fully_opaque() {
        let atlas = AtlasBuilder::new(64, 64).build().unwrap();
        let white = atlas.white();
        assert_eq!(white.pixels, PixelRect { x: 1, y: 1, w: 4, h: 4 });
        for y in 1..5 {
            for x in 1..5 {
                assert_eq!(atlas.texel(x, y), 255);
            }
        }
        assert_eq!(atlas.texel(0, 0), 0);
    }

    #[test]
    fn packed_regions_never_overlap() {
        let mut b = AtlasBuilder::new(64, 64);
        for (n, c) in ('a'..='t').enumerate() {
            let w = 3 + (n as u32 % 5);
            let h = 4 + (n as u32 % 7);
            b.add_glyph(c, w, h, solid(w, h, 10 + n as u8)).unwrap();
        }
        let atlas = b.build().unwrap();

        let mut regions: Vec<PixelRect> = ('a'..='t').map(|c| atlas.glyph(c).unwrap().pixels).collect();
        regions.push(atlas.white().pixels);
        for (i, a) in regions.iter().enumerate() {
            assert!(a.x + a.w <= 64 && a.y + a.h <= 64);
            for b in &regions[i + 1..] {
                assert!(!overlaps(*a, *b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn glyph_pixels_are_copied_row_by_row() {
        let mut b = AtlasBuilder::new(32, 32);
        b.add_glyph('x', 2, 2, vec![1, 2, 3, 4]).unwrap();
        let atlas = b.build().unwrap();
        let px = atlas.glyph('x').unwrap().pixels;
        assert_eq!(atlas.texel(px.x, px.y), 1);
        assert_eq!(atlas.texel(px.x + 1, px.y), 2);
        assert_eq!(atlas.texel(px.x, px.y + 1), 3);
        assert_eq!(atlas.texel(px.x + 1, px.y + 1), 4);
    }

    #[test]
    fn glyph_uv_covers_its_texels() {
        let mut b = AtlasBuilder::new(100, 50);
        b.add_glyph('g', 10, 5, solid(10, 5, 1)).unwrap();
        let atlas = b.build().unwrap();
        let r = atlas.glyph('g').unwrap();
        assert_eq!(r.uv.min, [r.pixels.x as f32 / 100.0, r.pixels.y as f32 / 50.0]);
        assert_eq!(r.uv.max, [(r.pixels.x + 10) as f32 / 100.0, (r.pixels.y + 5) as f32 / 50.0]);
    }

    #[test]
    fn overflowing_glyph_set_fails_to_build() {
        let mut b = AtlasBuilder::new(16, 16);
        for c in 'a'..='z' {
            b.add_glyph(c, 6, 6, solid(6, 6, 1)).unwrap();
        }
        let err = b.build().unwrap_err();
        assert!(matches!(err, AtlasBuildError::DoesNotFit { glyph: Some(_), .. }));
    }

    #[test]
    fn atlas_too_small_for_white_block_fails() {
        let err = AtlasBuilder::new(4, 4).build().unwrap_err();
        assert!(matches!(err, AtlasBuildError::DoesNotFit { glyph: None, .. }));
    }

    #[test]
    fn zero_sized_atlas_is_rejected() {
        let err = AtlasBuilder::new(0, 128).build().unwrap_err();
        assert_eq!(err, AtlasBuildError::ZeroSize { width: 0, height: 128 });
    }

    #[test]
    fn bitmap_length_must_match_dimensions() {
        let mut b = AtlasBuilder::new(32, 32);
        let err = b.add_glyph('q', 3, 3, vec![0; 8]).err().unwrap();
        assert_eq!(err, AtlasBuildError::BitmapSize { glyph: 'q', expected: 9, actual: 8 });
    }

    #[test]
    fn whitespace_and_duplicates_are_not_packed() {
        let mut b = AtlasBuilder::new(32, 32);
        b.add_glyph(' ', 0, 0, Vec::new()).unwrap();
        b.add_glyph('a', 2, 2, solid(2, 2, 7)).unwrap();
        b.add_glyph('a', 3, 3, solid(3, 3, 9)).unwrap();
        assert_eq!(b.glyph_count(), 1);
        let atlas = b.build().unwrap();
        assert!(atlas.glyph(' ').is_none());
        assert_eq!(atlas.glyph('a').unwrap().pixels.w, 2);
    }
}
