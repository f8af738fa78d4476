/// Texel rectangle inside the atlas image.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Normalized texture-coordinate rectangle.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRect {
    /// Covers the whole texel rectangle, edge to edge.
    pub fn covering(px: PixelRect, atlas_w: u32, atlas_h: u32) -> Self {
        let (w, h) = (atlas_w as f32, atlas_h as f32);
        Self {
            min: [px.x as f32 / w, px.y as f32 / h],
            max: [(px.x + px.w) as f32 / w, (px.y + px.h) as f32 / h],
        }
    }

    /// Spans texel centers only, so bilinear taps never leave `px`.
    pub fn texel_centers(px: PixelRect, atlas_w: u32, atlas_h: u32) -> Self {
        let (w, h) = (atlas_w as f32, atlas_h as f32);
        Self {
            min: [(px.x as f32 + 0.5) / w, (px.y as f32 + 0.5) / h],
            max: [
                ((px.x + px.w) as f32 - 0.5) / w,
                ((px.y + px.h) as f32 - 0.5) / h,
            ],
        }
    }

    /// Point at fractional position `t` (`[0, 0]` is `min`).
    #[inline]
    pub fn lerp(&self, t: [f32; 2]) -> [f32; 2] {
        [
            self.min[0] + (self.max[0] - self.min[0]) * t[0],
            self.min[1] + (self.max[1] - self.min[1]) * t[1],
        ]
    }

    /// Corners in quad order: top-left, top-right, bottom-right, bottom-left.
    #[inline]
    pub fn corners(&self) -> [[f32; 2]; 4] {
        [
            self.min,
            [self.max[0], self.min[1]],
            self.max,
            [self.min[0], self.max[1]],
        ]
    }
}

/// A packed entry: where it lives in texels and how to address it in UV space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct AtlasRegion {
    pub pixels: PixelRect,
    pub uv: UvRect,
}
