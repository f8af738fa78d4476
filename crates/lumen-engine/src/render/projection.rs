use nalgebra::{Matrix4, Point3};

use crate::coords::{Vec2, Viewport};

/// Pixel-to-clip orthographic transform.
///
/// Maps `(0, 0)` to the top-left of clip space and `(width, height)` to the
/// bottom-right. Column-major, uploaded as a single `mat4x4<f32>` uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection(Matrix4<f32>);

impl Projection {
    /// Uniform size in bytes.
    pub const SIZE: u64 = 64;

    pub fn orthographic(viewport: Viewport) -> Self {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        // bottom = h, top = 0 flips Y so pixel rows grow downwards.
        Self(Matrix4::new_orthographic(0.0, w, h, 0.0, -1.0, 1.0))
    }

    /// Column-major floats, the layout WGSL expects.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.0.as_slice());
        out
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.0.as_slice())
    }

    /// Clip-space `(x, y)` of a pixel position.
    pub fn transform(&self, p: Vec2) -> [f32; 2] {
        let clip = self.0.transform_point(&Point3::new(p.x, p.y, 0.0));
        [clip.x, clip.y]
    }
}
