use crate::atlas::UvRect;
use crate::batch::{Index, Vertex};
use crate::coords::{Rect, Vec2};
use crate::error::UiError;
use crate::paint::Color;
use crate::text::FontAtlas;

use super::UiContext;

/// Two triangles over corners in `Rect::corners` order.
pub const QUAD_INDICES: [Index; 6] = [0, 1, 2, 0, 2, 3];

/// Primitive helpers. Each call appends one or more primitives to the frame.
impl UiContext {
    /// Textured quad; `uv` is mapped corner to corner onto `rect`.
    pub fn quad(&mut self, rect: Rect, uv: UvRect, color: Color) -> Result<(), UiError> {
        let pos = rect.normalized().corners();
        let uvs = uv.corners();
        let vertices: [Vertex; 4] = std::array::from_fn(|i| Vertex::new(pos[i], uvs[i], color));
        self.push(&vertices, &QUAD_INDICES)
    }

    /// Solid rectangle.
    pub fn rect(&mut self, rect: Rect, color: Color) -> Result<(), UiError> {
        self.quad(rect, self.white, color)
    }

    /// Solid triangle.
    pub fn triangle(&mut self, points: [Vec2; 3], color: Color) -> Result<(), UiError> {
        let uv = self.white.lerp([0.5, 0.5]);
        let vertices = points.map(|p| Vertex::new(p, uv, color));
        self.push(&vertices, &[0, 1, 2])
    }

    /// Rectangle outline drawn inside `rect`.
    pub fn frame(&mut self, rect: Rect, thickness: f32, color: Color) -> Result<(), UiError> {
        let r = rect.normalized();
        let t = thickness.clamp(0.0, r.size.x.min(r.size.y) * 0.5);
        let (x, y, w, h) = (r.origin.x, r.origin.y, r.size.x, r.size.y);

        self.rect(Rect::new(x, y, w, t), color)?;
        self.rect(Rect::new(x, y + h - t, w, t), color)?;
        self.rect(Rect::new(x, y + t, t, h - 2.0 * t), color)?;
        self.rect(Rect::new(x + w - t, y + t, t, h - 2.0 * t), color)
    }

    /// One quad per visible glyph, top-left at `origin`. Returns the text size.
    pub fn text(&mut self, fonts: &FontAtlas, origin: Vec2, text: &str, color: Color) -> Result<Vec2, UiError> {
        for glyph in fonts.layout(origin, text) {
            self.quad(glyph.rect, glyph.uv, color)?;
        }
        Ok(fonts.measure(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{Atlas, AtlasBuilder};

    fn atlas() -> Atlas {
        let mut b = AtlasBuilder::new(64, 64).white_block(3);
        b.add_glyph('#', 5, 5, vec![0; 25]).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn solid_primitives_only_sample_full_coverage() {
        let atlas = atlas();
        let mut ui = UiContext::new(&atlas);
        ui.begin().unwrap();
        ui.rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::white()).unwrap();
        ui.frame(Rect::new(20.0, 20.0, 30.0, 12.0), 2.0, Color::white()).unwrap();
        ui.triangle([Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)], Color::white())
            .unwrap();
        ui.end().unwrap();

        let batch = ui.batch();
        for tri in batch.indices().chunks_exact(3) {
            let uv: Vec<[f32; 2]> = tri.iter().map(|&i| batch.vertices()[i as usize].uv).collect();
            // corners plus dyadic barycentric points, so the sums stay exact
            for (a, b, c) in [(1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0), (0.25, 0.25, 0.5), (0.5, 0.5, 0.0)] {
                let p = [
                    uv[0][0] * a + uv[1][0] * b + uv[2][0] * c,
                    uv[0][1] * a + uv[1][1] * b + uv[2][1] * c,
                ];
                assert_eq!(atlas.coverage_at(p), 1.0, "uv {p:?}");
            }
        }
    }

    #[test]
    fn quad_maps_uv_corner_to_corner() {
        let atlas = atlas();
        let glyph = *atlas.glyph('#').unwrap();
        let mut ui = UiContext::new(&atlas);
        ui.begin().unwrap();
        ui.quad(Rect::new(1.0, 2.0, 5.0, 5.0), glyph.uv, Color::white()).unwrap();
        let v = ui.batch().vertices();
        assert_eq!(v[0].uv, glyph.uv.min);
        assert_eq!(v[2].uv, glyph.uv.max);
        assert_eq!(v[0].position, [1.0, 2.0]);
        assert_eq!(v[2].position, [6.0, 7.0]);
    }

    #[test]
    fn frame_is_four_edges_inside_the_rect() {
        let atlas = atlas();
        let mut ui = UiContext::new(&atlas);
        ui.begin().unwrap();
        let outer = Rect::new(10.0, 10.0, 40.0, 20.0);
        ui.frame(outer, 3.0, Color::white()).unwrap();
        let summary = ui.end().unwrap();
        assert_eq!(summary.vertex_count, 16);
        assert_eq!(summary.index_count, 24);
        let inside = ui.batch().vertices().iter().all(|v| {
            v.position[0] >= 10.0 && v.position[0] <= 50.0 && v.position[1] >= 10.0 && v.position[1] <= 30.0
        });
        assert!(inside);
    }
}
