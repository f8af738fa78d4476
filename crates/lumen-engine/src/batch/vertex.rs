use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;

/// UI vertex record (32 bytes).
///
///  offset  0  position  [f32; 2]   loc 0
///  offset  8  uv        [f32; 2]   loc 1
///  offset 16  color.rg  [f32; 2]   loc 2
///  offset 24  color.ba  [f32; 2]   loc 3
///
/// `color` is one premultiplied RGBA field. The pipeline reads it as two
/// `Float32x2` attributes; the shader joins them back together.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<Vertex>() == Vertex::SIZE as usize);

impl Vertex {
    /// Byte size of one record.
    pub const SIZE: u64 = 32;

    pub const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // uv
        2 => Float32x2, // color.rg
        3 => Float32x2  // color.ba
    ];

    #[inline]
    pub fn new(position: Vec2, uv: [f32; 2], color: Color) -> Self {
        Self {
            position: [position.x, position.y],
            uv,
            color: color.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    /// The eight floats in record order.
    #[inline]
    pub fn to_floats(self) -> [f32; 8] {
        let [x, y] = self.position;
        let [u, v] = self.uv;
        let [r, g, b, a] = self.color;
        [x, y, u, v, r, g, b, a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_f32(bytes: &[u8], offset: usize) -> f32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[offset..offset + 4]);
        f32::from_ne_bytes(raw)
    }

    #[test]
    fn attributes_are_four_float2_at_8_byte_steps() {
        let offsets: Vec<u64> = Vertex::ATTRS.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16, 24]);
        assert!(Vertex::ATTRS.iter().all(|a| a.format == wgpu::VertexFormat::Float32x2));
        let locations: Vec<u32> = Vertex::ATTRS.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2, 3]);
        assert_eq!(Vertex::layout().array_stride, 32);
    }

    #[test]
    fn record_reads_back_bit_for_bit_through_attribute_offsets() {
        let v = Vertex {
            position: [12.5, -0.0],
            uv: [f32::MIN_POSITIVE, 0.999_999_9],
            color: [0.1, 0.2, 1.0e-38, f32::MAX],
        };

        let bytes = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 32);

        let mut back = [0.0f32; 8];
        for attr in Vertex::ATTRS {
            let at = attr.offset as usize;
            let slot = attr.shader_location as usize * 2;
            back[slot] = read_f32(bytes, at);
            back[slot + 1] = read_f32(bytes, at + 4);
        }

        let expected = v.to_floats();
        for (a, b) in back.iter().zip(expected.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn slices_cast_without_padding() {
        let verts = [Vertex::default(); 3];
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&verts).len(), 96);
    }
}
