//! In-memory [`UiBackend`] that records what the pipeline asked for.

use crate::batch::{Index, Vertex};
use crate::error::DeviceAllocationError;

use super::{BufferKind, DrawRequest, StagedCopy, UiBackend};

#[derive(Debug)]
pub(crate) struct MockBuffer {
    pub id: usize,
    pub kind: BufferKind,
    pub size: u64,
}

/// Snapshot of one draw, read back from simulated device memory.
#[derive(Debug, Clone)]
pub(crate) struct RecordedDraw {
    pub index_count: u32,
    pub projection: [f32; 16],
    pub vertices: Vec<Vertex>,
    pub indices: Vec<Index>,
}

pub(crate) struct RecordingBackend {
    pub memory: Vec<Vec<u8>>,
    pub created: Vec<(BufferKind, u64)>,
    pub create_calls: usize,
    pub released: usize,
    pub copy_calls: usize,
    /// Size of every transfer buffer handed to the device, in call order.
    pub transfers: Vec<u64>,
    pub draws: Vec<RecordedDraw>,
    pub max_buffer_size: u64,
    pub max_transfer_size: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            memory: Vec::new(),
            created: Vec::new(),
            create_calls: 0,
            released: 0,
            copy_calls: 0,
            transfers: Vec::new(),
            draws: Vec::new(),
            max_buffer_size: u64::MAX,
            max_transfer_size: u64::MAX,
        }
    }

    pub fn created_sizes(&self, kind: BufferKind) -> Vec<u64> {
        self.created.iter().filter(|(k, _)| *k == kind).map(|&(_, s)| s).collect()
    }

    pub fn read_vertices(&self, buffer: &MockBuffer, count: usize) -> Vec<Vertex> {
        let bytes = &self.memory[buffer.id][..count * Vertex::SIZE as usize];
        bytemuck::pod_collect_to_vec(bytes)
    }

    pub fn read_indices(&self, buffer: &MockBuffer, count: usize) -> Vec<Index> {
        let bytes = &self.memory[buffer.id][..count * std::mem::size_of::<Index>()];
        bytemuck::pod_collect_to_vec(bytes)
    }
}

impl UiBackend for RecordingBackend {
    type Buffer = MockBuffer;

    fn create_buffer(&mut self, kind: BufferKind, size: u64) -> Result<MockBuffer, DeviceAllocationError> {
        if size > self.max_buffer_size {
            return Err(DeviceAllocationError::Buffer { kind, requested: size, limit: self.max_buffer_size });
        }
        self.create_calls += 1;
        self.created.push((kind, size));
        self.memory.push(vec![0; size as usize]);
        Ok(MockBuffer { id: self.memory.len() - 1, kind, size })
    }

    fn release_buffer(&mut self, buffer: MockBuffer) {
        self.memory[buffer.id] = Vec::new();
        self.released += 1;
    }

    fn copy_staged(
        &mut self,
        staging: &[u8],
        copies: &[StagedCopy<'_, MockBuffer>],
    ) -> Result<(), DeviceAllocationError> {
        let requested = staging.len() as u64;
        if requested > self.max_transfer_size {
            return Err(DeviceAllocationError::Transfer { requested, limit: self.max_transfer_size });
        }
        self.transfers.push(requested);
        self.copy_calls += 1;

        for c in copies {
            assert!(c.dst_offset + c.size <= c.dst.size, "copy overruns {:?} buffer", c.dst.kind);
            let src = &staging[c.src_offset as usize..(c.src_offset + c.size) as usize];
            let dst = &mut self.memory[c.dst.id][c.dst_offset as usize..(c.dst_offset + c.size) as usize];
            dst.copy_from_slice(src);
        }

        Ok(())
    }

    fn draw(&mut self, request: DrawRequest<'_, MockBuffer>) {
        let vertex_count = (request.vertex_bytes / Vertex::SIZE) as usize;
        let draw = RecordedDraw {
            index_count: request.index_count,
            projection: request.projection.to_cols_array(),
            vertices: self.read_vertices(request.vertices, vertex_count),
            indices: self.read_indices(request.indices, request.index_count as usize),
        };
        self.draws.push(draw);
    }
}
