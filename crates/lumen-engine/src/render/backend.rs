use crate::error::DeviceAllocationError;

use super::Projection;

/// Which device buffer a request targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// One region copy out of the frame's transfer buffer.
#[derive(Debug)]
pub struct StagedCopy<'a, B> {
    pub src_offset: u64,
    pub dst: &'a B,
    pub dst_offset: u64,
    pub size: u64,
}

/// Everything the single UI pass needs.
///
/// The projection travels with the draw so a backend cannot begin the pass
/// before the uniform value is known.
#[derive(Debug)]
pub struct DrawRequest<'a, B> {
    pub projection: &'a Projection,
    pub vertices: &'a B,
    pub indices: &'a B,
    pub vertex_bytes: u64,
    pub index_bytes: u64,
    pub index_count: u32,
}

/// Device operations used by the UI pipeline.
///
/// Calls within one frame are recorded into a single command sequence, in
/// call order; copies recorded before [`draw`](Self::draw) are visible to it.
pub trait UiBackend {
    /// Device buffer handle.
    type Buffer;

    /// Allocates a `size`-byte buffer usable as `kind` and as a copy destination.
    fn create_buffer(
        &mut self,
        kind: BufferKind,
        size: u64,
    ) -> Result<Self::Buffer, DeviceAllocationError>;

    /// Releases a buffer that was replaced by a larger one.
    fn release_buffer(&mut self, buffer: Self::Buffer) {
        drop(buffer);
    }

    /// Fills a transient transfer buffer with `staging`, records `copies` out
    /// of it, and releases it again. Nothing outlives the call.
    fn copy_staged(
        &mut self,
        staging: &[u8],
        copies: &[StagedCopy<'_, Self::Buffer>],
    ) -> Result<(), DeviceAllocationError>;

    /// Writes the projection, begins the pass, binds and issues one indexed draw.
    fn draw(&mut self, request: DrawRequest<'_, Self::Buffer>);
}
