use crate::error::{SequenceError, UiError};

use super::Vertex;

/// Index element type uploaded to the device (`wgpu::IndexFormat::Uint32`).
pub type Index = u32;

/// Sizes of a finalized batch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub vertex_count: u32,
    pub index_count: u32,
    pub vertex_bytes: u64,
    pub index_bytes: u64,
}

impl BatchSummary {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_count == 0
    }

    /// Triangles covered by the batch (triangle-list topology).
    #[inline]
    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    /// Bytes staged per upload: vertices followed by indices.
    #[inline]
    pub fn staged_bytes(&self) -> u64 {
        self.vertex_bytes + self.index_bytes
    }
}

/// Frame-scoped vertex/index accumulator.
///
/// Append-only while open. Indices passed to [`append`](Self::append) are local
/// to the primitive and are rebased onto the current vertex count, so every
/// primitive only ever references its own vertices.
///
/// [`reset`](Self::reset) keeps the allocated storage; capacity only grows
/// unless [`shrink_to_fit`](Self::shrink_to_fit) is called.
#[derive(Debug, Default)]
pub struct Batch {
    vertices: Vec<Vertex>,
    indices: Vec<Index>,
    closed: bool,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one primitive.
    ///
    /// Nothing is written if the primitive is rejected.
    pub fn append(&mut self, vertices: &[Vertex], indices: &[Index]) -> Result<(), UiError> {
        if self.closed {
            return Err(SequenceError::WriteAfterClose.into());
        }

        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(UiError::InvalidPrimitive { index: bad, vertex_count: vertices.len() });
        }

        let base = self.vertices.len();
        ensure_room(base, vertices.len())?;
        ensure_room(self.indices.len(), indices.len())?;

        let base = base as Index;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|&i| base + i));
        Ok(())
    }

    /// Closes the batch. Idempotent until the next reset.
    pub fn finalize(&mut self) -> BatchSummary {
        self.closed = true;
        self.summary()
    }

    /// Clears both sequences and reopens the batch, keeping capacity.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.closed = false;
    }

    /// Releases storage beyond the current contents.
    pub fn shrink_to_fit(&mut self) {
        self.vertices.shrink_to_fit();
        self.indices.shrink_to_fit();
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Storage capacity as `(vertices, indices)`.
    #[inline]
    pub fn capacity(&self) -> (usize, usize) {
        (self.vertices.capacity(), self.indices.capacity())
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            vertex_count: self.vertex_count(),
            index_count: self.index_count(),
            vertex_bytes: std::mem::size_of_val(self.vertices.as_slice()) as u64,
            index_bytes: std::mem::size_of_val(self.indices.as_slice()) as u64,
        }
    }
}

/// Both sequences are counted and addressed with 32-bit indices.
fn ensure_room(current: usize, added: usize) -> Result<(), UiError> {
    let max = u64::from(Index::MAX);
    if current as u64 + added as u64 > max {
        return Err(UiError::BatchOverflow { max });
    }
    Ok(())
}
