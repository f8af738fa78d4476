use crate::error::DeviceAllocationError;

use super::{BufferKind, UiBackend};

/// Capacity chosen for a buffer that must hold `required` bytes.
///
/// The smallest power of two that is `>= required` and `>= min_bytes`.
/// `None` if that value does not fit in a `u64`.
#[inline]
pub fn grown_capacity(required: u64, min_bytes: u64) -> Option<u64> {
    required.max(min_bytes).max(1).checked_next_power_of_two()
}

/// Result of [`BufferManager::ensure_capacity`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Growth {
    Unchanged,
    Reallocated { from: u64, to: u64 },
}

impl Growth {
    #[inline]
    pub fn reallocated(self) -> bool {
        matches!(self, Growth::Reallocated { .. })
    }
}

struct Slot<B> {
    buffer: B,
    capacity: u64,
}

/// Owns the persistent vertex and index buffers.
///
/// Capacity grows to the next power of two when a batch no longer fits and
/// never shrinks on its own; [`trim`](Self::trim) releases both buffers on
/// request. The old buffer is released only once its replacement exists, so
/// a failed allocation leaves the previous one in place.
pub struct BufferManager<B> {
    vertex: Option<Slot<B>>,
    index: Option<Slot<B>>,
    min_bytes: u64,
    generation: u64,
}

impl<B> BufferManager<B> {
    pub fn new(min_bytes: u64) -> Self {
        Self { vertex: None, index: None, min_bytes, generation: 0 }
    }

    fn slot(&self, kind: BufferKind) -> Option<&Slot<B>> {
        match kind {
            BufferKind::Vertex => self.vertex.as_ref(),
            BufferKind::Index => self.index.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: BufferKind) -> &mut Option<Slot<B>> {
        match kind {
            BufferKind::Vertex => &mut self.vertex,
            BufferKind::Index => &mut self.index,
        }
    }

    /// Current capacity in bytes; zero before the first allocation.
    #[inline]
    pub fn capacity(&self, kind: BufferKind) -> u64 {
        self.slot(kind).map_or(0, |s| s.capacity)
    }

    #[inline]
    pub fn buffer(&self, kind: BufferKind) -> Option<&B> {
        self.slot(kind).map(|s| &s.buffer)
    }

    /// Bumped every time either buffer is replaced. Bindings taken against an
    /// older generation are stale.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn min_bytes(&self) -> u64 {
        self.min_bytes
    }

    /// Makes sure the `kind` buffer can hold `required` bytes.
    pub fn ensure_capacity<D>(
        &mut self,
        device: &mut D,
        kind: BufferKind,
        required: u64,
    ) -> Result<Growth, DeviceAllocationError>
    where
        D: UiBackend<Buffer = B>,
    {
        let current = self.capacity(kind);
        if required == 0 || required <= current {
            return Ok(Growth::Unchanged);
        }

        let target = grown_capacity(required, self.min_bytes).ok_or(DeviceAllocationError::Buffer {
            kind,
            requested: required,
            limit: u64::MAX,
        })?;
        let buffer = device.create_buffer(kind, target)?;

        if let Some(old) = self.slot_mut(kind).replace(Slot { buffer, capacity: target }) {
            device.release_buffer(old.buffer);
        }
        self.generation += 1;

        log::debug!("ui {kind:?} buffer: {current} -> {target} bytes (needed {required})");
        Ok(Growth::Reallocated { from: current, to: target })
    }

    /// Releases both buffers. The next frame reallocates from the minimum.
    pub fn trim<D>(&mut self, device: &mut D)
    where
        D: UiBackend<Buffer = B>,
    {
        let mut released = false;
        for kind in [BufferKind::Vertex, BufferKind::Index] {
            if let Some(old) = self.slot_mut(kind).take() {
                device.release_buffer(old.buffer);
                released = true;
            }
        }
        if released {
            self.generation += 1;
            log::debug!("ui buffers trimmed");
        }
    }
}
