use crate::batch::{Batch, FramePhase};
use crate::error::{SequenceError, UiError};

use super::{BufferKind, BufferManager, StagedCopy, UiBackend};

/// What one upload moved.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct UploadStats {
    pub vertex_bytes: u64,
    pub index_bytes: u64,
}

/// Stages a finalized batch and records the copies into the device buffers.
///
/// Staging layout: vertex bytes at offset 0, index bytes right after. The host
/// scratch vector is reused across frames; the device transfer buffer is not.
#[derive(Debug, Default)]
pub struct FrameUploader {
    scratch: Vec<u8>,
}

impl FrameUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host-side staging capacity kept between frames.
    #[inline]
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// Callers must have run [`BufferManager::ensure_capacity`] for every
    /// non-empty section of the batch.
    pub fn upload<D>(
        &mut self,
        device: &mut D,
        batch: &Batch,
        buffers: &BufferManager<D::Buffer>,
    ) -> Result<UploadStats, UiError>
    where
        D: UiBackend,
    {
        if !batch.is_finalized() {
            return Err(SequenceError::OutOfOrder { op: "upload", phase: FramePhase::Declaring }.into());
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(batch.vertices());
        let index_bytes: &[u8] = bytemuck::cast_slice(batch.indices());
        let stats = UploadStats {
            vertex_bytes: vertex_bytes.len() as u64,
            index_bytes: index_bytes.len() as u64,
        };
        if stats.vertex_bytes == 0 && stats.index_bytes == 0 {
            return Ok(stats);
        }

        // An empty section has nothing to copy and needs no reserved destination.
        let copies = [
            (BufferKind::Vertex, 0, stats.vertex_bytes),
            (BufferKind::Index, stats.vertex_bytes, stats.index_bytes),
        ]
        .into_iter()
        .filter(|&(_, _, size)| size > 0)
        .map(|(kind, src_offset, size)| {
            let dst = reserved(buffers, kind, size)?;
            Ok::<_, SequenceError>(StagedCopy { src_offset, dst, dst_offset: 0, size })
        })
        .collect::<Result<Vec<_>, SequenceError>>()?;

        self.scratch.clear();
        self.scratch.extend_from_slice(vertex_bytes);
        self.scratch.extend_from_slice(index_bytes);

        device.copy_staged(&self.scratch, &copies)?;

        Ok(stats)
    }
}

fn reserved<B>(buffers: &BufferManager<B>, kind: BufferKind, bytes: u64) -> Result<&B, SequenceError> {
    match buffers.buffer(kind) {
        Some(buffer) if buffers.capacity(kind) >= bytes => Ok(buffer),
        _ => Err(SequenceError::CapacityNotReserved { kind }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Vertex;
    use crate::render::mock::RecordingBackend;

    fn vert(x: f32) -> Vertex {
        Vertex { position: [x, x + 1.0], uv: [0.5, 0.5], color: [1.0, 0.0, 0.0, 1.0] }
    }

    fn finalized_batch() -> Batch {
        let mut batch = Batch::new();
        batch.append(&[vert(0.0), vert(1.0), vert(2.0)], &[0, 1, 2]).unwrap();
        batch.append(&[vert(3.0), vert(4.0), vert(5.0), vert(6.0)], &[0, 1, 2, 0, 2, 3]).unwrap();
        batch.finalize();
        batch
    }

    fn reserve(dev: &mut RecordingBackend, batch: &Batch) -> BufferManager<crate::render::mock::MockBuffer> {
        let s = batch.summary();
        let mut buffers = BufferManager::new(64);
        buffers.ensure_capacity(dev, BufferKind::Vertex, s.vertex_bytes).unwrap();
        buffers.ensure_capacity(dev, BufferKind::Index, s.index_bytes).unwrap();
        buffers
    }

    #[test]
    fn device_buffers_hold_the_batch_bytes() {
        let mut dev = RecordingBackend::new();
        let batch = finalized_batch();
        let buffers = reserve(&mut dev, &batch);

        let stats = FrameUploader::new().upload(&mut dev, &batch, &buffers).unwrap();
        assert_eq!(stats.vertex_bytes, 7 * 32);
        assert_eq!(stats.index_bytes, 9 * 4);

        let vbuf = buffers.buffer(BufferKind::Vertex).unwrap();
        let ibuf = buffers.buffer(BufferKind::Index).unwrap();
        assert_eq!(dev.read_vertices(vbuf, 7), batch.vertices());
        assert_eq!(dev.read_indices(ibuf, 9), batch.indices());
        assert_eq!(dev.copy_calls, 1);
        assert_eq!(dev.transfers, vec![7 * 32 + 9 * 4]);
    }

    #[test]
    fn vertices_without_indices_skip_the_index_copy() {
        let mut dev = RecordingBackend::new();
        let mut batch = Batch::new();
        batch.append(&[vert(0.0), vert(1.0), vert(2.0)], &[]).unwrap();
        batch.finalize();
        let buffers = reserve(&mut dev, &batch);
        assert!(buffers.buffer(BufferKind::Index).is_none());

        let stats = FrameUploader::new().upload(&mut dev, &batch, &buffers).unwrap();
        assert_eq!(stats, UploadStats { vertex_bytes: 3 * 32, index_bytes: 0 });

        let vbuf = buffers.buffer(BufferKind::Vertex).unwrap();
        assert_eq!(dev.read_vertices(vbuf, 3), batch.vertices());
        assert_eq!(dev.transfers, vec![3 * 32]);
    }

    #[test]
    fn upload_requires_a_finalized_batch() {
        let mut dev = RecordingBackend::new();
        let mut batch = Batch::new();
        batch.append(&[vert(0.0), vert(1.0), vert(2.0)], &[0, 1, 2]).unwrap();
        let buffers = BufferManager::new(64);

        let err = FrameUploader::new().upload(&mut dev, &batch, &buffers).unwrap_err();
        assert!(matches!(err, UiError::Sequence(SequenceError::OutOfOrder { op: "upload", .. })));
        assert_eq!(dev.copy_calls, 0);
    }

    #[test]
    fn upload_without_reserved_capacity_fails() {
        let mut dev = RecordingBackend::new();
        let batch = finalized_batch();
        let buffers = BufferManager::new(64);

        let err = FrameUploader::new().upload(&mut dev, &batch, &buffers).unwrap_err();
        assert_eq!(
            err,
            UiError::Sequence(SequenceError::CapacityNotReserved { kind: BufferKind::Vertex })
        );
    }

    #[test]
    fn oversized_transfer_is_an_allocation_error() {
        let mut dev = RecordingBackend::new();
        let batch = finalized_batch();
        let buffers = reserve(&mut dev, &batch);
        dev.max_transfer_size = 64;

        let err = FrameUploader::new().upload(&mut dev, &batch, &buffers).unwrap_err();
        assert!(matches!(err, UiError::DeviceAllocation(_)));
        assert!(dev.transfers.is_empty());
    }

    #[test]
    fn each_frame_stages_into_its_own_transfer() {
        let mut dev = RecordingBackend::new();
        let mut uploader = FrameUploader::new();

        let large = finalized_batch();
        let buffers = reserve(&mut dev, &large);
        uploader.upload(&mut dev, &large, &buffers).unwrap();

        let mut small = Batch::new();
        small.append(&[vert(9.0), vert(8.0), vert(7.0)], &[0, 1, 2]).unwrap();
        small.finalize();
        uploader.upload(&mut dev, &small, &buffers).unwrap();

        // One transfer per frame, sized to that frame's batch alone.
        assert_eq!(dev.transfers, vec![7 * 32 + 9 * 4, 3 * 32 + 3 * 4]);
        let ibuf = buffers.buffer(BufferKind::Index).unwrap();
        assert_eq!(dev.read_indices(ibuf, 3), small.indices());
    }

    #[test]
    fn scratch_is_reused_between_frames() {
        let mut dev = RecordingBackend::new();
        let batch = finalized_batch();
        let buffers = reserve(&mut dev, &batch);
        let mut uploader = FrameUploader::new();

        uploader.upload(&mut dev, &batch, &buffers).unwrap();
        let cap = uploader.scratch_capacity();
        uploader.upload(&mut dev, &batch, &buffers).unwrap();
        assert_eq!(uploader.scratch_capacity(), cap);
    }
}
