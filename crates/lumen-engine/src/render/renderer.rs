use crate::batch::{Batch, FramePhase};
use crate::config::UiConfig;
use crate::coords::Viewport;
use crate::error::{SequenceError, UiError};

use super::{BufferKind, BufferManager, DrawRequest, FrameUploader, Growth, Projection, UiBackend};

/// Numbers for a frame that reached the draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawStats {
    pub index_count: u32,
    pub vertex_bytes: u64,
    pub index_bytes: u64,
    pub vertex_growth: Growth,
    pub index_growth: Growth,
}

impl DrawStats {
    #[inline]
    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }
}

/// How a frame ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// One indexed draw was recorded.
    Drawn(DrawStats),
    /// The batch held no indices; nothing was recorded.
    Empty,
    /// The viewport could not be drawn into; upload and draw were bypassed.
    Skipped,
}

/// Turns a finalized batch into exactly one draw call.
///
/// Order per frame: grow buffers if needed, stage and copy, write the
/// projection, then bind and draw. An empty batch records nothing.
pub struct UiRenderer<B> {
    buffers: BufferManager<B>,
    uploader: FrameUploader,
    frames_drawn: u64,
    bound_generation: u64,
}

impl<B> UiRenderer<B> {
    pub fn new(config: &UiConfig) -> Self {
        Self::with_min_buffer_bytes(config.min_buffer_bytes)
    }

    pub fn with_min_buffer_bytes(min_bytes: u64) -> Self {
        Self {
            buffers: BufferManager::new(min_bytes),
            uploader: FrameUploader::new(),
            frames_drawn: 0,
            bound_generation: 0,
        }
    }

    #[inline]
    pub fn buffers(&self) -> &BufferManager<B> {
        &self.buffers
    }

    #[inline]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Releases the device buffers; see [`BufferManager::trim`].
    pub fn trim<D>(&mut self, device: &mut D)
    where
        D: UiBackend<Buffer = B>,
    {
        self.buffers.trim(device);
    }

    pub fn render<D>(
        &mut self,
        device: &mut D,
        batch: &Batch,
        viewport: Viewport,
    ) -> Result<FrameOutcome, UiError>
    where
        D: UiBackend<Buffer = B>,
    {
        if !batch.is_finalized() {
            return Err(SequenceError::OutOfOrder { op: "render", phase: FramePhase::Declaring }.into());
        }
        if !viewport.is_valid() {
            return Ok(FrameOutcome::Skipped);
        }

        let summary = batch.summary();
        if summary.is_empty() {
            return Ok(FrameOutcome::Empty);
        }

        let vertex_growth =
            self.buffers.ensure_capacity(device, BufferKind::Vertex, summary.vertex_bytes)?;
        let index_growth =
            self.buffers.ensure_capacity(device, BufferKind::Index, summary.index_bytes)?;

        if self.buffers.generation() != self.bound_generation {
            log::trace!("ui renderer: rebinding buffers (generation {})", self.buffers.generation());
            self.bound_generation = self.buffers.generation();
        }

        self.uploader.upload(device, batch, &self.buffers)?;

        let (Some(vertices), Some(indices)) =
            (self.buffers.buffer(BufferKind::Vertex), self.buffers.buffer(BufferKind::Index))
        else {
            return Err(SequenceError::CapacityNotReserved { kind: BufferKind::Vertex }.into());
        };

        let projection = Projection::orthographic(viewport);
        device.draw(DrawRequest {
            projection: &projection,
            vertices,
            indices,
            vertex_bytes: summary.vertex_bytes,
            index_bytes: summary.index_bytes,
            index_count: summary.index_count,
        });
        self.frames_drawn += 1;

        Ok(FrameOutcome::Drawn(DrawStats {
            index_count: summary.index_count,
            vertex_bytes: summary.vertex_bytes,
            index_bytes: summary.index_bytes,
            vertex_growth,
            index_growth,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Vertex;
    use crate::render::mock::{MockBuffer, RecordingBackend};

    fn vert(x: f32, y: f32) -> Vertex {
        Vertex { position: [x, y], uv: [0.0, 0.0], color: [1.0; 4] }
    }

    fn batch_of(quads: usize) -> Batch {
        let mut batch = Batch::new();
        for n in 0..quads {
            let x = n as f32 * 10.0;
            batch
                .append(
                    &[vert(x, 0.0), vert(x + 8.0, 0.0), vert(x + 8.0, 8.0), vert(x, 8.0)],
                    &[0, 1, 2, 0, 2, 3],
                )
                .unwrap();
        }
        batch.finalize();
        batch
    }

    fn renderer() -> UiRenderer<MockBuffer> {
        UiRenderer::with_min_buffer_bytes(64)
    }

    const VIEW: Viewport = Viewport::new(640.0, 480.0);

    #[test]
    fn one_draw_covers_every_index() {
        let mut dev = RecordingBackend::new();
        let mut r = renderer();

        let outcome = r.render(&mut dev, &batch_of(5), VIEW).unwrap();
        let FrameOutcome::Drawn(stats) = outcome else { panic!("expected a draw, got {outcome:?}") };
        assert_eq!(stats.index_count, 30);
        assert_eq!(stats.triangle_count(), 10);
        assert_eq!(dev.draws.len(), 1);
        assert_eq!(dev.draws[0].index_count, 30);
    }

    #[test]
    fn smaller_frame_after_larger_draws_only_its_own_indices() {
        let mut dev = RecordingBackend::new();
        let mut r = renderer();

        let big = batch_of(8);
        let small = batch_of(2);
        r.render(&mut dev, &big, VIEW).unwrap();
        r.render(&mut dev, &small, VIEW).unwrap();

        assert_eq!(dev.draws.len(), 2);
        assert_eq!(dev.draws[0].index_count, 48);
        assert_eq!(dev.draws[1].index_count, 12);
        assert_eq!(dev.draws[1].indices, small.indices());
        // stale tail from the larger frame is still in the buffer but never drawn
        assert_eq!(r.buffers().capacity(BufferKind::Index), 256);
    }

    #[test]
    fn empty_batch_records_nothing() {
        let mut dev = RecordingBackend::new();
        let mut r = renderer();
        let mut batch = Batch::new();
        batch.finalize();

        assert_eq!(r.render(&mut dev, &batch, VIEW).unwrap(), FrameOutcome::Empty);
        assert_eq!(dev.create_calls, 0);
        assert_eq!(dev.copy_calls, 0);
        assert!(dev.draws.is_empty());
        assert_eq!(r.frames_drawn(), 0);
    }

    #[test]
    fn invalid_viewport_bypasses_upload_and_draw() {
        let mut dev = RecordingBackend::new();
        let mut r = renderer();
        let outcome = r.render(&mut dev, &batch_of(3), Viewport::new(0.0, 0.0)).unwrap();
        assert_eq!(outcome, FrameOutcome::Skipped);
        assert_eq!(dev.create_calls + dev.copy_calls, 0);
        assert!(dev.draws.is_empty());
    }

    #[test]
    fn projection_follows_the_viewport() {
        let mut dev = RecordingBackend::new();
        let mut r = renderer();
        let batch = batch_of(1);
        r.render(&mut dev, &batch, Viewport::new(800.0, 600.0)).unwrap();
        r.render(&mut dev, &batch, Viewport::new(400.0, 300.0)).unwrap();
        assert_eq!(dev.draws[0].projection, Projection::orthographic(Viewport::new(800.0, 600.0)).to_cols_array());
        assert_eq!(dev.draws[1].projection, Projection::orthographic(Viewport::new(400.0, 300.0)).to_cols_array());
    }

    #[test]
    fn growth_happens_only_when_the_batch_outgrows_capacity() {
        let mut dev = RecordingBackend::new();
        let mut r = renderer();

        let first = r.render(&mut dev, &batch_of(4), VIEW).unwrap();
        let again = r.render(&mut dev, &batch_of(4), VIEW).unwrap();
        let FrameOutcome::Drawn(first) = first else { panic!() };
        let FrameOutcome::Drawn(again) = again else { panic!() };
        assert!(first.vertex_growth.reallocated());
        assert_eq!(again.vertex_growth, Growth::Unchanged);
        assert_eq!(again.index_growth, Growth::Unchanged);
        assert_eq!(dev.create_calls, 2);
    }

    #[test]
    fn allocation_failure_draws_nothing() {
        let mut dev = RecordingBackend::new();
        dev.max_buffer_size = 128;
        let mut r = renderer();

        let err = r.render(&mut dev, &batch_of(4), VIEW).unwrap_err();
        assert!(matches!(err, UiError::DeviceAllocation(_)));
        assert!(dev.draws.is_empty());
        assert_eq!(dev.copy_calls, 0);
    }

    #[test]
    fn rendering_an_open_batch_is_rejected() {
        let mut dev = RecordingBackend::new();
        let mut r = renderer();
        let err = r.render(&mut dev, &Batch::new(), VIEW).unwrap_err();
        assert!(matches!(err, UiError::Sequence(SequenceError::OutOfOrder { op: "render", .. })));
    }
}
