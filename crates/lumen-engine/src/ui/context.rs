use crate::atlas::{Atlas, UvRect};
use crate::batch::{Batch, BatchSummary, FramePhase, Index, Vertex};
use crate::coords::Viewport;
use crate::error::{SequenceError, UiError};
use crate::render::{FrameOutcome, UiBackend, UiRenderer};

/// Owns the frame batch and enforces the per-frame phase order.
///
/// `begin → push* → end → render`, once per frame. A frame that fails during
/// render is discarded and the context is left `Empty`, ready for the next
/// [`begin`](Self::begin).
pub struct UiContext {
    pub(super) batch: Batch,
    pub(super) white: UvRect,
    phase: FramePhase,
}

impl UiContext {
    /// Solid primitives sample `atlas`'s white region.
    pub fn new(atlas: &Atlas) -> Self {
        Self { batch: Batch::new(), white: atlas.white_uv(), phase: FramePhase::Empty }
    }

    #[inline]
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    #[inline]
    pub fn white_uv(&self) -> UvRect {
        self.white
    }

    #[inline]
    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    fn advance(&mut self, next: FramePhase) {
        debug_assert!(self.phase.can_advance_to(next), "{:?} -> {next:?}", self.phase);
        self.phase = next;
    }

    /// Starts declaring a frame. Storage from earlier frames is reused.
    pub fn begin(&mut self) -> Result<(), SequenceError> {
        match self.phase {
            FramePhase::Empty | FramePhase::Drawn => {
                self.batch.reset();
                self.phase = FramePhase::Empty;
                self.advance(FramePhase::Declaring);
                Ok(())
            }
            phase => Err(SequenceError::OutOfOrder { op: "begin", phase }),
        }
    }

    /// Appends one primitive; `indices` are local to `vertices`.
    pub fn push(&mut self, vertices: &[Vertex], indices: &[Index]) -> Result<(), UiError> {
        match self.phase {
            FramePhase::Declaring => self.batch.append(vertices, indices),
            FramePhase::Finalized => Err(SequenceError::WriteAfterClose.into()),
            phase => Err(SequenceError::OutOfOrder { op: "push", phase }.into()),
        }
    }

    /// Closes the batch. Calling it again before render is a no-op.
    pub fn end(&mut self) -> Result<BatchSummary, SequenceError> {
        match self.phase {
            FramePhase::Declaring => {
                self.advance(FramePhase::Finalized);
                Ok(self.batch.finalize())
            }
            FramePhase::Finalized => Ok(self.batch.finalize()),
            phase => Err(SequenceError::OutOfOrder { op: "end", phase }),
        }
    }

    /// Uploads the finalized batch and records its draw.
    ///
    /// An invalid viewport skips the frame without touching the device. On
    /// error the frame is discarded and the error returned.
    pub fn render<D>(
        &mut self,
        renderer: &mut UiRenderer<D::Buffer>,
        device: &mut D,
        viewport: Viewport,
    ) -> Result<FrameOutcome, UiError>
    where
        D: UiBackend,
    {
        if self.phase != FramePhase::Finalized {
            return Err(SequenceError::OutOfOrder { op: "render", phase: self.phase }.into());
        }
        if !viewport.is_valid() {
            self.skip_frame();
            return Ok(FrameOutcome::Skipped);
        }

        self.advance(FramePhase::Uploading);
        match renderer.render(device, &self.batch, viewport) {
            Ok(outcome) => {
                self.batch.reset();
                self.advance(FramePhase::Drawn);
                Ok(outcome)
            }
            Err(err) => {
                log::warn!("ui frame discarded: {err}");
                self.skip_frame();
                Err(err)
            }
        }
    }

    /// Abandons the current frame from any phase.
    pub fn skip_frame(&mut self) {
        self.batch.reset();
        self.phase = FramePhase::Empty;
    }
}
