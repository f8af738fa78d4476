//! Error taxonomy for the UI batching pipeline.
//!
//! Construction-time failures (`AtlasBuildError`) halt startup. Per-frame
//! failures (`DeviceAllocationError`, `SubmissionError`) drop the frame and
//! leave the context ready for the next one. `SequenceError` is a caller bug.

use thiserror::Error;

use crate::batch::FramePhase;
use crate::render::BufferKind;

/// Out-of-order use of the per-frame state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Geometry was appended after the batch was finalized.
    #[error("write after close: batch is finalized until the next reset")]
    WriteAfterClose,

    /// An operation was attempted in the wrong frame phase.
    #[error("`{op}` is not allowed while the frame is {phase:?}")]
    OutOfOrder { op: &'static str, phase: FramePhase },

    /// Upload was attempted before the device buffer was sized for the batch.
    #[error("{kind:?} buffer was not reserved for this frame's batch")]
    CapacityNotReserved { kind: BufferKind },
}

/// The atlas could not be built from the supplied glyph set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtlasBuildError {
    #[error("atlas dimensions must be non-zero (got {width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("glyph {glyph:?} ({width}x{height} px) does not fit the {atlas_width}x{atlas_height} atlas")]
    DoesNotFit {
        glyph: Option<char>,
        width: u32,
        height: u32,
        atlas_width: u32,
        atlas_height: u32,
    },

    #[error("glyph {glyph:?}: bitmap has {actual} bytes, expected {expected}")]
    BitmapSize { glyph: char, expected: usize, actual: usize },

    #[error("font could not be parsed: {0}")]
    Font(String),
}

/// A device-side allocation failed. There is no degraded-capacity fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceAllocationError {
    #[error("{kind:?} buffer of {requested} bytes exceeds the device limit of {limit} bytes")]
    Buffer { kind: BufferKind, requested: u64, limit: u64 },

    #[error("transfer buffer of {requested} bytes exceeds the device limit of {limit} bytes")]
    Transfer { requested: u64, limit: u64 },

    #[error("atlas texture {width}x{height} exceeds the device limit of {limit} texels per side")]
    Texture { width: u32, height: u32, limit: u32 },
}

/// The device rejected the frame's unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Transient rejection; the frame is dropped and rendering continues.
    #[error("frame submission rejected: {reason}")]
    Rejected { reason: String },

    /// Too many consecutive frames were dropped.
    #[error("{count} consecutive frames dropped (last: {last})")]
    Persistent { count: u32, last: String },

    /// The device cannot continue (e.g. out of memory).
    #[error("device lost: {reason}")]
    Fatal { reason: String },
}

/// Top-level error for the UI pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UiError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    AtlasBuild(#[from] AtlasBuildError),

    #[error(transparent)]
    DeviceAllocation(#[from] DeviceAllocationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// A primitive referenced a vertex it did not contribute.
    #[error("primitive index {index} is out of range for its {vertex_count} vertices")]
    InvalidPrimitive { index: u32, vertex_count: usize },

    /// The batch would exceed the 32-bit index space.
    #[error("batch exceeds {max} vertices")]
    BatchOverflow { max: u64 },
}
