//! Frame-scoped geometry batching.
//!
//! Everything declared in a frame lands in one [`Batch`]: a vertex sequence and
//! an index sequence that are uploaded and drawn together with a single call.

mod geometry;
mod phase;
mod vertex;

pub use geometry::{Batch, BatchSummary, Index};
pub use phase::FramePhase;
pub use vertex::Vertex;
