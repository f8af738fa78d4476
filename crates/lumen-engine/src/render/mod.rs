//! Batch upload and the single UI draw.
//!
//! Per frame, in order:
//! 1. [`BufferManager`] makes sure the device buffers can hold the batch
//! 2. [`FrameUploader`] stages vertices + indices and records the copies
//! 3. [`UiRenderer`] records one indexed draw with a fresh [`Projection`]
//!
//! All three talk to the device through the [`UiBackend`] seam. The `wgpu`
//! implementation lives in [`wgpu_backend`].
//!
//! Convention: CPU geometry is in pixels (top-left origin, +Y down); the
//! projection uniform converts to clip space in the vertex shader.

mod backend;
mod buffers;
mod ctx;
mod projection;
mod renderer;
mod upload;
pub mod wgpu_backend;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{BufferKind, DrawRequest, StagedCopy, UiBackend};
pub use buffers::{grown_capacity, BufferManager, Growth};
pub use ctx::{RenderCtx, RenderTarget};
pub use projection::Projection;
pub use renderer::{DrawStats, FrameOutcome, UiRenderer};
pub use upload::{FrameUploader, UploadStats};
pub use wgpu_backend::{UiPipeline, WgpuBackend, WgpuRenderer};
