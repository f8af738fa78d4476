//! GPU device + surface management.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue
//! - creates and configures the Surface (swapchain)
//! - acquires frames and hands out encoders/views for the UI pass

mod error;
mod frame;
mod gpu;
mod init;
mod surface;
#[cfg(test)]
pub(crate) mod testing;

pub use error::{DeviceErrorSink, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
