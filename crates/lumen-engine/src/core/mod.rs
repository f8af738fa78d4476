//! Contract between the runtime loop and applications.
//!
//! Applications implement [`App`]; each redraw they receive a [`FrameCtx`]
//! that acquires, clears, draws and presents one frame.

mod app;
mod ctx;
mod pacing;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, FrameStatus, WindowCtx};
pub use pacing::DropTracker;
