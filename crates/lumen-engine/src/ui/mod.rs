//! Immediate-mode front end: declare primitives each frame, then render.
//!
//! ```text
//! ui.begin()?;
//! ui.rect(panel, Color::from_hex(0x202020ff))?;
//! ui.text(&fonts, origin, "hello", Color::white())?;
//! ui.end()?;
//! ui.render(&mut renderer, &mut backend, viewport)?;
//! ```

mod context;
mod painter;

pub use context::UiContext;
pub use painter::QUAD_INDICES;
