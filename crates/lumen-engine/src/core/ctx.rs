use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::Gpu;
use crate::error::UiError;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::DropTracker;

/// Per-window handles.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// How [`FrameCtx::render`] ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    Presented,
    /// Nothing to draw into (minimized). No surface was acquired; an empty
    /// submission keeps the queue ticking.
    Skipped,
    /// The surface or the device rejected the frame; the next one may succeed.
    Dropped,
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// `'a` is the callback's duration, `'w` the window borrow held by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub pacing: &'a mut DropTracker,
    pub frame_index: u64,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Drawable size in physical pixels.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.gpu.viewport()
    }

    /// Clears the surface with `clear`, lets `draw` record into the same
    /// encoder, then submits and presents.
    ///
    /// The clear is submitted even if `draw` fails; its error is returned
    /// afterwards. With a zero-area viewport nothing is drawn and an empty unit
    /// of work is submitted instead.
    ///
    /// Frames dropped by the surface, or by a device error reported at
    /// submission, count against the [`DropTracker`] budget and only become
    /// errors once it is exhausted.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> Result<FrameStatus, UiError>
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>) -> Result<(), UiError>,
    {
        let viewport = self.gpu.viewport();
        if !viewport.is_valid() {
            self.gpu.submit_empty();
            return Ok(FrameStatus::Skipped);
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(&err);
                log::debug!("surface acquisition failed ({err}); {action:?}");
                self.pacing.record_drop(action.submission_error(&err))?;
                return Ok(FrameStatus::Dropped);
            }
        };

        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        let drawn = {
            let rctx = RenderCtx::new(
                self.gpu.device(),
                self.gpu.queue(),
                self.gpu.surface_format(),
                viewport,
                self.frame_index,
            );
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target)
        };

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        drawn?;
        if let Some(err) = self.gpu.take_device_error() {
            self.pacing.record_drop(err)?;
            return Ok(FrameStatus::Dropped);
        }
        self.pacing.record_presented();
        Ok(FrameStatus::Presented)
    }
}
