use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SubmissionError;

/// What the GPU layer did about a failed surface acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// The device cannot continue (commonly OOM).
    Fatal,
}

impl SurfaceErrorAction {
    /// The frame-level error this action stands for.
    pub fn submission_error(self, err: &wgpu::SurfaceError) -> SubmissionError {
        let reason = err.to_string();
        match self {
            SurfaceErrorAction::Fatal => SubmissionError::Fatal { reason },
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                SubmissionError::Rejected { reason }
            }
        }
    }
}

/// Collects device errors that wgpu reports outside any call site, such as
/// validation or out-of-memory failures raised by `queue.submit`.
///
/// Installed as the device's uncaptured-error handler, which would otherwise
/// panic. The frame loop drains it after each submission.
#[derive(Debug, Clone, Default)]
pub struct DeviceErrorSink {
    pending: Arc<Mutex<Option<SubmissionError>>>,
}

impl DeviceErrorSink {
    pub fn install(&self, device: &wgpu::Device) {
        let sink = self.clone();
        device.on_uncaptured_error(Arc::new(move |err: wgpu::Error| sink.report(&err)));
    }

    /// Logs `err` and keeps it for [`take`](Self::take). A pending fatal error
    /// is never replaced by a milder one.
    pub fn report(&self, err: &wgpu::Error) {
        log::error!("uncaptured device error: {err}");
        let next = submission_error(err);
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if !matches!(*pending, Some(SubmissionError::Fatal { .. })) {
            *pending = Some(next);
        }
    }

    pub fn take(&self) -> Option<SubmissionError> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

fn submission_error(err: &wgpu::Error) -> SubmissionError {
    let reason = err.to_string();
    match err {
        wgpu::Error::OutOfMemory { .. } => SubmissionError::Fatal { reason },
        _ => SubmissionError::Rejected { reason },
    }
}
