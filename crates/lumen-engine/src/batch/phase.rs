/// Per-frame lifecycle of the UI batch.
///
/// `Empty → Declaring → Finalized → Uploading → Drawn → Empty`
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Nothing declared yet; storage from earlier frames is retained.
    #[default]
    Empty,
    /// Primitives are being appended.
    Declaring,
    /// Closed to appends; waiting to be consumed.
    Finalized,
    /// Capacity check, staging and copy are in progress.
    Uploading,
    /// The draw was recorded (or skipped for an empty batch).
    Drawn,
}

impl FramePhase {
    /// Whether `next` is the single legal successor of `self`.
    #[inline]
    pub fn can_advance_to(self, next: FramePhase) -> bool {
        matches!(
            (self, next),
            (FramePhase::Empty, FramePhase::Declaring)
                | (FramePhase::Declaring, FramePhase::Finalized)
                | (FramePhase::Finalized, FramePhase::Uploading)
                | (FramePhase::Uploading, FramePhase::Drawn)
                | (FramePhase::Drawn, FramePhase::Empty)
        )
    }
}
