use crate::foundation::core::FrameIndex;

/// Single-slot draw request coalescer.
///
/// Every scroll event overwrites the slot; the next display refresh takes whatever is there.
/// At most one draw happens per refresh and it always uses the latest requested frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshSlot {
    pending: Option<FrameIndex>,
    coalesced: u64,
}

impl RefreshSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a draw of `index` on the next refresh. Returns `true` if this replaced an
    /// earlier request from the same refresh interval.
    pub fn request(&mut self, index: FrameIndex) -> bool {
        let replaced = self.pending.replace(index).is_some();
        if replaced {
            self.coalesced = self.coalesced.saturating_add(1);
        }
        replaced
    }

    /// Drain the slot for the current refresh tick.
    pub fn take(&mut self) -> Option<FrameIndex> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<FrameIndex> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Requests superseded before they were drawn, over the slot's lifetime.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
