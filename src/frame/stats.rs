//! Per-receiver counters

/// Counters kept by a [`StreamDeframer`](super::StreamDeframer).
///
/// Owned by the receiver, so plain integers suffice.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReceiverStats {
    /// Bytes fed through `push`
    pub bytes_received: u64,
    /// Bytes dropped while waiting for a START marker
    pub bytes_discarded: u64,
    /// Frames that passed validation
    pub frames_accepted: u64,
    /// Frames rejected by validation
    pub frames_rejected: u64,
    /// Partial frames abandoned at the accumulator limit
    pub overflows: u64,
    /// Partial frames abandoned through `reset`
    pub resets: u64,
}

impl ReceiverStats {
    /// Total completed results, valid or not
    #[must_use]
    pub const fn frames_completed(&self) -> u64 {
        self.frames_accepted + self.frames_rejected + self.overflows
    }

    /// Share of completed results that were valid, if any completed
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn acceptance_ratio(&self) -> Option<f64> {
        let completed = self.frames_completed();
        if completed == 0 {
            return None;
        }

        Some(self.frames_accepted as f64 / completed as f64)
    }
}
