//! Tick cadence flags
//!
//! The host runs the program on one or more fixed cadences, counted in
//! simulation frames. Flags combine: the fastest set flag wins.

use bitflags::bitflags;

bitflags! {
    /// Requested tick cadence
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TickRate: u8 {
        /// Every frame
        const EVERY_FRAME = 0b0001;
        /// Every 10th frame
        const EVERY_10 = 0b0010;
        /// Every 100th frame
        const EVERY_100 = 0b0100;
    }
}

impl TickRate {
    /// Cadence while cruising or sitting at a dock
    pub const CRUISE: Self = Self::EVERY_100;

    /// Extra cadence added for the final docking approach
    pub const DOCKING: Self = Self::EVERY_10;

    /// Frames between ticks for the fastest requested cadence.
    ///
    /// Returns `None` when no cadence is requested (ticking stopped).
    pub fn period_frames(&self) -> Option<u32> {
        if self.contains(Self::EVERY_FRAME) {
            Some(1)
        } else if self.contains(Self::EVERY_10) {
            Some(10)
        } else if self.contains(Self::EVERY_100) {
            Some(100)
        } else {
            None
        }
    }

    /// `true` when at least one cadence is requested
    pub fn is_ticking(&self) -> bool {
        self.period_frames().is_some()
    }
}
