// This module encapsulates the bitflags API
// so that we don't leak details that may
// affect semver later on.

use bitflags::bitflags;

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    struct ReconstructionBitFlags: u32 {
        const EMPTY = 0;
        const LEVEL_TRACE = 1 << 1;
    }
}

#[repr(transparent)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReconstructionOptions(ReconstructionBitFlags);

impl ReconstructionOptions {
    /// Keep the frontier of every level of the downhill walk.
    pub fn with_level_trace(self) -> Self {
        Self(self.0 | ReconstructionBitFlags::LEVEL_TRACE)
    }

    pub fn level_trace(&self) -> bool {
        self.0.contains(ReconstructionBitFlags::LEVEL_TRACE)
    }
}
