use crate::shared::constants::{CASCADE_SCALE_FACTOR, MIN_NEIGHBORS};

/// How the cascade walks scales and positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPolicy {
    /// Scan every scale and position and report all confirmed candidates.
    Exhaustive,
    /// Favor speed over recall: coarse stride, and the engine may stop once
    /// a sufficiently confident largest candidate has been found.
    BiggestRough,
}

/// Parameters for one cascade scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanOptions {
    /// Shrink applied to the search window between passes. Meaningful values
    /// are > 1.0; engine adapters clamp anything else into their supported
    /// range rather than reject the scan.
    pub scale_factor: f32,
    /// Overlapping raw detections required to confirm a candidate.
    pub min_neighbors: u32,
    pub policy: SearchPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            scale_factor: CASCADE_SCALE_FACTOR,
            min_neighbors: MIN_NEIGHBORS,
            policy: SearchPolicy::BiggestRough,
        }
    }
}
