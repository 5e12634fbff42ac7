use serde::Serialize;

/// Score cut-offs separating the three severity tiers.
/// Only constructed through [`TriageThresholds::new`] or `Default`, so the ordering always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriageThresholds {
    pub high: f64,
    pub medium: f64,
}

impl TriageThresholds {
    pub const DEFAULT_HIGH: f64 = 0.7;
    pub const DEFAULT_MEDIUM: f64 = 0.4;

    /// Requires `0 <= medium <= high <= 1`.
    pub fn new(high: f64, medium: f64) -> Option<Self> {
        let in_range = |value: f64| (0.0..=1.0).contains(&value);
        if in_range(high) && in_range(medium) && medium <= high {
            Some(Self { high, medium })
        } else {
            None
        }
    }
}

impl Default for TriageThresholds {
    fn default() -> Self {
        Self {
            high: Self::DEFAULT_HIGH,
            medium: Self::DEFAULT_MEDIUM,
        }
    }
}
