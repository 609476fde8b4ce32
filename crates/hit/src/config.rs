use serde::{Deserialize, Serialize};

/// Tunables for pointer queries on an [`InteractiveSurface`](crate::InteractiveSurface).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestConfig {
    /// Distance in content pixels from a capture border at which a captured
    /// hit counts as "on the border".
    pub edge_slack: f64,
    /// How far past the capture border such a hit is pushed, in content
    /// pixels.
    pub edge_nudge: f64,
    /// Whether the router ray-casts this surface before falling back to edge
    /// queries.
    pub direct_pick: bool,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            edge_slack: 1.0,
            edge_nudge: 2.0,
            direct_pick: true,
        }
    }
}
