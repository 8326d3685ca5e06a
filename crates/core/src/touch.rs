//! Scoring events ("touches") shown on the bout timeline.
//!
//! Sessions carry a touch list, but nothing in the service writes to it yet;
//! it exists so the timeline can render touches once a detection source
//! fills them in.

use serde::{Deserialize, Serialize};

/// Who scored the touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    You,
    Opponent,
}

/// A timestamped scoring event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    /// Seconds from the start of the video.
    pub time: f64,
    pub scorer: Scorer,
    /// Free-form action label, e.g. "attack" or "riposte".
    #[serde(rename = "type")]
    pub kind: String,
}
