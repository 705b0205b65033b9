//! Request cost classes and their admission policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::CostClassError;

/// Cost category of a job request, derived once from the request variant.
///
/// Ordered from most to least expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostClass {
    /// Full-page composite render.
    WebComposite,
    /// Composite of several tracks.
    TrackComposite,
    /// Single track.
    Track,
}

impl CostClass {
    /// All classes, most expensive first.
    pub const ALL: [Self; 3] = [Self::WebComposite, Self::TrackComposite, Self::Track];

    /// Stable wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebComposite => "web_composite",
            Self::TrackComposite => "track_composite",
            Self::Track => "track",
        }
    }
}

impl fmt::Display for CostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostClass {
    type Err = CostClassError;

    /// Accepts the snake_case wire name or the CamelCase variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "web_composite" | "WebComposite" => Ok(Self::WebComposite),
            "track_composite" | "TrackComposite" => Ok(Self::TrackComposite),
            "track" | "Track" => Ok(Self::Track),
            other => Err(CostClassError::Unknown(other.to_string())),
        }
    }
}

/// Minimum idle cores required to admit a class, and cores pledged once admitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassPolicy {
    /// Available cores must be strictly greater than this.
    pub threshold: f64,
    /// Cores held in the ledger after acceptance.
    pub pledge: f64,
}

impl ClassPolicy {
    /// Policy with the given threshold and pledge.
    pub const fn new(threshold: f64, pledge: f64) -> Self {
        Self { threshold, pledge }
    }
}

/// Policy for each class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassTable {
    /// [`CostClass::WebComposite`] policy.
    pub web_composite: ClassPolicy,
    /// [`CostClass::TrackComposite`] policy.
    pub track_composite: ClassPolicy,
    /// [`CostClass::Track`] policy.
    pub track: ClassPolicy,
}

impl ClassTable {
    /// Policy for `class`.
    pub const fn policy(&self, class: CostClass) -> ClassPolicy {
        match class {
            CostClass::WebComposite => self.web_composite,
            CostClass::TrackComposite => self.track_composite,
            CostClass::Track => self.track,
        }
    }

    /// Admission threshold for `class`.
    pub const fn threshold(&self, class: CostClass) -> f64 {
        self.policy(class).threshold
    }

    /// Pledge size for `class`.
    pub const fn pledge(&self, class: CostClass) -> f64 {
        self.policy(class).pledge
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self {
            web_composite: ClassPolicy::new(3.0, 3.0),
            track_composite: ClassPolicy::new(2.0, 2.0),
            track: ClassPolicy::new(1.0, 1.0),
        }
    }
}
