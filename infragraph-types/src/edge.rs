//! Edge - a directed, labeled relationship between two vertex ids.

use core::fmt;
use core::str::FromStr;

use crate::BuildError;

/// Closed set of relationship types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EdgeLabel {
    /// Hosted on / running on / raised on.
    On,
    /// Physically or logically contains.
    Contains,
    /// Attached to (volumes, ports).
    Attached,
}

impl EdgeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeLabel::On => "ON",
            EdgeLabel::Contains => "CONTAINS",
            EdgeLabel::Attached => "ATTACHED",
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeLabel {
    type Err = BuildError;

    /// Case-insensitive, so source configuration may use `contains` or `CONTAINS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" => Ok(EdgeLabel::On),
            "CONTAINS" => Ok(EdgeLabel::Contains),
            "ATTACHED" => Ok(EdgeLabel::Attached),
            _ => Err(BuildError::UnknownLabel(s.to_string())),
        }
    }
}

/// A directed, labeled edge between two vertex ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: EdgeLabel,
}

impl Edge {
    /// Create an edge, rejecting empty endpoint ids.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship_type: EdgeLabel,
    ) -> Result<Self, BuildError> {
        let source_id = source_id.into();
        let target_id = target_id.into();
        if source_id.is_empty() {
            return Err(BuildError::EmptyField("source_id"));
        }
        if target_id.is_empty() {
            return Err(BuildError::EmptyField("target_id"));
        }
        Ok(Self {
            source_id,
            target_id,
            relationship_type,
        })
    }

    /// True if `vertex_id` is either endpoint.
    pub fn touches(&self, vertex_id: &str) -> bool {
        self.source_id == vertex_id || self.target_id == vertex_id
    }
}
