//! Anomaly level labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Dominant linguistic label of an assessment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyLevel {
    /// Window behaves like the baseline
    #[default]
    Normal,
    /// One indicator drifting
    SlightlyAnomalous,
    /// Two indicators drifting together
    ModeratelyAnomalous,
    /// Strong, multi-indicator deviation
    StronglyAnomalous,
}

/// Unrecognized label text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown anomaly level: {0}")]
pub struct ParseLevelError(pub String);

impl AnomalyLevel {
    /// All levels, in output-term registration order
    pub const ALL: [AnomalyLevel; 4] = [
        AnomalyLevel::Normal,
        AnomalyLevel::SlightlyAnomalous,
        AnomalyLevel::ModeratelyAnomalous,
        AnomalyLevel::StronglyAnomalous,
    ];

    /// Output term name
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyLevel::Normal => "normal",
            AnomalyLevel::SlightlyAnomalous => "slightly_anomalous",
            AnomalyLevel::ModeratelyAnomalous => "moderately_anomalous",
            AnomalyLevel::StronglyAnomalous => "strongly_anomalous",
        }
    }

    /// Operator-facing explanation
    pub fn description(&self) -> &'static str {
        match self {
            AnomalyLevel::Normal => "Window is consistent with the baseline",
            AnomalyLevel::SlightlyAnomalous => {
                "One indicator shows a moderate deviation, keep watching"
            }
            AnomalyLevel::ModeratelyAnomalous => {
                "Several indicators deviate together, inspect the window"
            }
            AnomalyLevel::StronglyAnomalous => {
                "Strong deviation across indicators, treat as an anomaly"
            }
        }
    }

    /// Level registered at `index` in the output variable
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for AnomalyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnomalyLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|level| level.as_str() == s)
            .copied()
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}
