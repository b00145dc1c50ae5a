//! Deal pipeline stages.

use serde::{Deserialize, Serialize};

/// Pipeline stage of a deal.
///
/// Serialized in kebab-case (`closed-won`) to match the `stage_c` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DealStage {
    #[default]
    Lead,
    Qualified,
    Proposal,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    /// All stages in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Lead,
        Self::Qualified,
        Self::Proposal,
        Self::ClosedWon,
        Self::ClosedLost,
    ];

    /// Get the stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::ClosedWon => "closed-won",
            Self::ClosedLost => "closed-lost",
        }
    }

    /// Get a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Qualified => "Qualified",
            Self::Proposal => "Proposal",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }

    /// Whether the deal has left the pipeline.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DealStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("invalid deal stage: {s}"))
    }
}
