use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a single deploy record.
///
/// Variants are declared in lifecycle order. `Deployed` and `Failed` share a
/// rank: once finished, deploys are ordered by time alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployStatus {
    New,
    Queued,
    Deploying,
    Deployed,
    Failed,
    Deleted,
    /// Engine-assigned: unfinished, then missing from a later snapshot.
    Ghost,
}

impl DeployStatus {
    pub const ALL: [DeployStatus; 7] = [
        DeployStatus::New,
        DeployStatus::Queued,
        DeployStatus::Deploying,
        DeployStatus::Deployed,
        DeployStatus::Failed,
        DeployStatus::Deleted,
        DeployStatus::Ghost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeployStatus::New => "new",
            DeployStatus::Queued => "queued",
            DeployStatus::Deploying => "deploying",
            DeployStatus::Deployed => "deployed",
            DeployStatus::Failed => "failed",
            DeployStatus::Deleted => "deleted",
            DeployStatus::Ghost => "ghost",
        }
    }

    /// Position in the lifecycle. `Ghost` ranks with the unfinished
    /// statuses it replaces, below `Deployed`.
    pub fn rank(self) -> u8 {
        match self {
            DeployStatus::New => 0,
            DeployStatus::Queued => 1,
            DeployStatus::Deploying | DeployStatus::Ghost => 2,
            DeployStatus::Deployed | DeployStatus::Failed => 3,
            DeployStatus::Deleted => 4,
        }
    }

    /// Deployed, Failed and Deleted. Ghost is not finished: it stays
    /// eligible for matching and for the next unfinished sweep.
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            DeployStatus::Deployed | DeployStatus::Failed | DeployStatus::Deleted
        )
    }
}

impl fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../tests/model/status_tests.rs"]
mod tests;
