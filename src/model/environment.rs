use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::{Deploy, DeployStatus};

/// An environment's deploy history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentState {
    pub environment: String,

    #[serde(default)]
    pub deploys: Vec<Deploy>,
}

impl EnvironmentState {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            deploys: Vec::new(),
        }
    }

    /// The record with the greatest reference time; the first one wins ties.
    pub fn latest(&self) -> Option<&Deploy> {
        self.deploys.iter().reduce(|best, deploy| {
            if deploy.reference_time() > best.reference_time() {
                deploy
            } else {
                best
            }
        })
    }

    pub fn latest_status(&self) -> Option<DeployStatus> {
        self.latest().map(|deploy| deploy.status)
    }

    pub fn sort_newest_first(&mut self) {
        sort_newest_first(&mut self.deploys);
    }
}

/// Stable sort by reference time, most recent first. Records without any
/// time go last.
pub fn sort_newest_first(deploys: &mut [Deploy]) {
    deploys.sort_by_key(|deploy| Reverse(deploy.reference_time()));
}
