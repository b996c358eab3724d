//! The store: every tracked environment and its reconciled history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::{DecodeError, ReconcileError};
use crate::model::{Deploy, DeployStatus, EnvironmentState};
use crate::snapshot::{GroupedDeploys, RawSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Environment name to history. Mutated only through reconciliation passes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeState {
    #[serde(rename = "Environments", default)]
    environments: BTreeMap<String, EnvironmentState>,
}

impl CodeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EnvironmentState> {
        self.environments.get(name)
    }

    /// Environments ordered by name.
    pub fn environments(&self) -> impl Iterator<Item = &EnvironmentState> {
        self.environments.values()
    }

    /// Decodes a raw JSON payload and applies it. Nothing is mutated when
    /// decoding fails.
    pub fn update_from_raw(&mut self, raw: Value, now: OffsetDateTime) -> Result<(), UpdateError> {
        let snapshot = RawSnapshot::from_value(raw)?;
        self.update_from_snapshot(&snapshot, now)
    }

    pub fn update_from_snapshot(
        &mut self,
        snapshot: &RawSnapshot,
        now: OffsetDateTime,
    ) -> Result<(), UpdateError> {
        let new_deploys = snapshot.decode()?;
        self.apply(new_deploys, now)?;
        Ok(())
    }

    /// One reconciliation pass over already decoded deploys.
    ///
    /// Known environments missing from the batch get a synthetic Deleted
    /// record unless their latest record is already Deleted. An empty batch
    /// therefore marks every live environment as deleted.
    pub fn apply(&mut self, mut new_deploys: GroupedDeploys, now: OffsetDateTime) -> Result<(), ReconcileError> {
        tracing::debug!(
            known = self.environments.len(),
            incoming = new_deploys.len(),
            "reconciling snapshot"
        );

        for (name, environment_state) in self.environments.iter_mut() {
            if let Some(deploys) = new_deploys.remove(name) {
                environment_state.add_deploys(deploys)?;
            } else if environment_state.latest_status() != Some(DeployStatus::Deleted) {
                tracing::debug!(environment = %name, "environment not in the latest status update");
                environment_state.add_deploys(vec![Deploy::deleted_marker(name.clone(), now)])?;
            }
        }

        for (name, deploys) in new_deploys {
            tracing::info!(environment = %name, "tracking new environment");
            let mut environment_state = EnvironmentState::new(name.clone());
            environment_state.add_deploys(deploys)?;
            self.environments.insert(name, environment_state);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/code_state_tests.rs"]
mod tests;
