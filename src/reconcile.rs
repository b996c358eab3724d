//! Merging a batch of new reports into one environment's history.

use crate::error::ReconcileError;
use crate::matcher::{Verdict, match_deploys};
use crate::model::{Deploy, DeployStatus, EnvironmentState, sort_newest_first};

impl EnvironmentState {
    /// Merges newly observed deploys for this environment into its history.
    ///
    /// Each new report updates the first history record that is certainly the
    /// same deploy, otherwise the first plausible one (first fit, not best
    /// fit), otherwise it is appended. Synthetic markers (no queued or
    /// finished time) neither take nor give updates; they are appended as-is.
    /// Unfinished history records nothing claimed become `Ghost`.
    pub fn add_deploys(&mut self, mut new_deploys: Vec<Deploy>) -> Result<(), ReconcileError> {
        tracing::debug!(
            environment = %self.environment,
            history = self.deploys.len(),
            incoming = new_deploys.len(),
            "adding deploys"
        );

        self.sort_newest_first();
        sort_newest_first(&mut new_deploys);

        // Synthetic markers have no anchor and never take updates.
        let mut matched: Vec<bool> = self.deploys.iter().map(Deploy::is_synthetic).collect();
        let mut to_add = Vec::new();

        for new_deploy in new_deploys {
            // Unmatched, or a marker would turn vanished unfinished deploys
            // into Deleted instead of Ghost.
            if new_deploy.is_synthetic() {
                to_add.push(new_deploy);
                continue;
            }

            let mut possible = None;
            let mut found = None;
            for (i, old_deploy) in self.deploys.iter().enumerate() {
                if matched[i] {
                    continue;
                }
                match match_deploys(old_deploy, &new_deploy)? {
                    Verdict::Yes => {
                        found = Some(i);
                        break;
                    }
                    Verdict::Maybe if possible.is_none() => possible = Some(i),
                    _ => {}
                }
            }

            if found.is_none() && possible.is_some() {
                tracing::trace!(environment = %self.environment, "using first possible match");
            }
            match found.or(possible) {
                Some(i) => {
                    self.deploys[i].update(&new_deploy);
                    matched[i] = true;
                }
                None => to_add.push(new_deploy),
            }
        }

        for (deploy, matched) in self.deploys.iter_mut().zip(&matched) {
            if !matched && !deploy.status.is_finished() {
                tracing::debug!(environment = %deploy.environment, from = %deploy.status, "marking ghost deploy");
                deploy.status = DeployStatus::Ghost;
            }
        }

        self.deploys.extend(to_add);
        self.sort_newest_first();
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
