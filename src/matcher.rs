//! Pairwise identity check between a recorded deploy and a new report.

use std::fmt;

use crate::error::ReconcileError;
use crate::model::{AnchorField, Deploy};

/// Yes, No, Maybe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    No,
    Maybe,
    Yes,
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value { Verdict::Yes } else { Verdict::No }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::No => "No",
            Verdict::Maybe => "Maybe",
            Verdict::Yes => "Yes",
        };
        f.write_str(s)
    }
}

/// Decides whether `new` is a later report of the same deploy as `old`.
///
/// `Maybe` means the pair is plausible but not certain; the reconciler breaks
/// those ties. `old` must carry a queued or finished time.
pub fn match_deploys(old: &Deploy, new: &Deploy) -> Result<Verdict, ReconcileError> {
    if old.environment != new.environment {
        tracing::trace!(old = %old.environment, new = %new.environment, "match No: environment differs");
        return Ok(Verdict::No);
    }

    if old.status != new.status && old.status.is_finished() && new.status.is_finished() {
        // A finished deploy cannot move to another finished outcome.
        tracing::trace!(old = %old.status, new = %new.status, "match No: different finished statuses");
        return Ok(Verdict::No);
    }

    let Some((field, old_time)) = old.anchor() else {
        return Err(ReconcileError::MissingAnchor {
            environment: old.environment.clone(),
        });
    };
    let same_time = new.anchor_field(field) == Some(old_time);
    let field_name = match field {
        AnchorField::QueuedAt => "queued at",
        AnchorField::FinishedAt => "finished at",
    };

    if old.status == new.status {
        let verdict = Verdict::from(same_time);
        tracing::trace!(status = %old.status, same_time, field = field_name, "match {verdict}: same status");
        return Ok(verdict);
    }

    if same_time {
        tracing::trace!(old = %old.status, new = %new.status, field = field_name, "match Yes: same time, new stage");
        return Ok(Verdict::Yes);
    }

    if old.status.is_finished() == new.status.is_finished() {
        tracing::trace!(old = %old.status, new = %new.status, "match No: same finishedness without shared time");
        return Ok(Verdict::No);
    }

    if old.status.is_finished() {
        tracing::trace!(old = %old.status, new = %new.status, "match No: finished record cannot take an unfinished update");
        return Ok(Verdict::No);
    }

    if new.reference_time().is_some_and(|new_time| old_time > new_time) {
        tracing::trace!(%old, %new, "match No: old was queued after new");
        return Ok(Verdict::No);
    }

    tracing::trace!(%old, %new, "match Maybe");
    Ok(Verdict::Maybe)
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
