use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use super::DeployStatus;

/// Substring of a failed deploy's error message meaning the environment no
/// longer exists in any source.
pub const DELETION_MESSAGE: &str = "cannot be found in any source and will not be deployed.";

/// Which timestamp anchors a record for matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorField {
    QueuedAt,
    FinishedAt,
}

/// One observed or synthesized unit of deploy work for an environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Deploy {
    pub environment: String,
    pub status: DeployStatus,

    #[serde(default)]
    pub sha: String,

    #[serde(default, with = "super::timestamp")]
    pub finished_at: Option<OffsetDateTime>,

    #[serde(default, with = "super::timestamp")]
    pub queued_at: Option<OffsetDateTime>,

    /// Only set on synthesized records that have no real timestamp.
    #[serde(default, with = "super::timestamp")]
    pub estimated_time: Option<OffsetDateTime>,

    #[serde(default)]
    pub error: Option<Map<String, Value>>,
}

impl Deploy {
    pub fn new(environment: impl Into<String>, status: DeployStatus) -> Self {
        Self {
            environment: environment.into(),
            status,
            sha: String::new(),
            finished_at: None,
            queued_at: None,
            estimated_time: None,
            error: None,
        }
    }

    /// Marker for an environment that disappeared from the snapshot.
    pub fn deleted_marker(environment: impl Into<String>, now: OffsetDateTime) -> Self {
        Self {
            estimated_time: Some(now),
            ..Self::new(environment, DeployStatus::Deleted)
        }
    }

    /// The real timestamp this record is matched on: queued time if known,
    /// otherwise finished time. Synthetic records have none.
    pub fn anchor(&self) -> Option<(AnchorField, OffsetDateTime)> {
        if let Some(ts) = self.queued_at {
            Some((AnchorField::QueuedAt, ts))
        } else {
            self.finished_at.map(|ts| (AnchorField::FinishedAt, ts))
        }
    }

    pub fn anchor_field(&self, field: AnchorField) -> Option<OffsetDateTime> {
        match field {
            AnchorField::QueuedAt => self.queued_at,
            AnchorField::FinishedAt => self.finished_at,
        }
    }

    /// Queued time, else finished time, else estimated time. Used for both
    /// matching and history order.
    pub fn reference_time(&self) -> Option<OffsetDateTime> {
        self.queued_at.or(self.finished_at).or(self.estimated_time)
    }

    /// Finished time, else queued time, else estimated time.
    pub fn display_time(&self) -> Option<OffsetDateTime> {
        self.finished_at.or(self.queued_at).or(self.estimated_time)
    }

    pub fn is_synthetic(&self) -> bool {
        self.anchor().is_none()
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_ref()?.get("msg")?.as_str()
    }

    /// Rewrites a Failed record to Deleted when its error says the
    /// environment is gone. Returns whether the record is now Deleted.
    pub fn reclassify_failed(&mut self) -> bool {
        if self.status == DeployStatus::Failed
            && self
                .error_message()
                .is_some_and(|msg| msg.contains(DELETION_MESSAGE))
        {
            self.status = DeployStatus::Deleted;
        }
        self.status == DeployStatus::Deleted
    }

    /// Merges a newer report of the same deploy into this record. Fields the
    /// newer report lacks are kept.
    pub fn update(&mut self, newer: &Deploy) {
        tracing::debug!(
            environment = %self.environment,
            from = %self.status,
            to = %newer.status,
            "updating deploy"
        );
        self.status = newer.status;

        if newer.finished_at.is_some() {
            self.finished_at = newer.finished_at;
        }
        if newer.estimated_time.is_some() {
            self.estimated_time = newer.estimated_time;
        }
        if !newer.sha.is_empty() {
            self.sha.clone_from(&newer.sha);
        }
        if newer.error.is_some() {
            self.error.clone_from(&newer.error);
        }
    }
}

impl fmt::Display for Deploy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reference_time() {
            Some(ts) => write!(f, "{} {} ({})", self.environment, self.status, ts),
            None => write!(f, "{} {} (no time)", self.environment, self.status),
        }
    }
}

#[cfg(test)]
#[path = "../tests/model/deploy_tests.rs"]
mod tests;
