//! Typed form of the raw deploy status payload and its decoder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::DecodeError;
use crate::model::{Deploy, DeployStatus};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(rename = "deploys-status")]
    pub deploys_status: RawDeploysStatus,

    #[serde(rename = "file-sync-storage-status")]
    pub file_sync_storage_status: RawFileSyncStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawDeploysStatus {
    pub new: Vec<RawDeploy>,
    pub queued: Vec<RawDeploy>,
    pub deploying: Vec<RawDeploy>,
    pub failed: Vec<RawDeploy>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawFileSyncStatus {
    pub deployed: Vec<RawDeploy>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawDeploy {
    pub environment: String,

    #[serde(rename = "queued-at", default, skip_serializing_if = "Option::is_none")]
    pub queued_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "deploy-signature", default, skip_serializing_if = "Option::is_none")]
    pub deploy_signature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Map<String, Value>>,
}

/// Deploys from one snapshot, keyed by environment name.
pub type GroupedDeploys = BTreeMap<String, Vec<Deploy>>;

impl RawSnapshot {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Converts every category into typed deploys grouped by environment.
    ///
    /// Categories are read in lifecycle order and records keep their order
    /// within a category.
    pub fn decode(&self) -> Result<GroupedDeploys, DecodeError> {
        let categories: [(&'static str, &[RawDeploy], DeployStatus); 5] = [
            ("new", self.deploys_status.new.as_slice(), DeployStatus::New),
            ("queued", self.deploys_status.queued.as_slice(), DeployStatus::Queued),
            ("deploying", self.deploys_status.deploying.as_slice(), DeployStatus::Deploying),
            ("failed", self.deploys_status.failed.as_slice(), DeployStatus::Failed),
            ("deployed", self.file_sync_storage_status.deployed.as_slice(), DeployStatus::Deployed),
        ];

        let mut grouped = GroupedDeploys::new();
        for (category, raw_deploys, status) in categories {
            tracing::debug!(category, count = raw_deploys.len(), "converting raw deploys");
            for raw in raw_deploys {
                let deploy = raw.to_deploy(category, status)?;
                grouped
                    .entry(deploy.environment.clone())
                    .or_default()
                    .push(deploy);
            }
        }
        Ok(grouped)
    }
}

impl RawDeploy {
    fn to_deploy(&self, category: &'static str, status: DeployStatus) -> Result<Deploy, DecodeError> {
        if self.environment.is_empty() {
            return Err(DecodeError::EmptyEnvironment { category });
        }

        let parse = |field: &'static str, value: &Option<String>| {
            value
                .as_deref()
                .map(|text| {
                    OffsetDateTime::parse(text, &Rfc3339).map_err(|source| DecodeError::Timestamp {
                        category,
                        environment: self.environment.clone(),
                        field,
                        value: text.to_string(),
                        source,
                    })
                })
                .transpose()
        };

        let mut deploy = Deploy::new(self.environment.clone(), status);
        deploy.queued_at = parse("queued-at", &self.queued_at)?;
        deploy.finished_at = parse("date", &self.date)?;
        deploy.sha = self.deploy_signature.clone().unwrap_or_default();
        deploy.error = self.error.clone();

        if deploy.reclassify_failed() && status == DeployStatus::Failed {
            tracing::debug!(environment = %deploy.environment, "failed deploy reclassified as deleted");
        }
        Ok(deploy)
    }
}

#[cfg(test)]
#[path = "tests/snapshot_tests.rs"]
mod tests;
