use serde_json::json;
use time::macros::datetime;

use super::*;

fn failed_with(msg: &str) -> Deploy {
    let mut deploy = Deploy::new("prod", DeployStatus::Failed);
    deploy.queued_at = Some(datetime!(2024-01-01 00:00:00 UTC));
    deploy.error = json!({"msg": msg, "kind": "puppetlabs.code-manager/deploy-failure"})
        .as_object()
        .cloned();
    deploy
}

#[test]
fn reclassifies_missing_environment_failure() {
    let mut deploy = failed_with(
        "Environment 'prod' cannot be found in any source and will not be deployed.",
    );
    assert!(deploy.reclassify_failed());
    assert_eq!(deploy.status, DeployStatus::Deleted);
}

#[test]
fn keeps_other_failures() {
    let mut deploy = failed_with("r10k exited with 1");
    assert!(!deploy.reclassify_failed());
    assert_eq!(deploy.status, DeployStatus::Failed);

    let mut queued = Deploy::new("prod", DeployStatus::Queued);
    queued.error = json!({"msg": DELETION_MESSAGE}).as_object().cloned();
    assert!(!queued.reclassify_failed());
    assert_eq!(queued.status, DeployStatus::Queued);
}

#[test]
fn update_never_blanks_known_fields() {
    let mut old = Deploy::new("prod", DeployStatus::Deploying);
    old.queued_at = Some(datetime!(2024-01-01 00:00:00 UTC));
    old.sha = "abc123".to_string();

    let mut newer = Deploy::new("prod", DeployStatus::Deployed);
    newer.finished_at = Some(datetime!(2024-01-01 00:05:00 UTC));
    old.update(&newer);

    assert_eq!(old.status, DeployStatus::Deployed);
    assert_eq!(old.sha, "abc123");
    assert_eq!(old.queued_at, Some(datetime!(2024-01-01 00:00:00 UTC)));
    assert_eq!(old.finished_at, Some(datetime!(2024-01-01 00:05:00 UTC)));
    assert_eq!(old.error, None);

    let mut with_sha = Deploy::new("prod", DeployStatus::Deployed);
    with_sha.sha = "def456".to_string();
    with_sha.error = json!({"msg": "late"}).as_object().cloned();
    old.update(&with_sha);
    assert_eq!(old.sha, "def456");
    assert!(old.error.is_some());
    assert_eq!(old.finished_at, Some(datetime!(2024-01-01 00:05:00 UTC)));
}

#[test]
fn reference_and_display_times() {
    let mut deploy = Deploy::new("prod", DeployStatus::Deployed);
    deploy.queued_at = Some(datetime!(2024-01-01 00:00:00 UTC));
    deploy.finished_at = Some(datetime!(2024-01-01 00:05:00 UTC));
    assert_eq!(deploy.reference_time(), deploy.queued_at);
    assert_eq!(deploy.display_time(), deploy.finished_at);
    assert_eq!(
        deploy.anchor(),
        Some((AnchorField::QueuedAt, datetime!(2024-01-01 00:00:00 UTC)))
    );

    let marker = Deploy::deleted_marker("prod", datetime!(2024-02-01 00:00:00 UTC));
    assert!(marker.is_synthetic());
    assert_eq!(marker.reference_time(), Some(datetime!(2024-02-01 00:00:00 UTC)));
}

#[test]
fn persisted_shape_uses_zero_time_for_unset() {
    let mut deploy = Deploy::new("prod", DeployStatus::Queued);
    deploy.queued_at = Some(datetime!(2024-01-01 00:00:00.123456 UTC));

    let value = serde_json::to_value(&deploy).expect("serialize deploy");
    assert_eq!(
        value,
        json!({
            "Environment": "prod",
            "Status": "queued",
            "Sha": "",
            "FinishedAt": "0001-01-01T00:00:00Z",
            "QueuedAt": "2024-01-01T00:00:00.123456Z",
            "EstimatedTime": "0001-01-01T00:00:00Z",
            "Error": null
        })
    );

    let back: Deploy = serde_json::from_value(value).expect("parse deploy");
    assert_eq!(back, deploy);
    assert_eq!(back.finished_at, None);
}
