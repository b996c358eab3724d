use super::*;

#[test]
fn finished_statuses() {
    let finished: Vec<DeployStatus> = DeployStatus::ALL
        .into_iter()
        .filter(|s| s.is_finished())
        .collect();
    assert_eq!(
        finished,
        vec![
            DeployStatus::Deployed,
            DeployStatus::Failed,
            DeployStatus::Deleted
        ]
    );
    assert!(!DeployStatus::Ghost.is_finished());
}

#[test]
fn finished_iff_ranked_at_least_deployed() {
    for status in DeployStatus::ALL {
        assert_eq!(
            status.is_finished(),
            status.rank() >= DeployStatus::Deployed.rank(),
            "{status}"
        );
    }
}

#[test]
fn ranks_follow_lifecycle() {
    assert_eq!(DeployStatus::Deployed.rank(), DeployStatus::Failed.rank());
    let lifecycle = [
        DeployStatus::New,
        DeployStatus::Queued,
        DeployStatus::Deploying,
        DeployStatus::Deployed,
        DeployStatus::Deleted,
    ];
    for pair in lifecycle.windows(2) {
        assert!(pair[0].rank() < pair[1].rank(), "{} < {}", pair[0], pair[1]);
    }
    assert!(DeployStatus::Ghost.rank() < DeployStatus::Deployed.rank());
}

#[test]
fn names_serialize_lowercase() {
    for status in DeployStatus::ALL {
        let json = serde_json::to_value(status).expect("serialize status");
        assert_eq!(json, serde_json::json!(status.as_str()));
        let back: DeployStatus = serde_json::from_value(json).expect("deserialize status");
        assert_eq!(back, status);
    }
    assert!(serde_json::from_value::<DeployStatus>(serde_json::json!("finished")).is_err());
}
