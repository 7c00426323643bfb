use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{ContainerStatus, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::ResourceExt;
use tracing::warn;

use super::Thresholds;

const SUCCEEDED: &str = "Succeeded";
const FAILED: &str = "Failed";

/// Decide whether a pod should be deleted.
///
/// Only pods in a terminal phase are ever considered; everything else is
/// kept unconditionally. Returns a human-readable reason for deletion, or
/// `None` to keep the pod.
pub fn pod_expired(thresholds: &Thresholds, now: DateTime<Utc>, pod: &Pod) -> Option<String> {
    let status = pod.status.as_ref()?;
    let phase = status.phase.as_deref()?;
    if phase != SUCCEEDED && phase != FAILED {
        return None;
    }

    // Preempted pods carry no container information; remove them right away.
    if status.reason.as_deref() == Some("Preempting") {
        return Some("preempted".to_string());
    }

    let containers = status.container_statuses.as_deref().unwrap_or_default();
    if containers.is_empty() {
        warn!(pod = %pod.name_any(), "skipping pod without container statuses");
        return None;
    }

    // The most recently finished container determines the pod's age. A
    // value of 0 doubles as "not yet set".
    let mut seconds_since_completion = 0;
    for container in containers {
        if let Some(finished) = finished_at(container) {
            let gap = (now - finished.0).num_seconds();
            if seconds_since_completion == 0 || gap < seconds_since_completion {
                seconds_since_completion = gap;
            }
        }
    }

    if phase == SUCCEEDED
        && thresholds.success_max_age > 0
        && seconds_since_completion > thresholds.success_max_age
    {
        return Some(format!("{seconds_since_completion}s old and succeeded"));
    }
    if phase == FAILED
        && thresholds.failure_max_age > 0
        && seconds_since_completion > thresholds.failure_max_age
    {
        return Some(format!("{seconds_since_completion}s old and failed"));
    }

    None
}

/// Finish time of a container's terminal record. The current state is
/// preferred; a container that moved back to waiting still counts through
/// its last state.
fn finished_at(container: &ContainerStatus) -> Option<&Time> {
    container
        .state
        .as_ref()
        .and_then(|s| s.terminated.as_ref())
        .or_else(|| {
            container
                .last_state
                .as_ref()
                .and_then(|s| s.terminated.as_ref())
        })?
        .finished_at
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn pod(value: serde_json::Value) -> Pod {
        serde_json::from_value(value).expect("pod fixture")
    }

    fn thresholds(success: i64, failure: i64) -> Thresholds {
        Thresholds {
            success_max_age: success,
            failure_max_age: failure,
            timeout_seconds: -1,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_active_pod_is_never_touched() {
        for phase in ["Running", "Pending", "Unknown"] {
            let pod = pod(json!({
                "metadata": { "name": "web-0" },
                "status": { "phase": phase }
            }));
            assert_eq!(pod_expired(&thresholds(1, 1), now(), &pod), None);
        }
    }

    #[test]
    fn test_preempted_pod_is_removed_immediately() {
        // No containers, all thresholds disabled: preemption still wins.
        let pod = pod(json!({
            "metadata": { "name": "low-priority" },
            "status": { "phase": "Failed", "reason": "Preempting" }
        }));
        let reason = pod_expired(&thresholds(-1, -1), now(), &pod);
        assert_eq!(reason.as_deref(), Some("preempted"));
    }

    #[test]
    fn test_terminal_pod_without_containers_is_kept() {
        let pod = pod(json!({
            "metadata": { "name": "evicted" },
            "status": { "phase": "Failed", "reason": "Evicted" }
        }));
        assert_eq!(pod_expired(&thresholds(3600, 3600), now(), &pod), None);
    }

    #[test]
    fn test_succeeded_pod_past_max_age() {
        let pod = pod(json!({
            "metadata": { "name": "batch-report-x1" },
            "status": {
                "phase": "Succeeded",
                "containerStatuses": [
                    { "name": "main", "ready": false, "restartCount": 0, "image": "", "imageID": "",
                      "state": { "terminated": { "exitCode": 0, "finishedAt": "2024-06-01T10:00:00Z" } } }
                ]
            }
        }));
        let reason = pod_expired(&thresholds(3600, -1), now(), &pod);
        assert_eq!(reason.as_deref(), Some("7200s old and succeeded"));
    }

    #[test]
    fn test_succeeded_pod_within_max_age() {
        let pod = pod(json!({
            "metadata": { "name": "batch-report-x1" },
            "status": {
                "phase": "Succeeded",
                "containerStatuses": [
                    { "name": "main", "ready": false, "restartCount": 0, "image": "", "imageID": "",
                      "state": { "terminated": { "exitCode": 0, "finishedAt": "2024-06-01T11:30:00Z" } } }
                ]
            }
        }));
        assert_eq!(pod_expired(&thresholds(3600, -1), now(), &pod), None);
    }

    #[test]
    fn test_failed_pod_past_max_age() {
        let pod = pod(json!({
            "metadata": { "name": "flaky-import-z9" },
            "status": {
                "phase": "Failed",
                "containerStatuses": [
                    { "name": "main", "ready": false, "restartCount": 1, "image": "", "imageID": "",
                      "state": { "terminated": { "exitCode": 1, "finishedAt": "2024-06-01T08:00:00Z" } } }
                ]
            }
        }));
        let reason = pod_expired(&thresholds(3600, 3600), now(), &pod);
        assert_eq!(reason.as_deref(), Some("14400s old and failed"));
    }

    #[test]
    fn test_disabled_rules_keep_terminal_pods() {
        let pod = pod(json!({
            "metadata": { "name": "flaky-import-z9" },
            "status": {
                "phase": "Failed",
                "containerStatuses": [
                    { "name": "main", "ready": false, "restartCount": 1, "image": "", "imageID": "",
                      "state": { "terminated": { "exitCode": 1, "finishedAt": "2020-01-01T00:00:00Z" } } }
                ]
            }
        }));
        assert_eq!(pod_expired(&thresholds(3600, -1), now(), &pod), None);
        assert_eq!(pod_expired(&thresholds(3600, 0), now(), &pod), None);
    }

    #[test]
    fn test_most_recent_container_determines_age() {
        // Finished 9000s and 4000s ago; the fresher one counts.
        let pod = pod(json!({
            "metadata": { "name": "sidecar-batch" },
            "status": {
                "phase": "Succeeded",
                "containerStatuses": [
                    { "name": "main", "ready": false, "restartCount": 0, "image": "", "imageID": "",
                      "state": { "terminated": { "exitCode": 0, "finishedAt": "2024-06-01T09:30:00Z" } } },
                    { "name": "sidecar", "ready": false, "restartCount": 0, "image": "", "imageID": "",
                      "state": { "terminated": { "exitCode": 0, "finishedAt": "2024-06-01T10:53:20Z" } } }
                ]
            }
        }));
        let reason = pod_expired(&thresholds(3600, -1), now(), &pod);
        assert_eq!(reason.as_deref(), Some("4000s old and succeeded"));
    }

    #[test]
    fn test_last_state_is_consulted_when_current_state_is_not_terminated() {
        // Current state is waiting (e.g. CrashLoopBackOff); the previous
        // termination still dates the pod.
        let pod = pod(json!({
            "metadata": { "name": "crashloop-q2" },
            "status": {
                "phase": "Failed",
                "containerStatuses": [
                    { "name": "main", "ready": false, "restartCount": 4, "image": "", "imageID": "",
                      "state": { "waiting": { "reason": "CrashLoopBackOff" } },
                      "lastState": { "terminated": { "exitCode": 1, "finishedAt": "2024-06-01T08:00:00Z" } } }
                ]
            }
        }));
        let reason = pod_expired(&thresholds(-1, 3600), now(), &pod);
        assert_eq!(reason.as_deref(), Some("14400s old and failed"));
    }

    #[test]
    fn test_no_terminated_record_means_no_measurable_age() {
        // Terminal phase but every container only reports waiting: the age
        // stays unset and the pod is kept.
        let pod = pod(json!({
            "metadata": { "name": "stuck" },
            "status": {
                "phase": "Failed",
                "containerStatuses": [
                    { "name": "main", "ready": false, "restartCount": 0, "image": "", "imageID": "",
                      "state": { "waiting": { "reason": "ImagePullBackOff" } } }
                ]
            }
        }));
        assert_eq!(pod_expired(&thresholds(1, 1), now(), &pod), None);
    }
}
