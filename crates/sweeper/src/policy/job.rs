use chrono::{DateTime, Utc};
use k8s_openapi::api::batch::v1::{Job, JobStatus};
use kube::ResourceExt;

use super::Thresholds;
use crate::{Error, Result};

/// Annotation that overrides `--timeout-seconds` for a single job.
pub const TIMEOUT_ANNOTATION: &str = "cleanup-timeout";

/// Decide whether a job should be deleted.
///
/// Returns `Ok(None)` to keep the job, or `Ok(Some(reason))` with a
/// human-readable reason to delete it. Completion-age rules are checked
/// before the running timeout, so a job matching both is reported through
/// the completion rule.
pub fn job_expired(
    thresholds: &Thresholds,
    now: DateTime<Utc>,
    job: &Job,
) -> Result<Option<String>> {
    let status = job.status.as_ref();
    let succeeded = status.and_then(|s| s.succeeded).unwrap_or(0) > 0;
    let failed = status.and_then(|s| s.failed).unwrap_or(0) > 0;
    let empty_status = status.map_or(true, |s| *s == JobStatus::default());

    let completion_time = if succeeded || failed {
        status.and_then(|s| s.completion_time.as_ref()).map(|t| t.0)
    } else if empty_status {
        // An admission webhook can block the job's pods from ever being
        // created, leaving the status empty. creationTimestamp stands in
        // for the completion time so those jobs still age out.
        job.metadata.creation_timestamp.as_ref().map(|t| t.0)
    } else {
        None
    };

    if let Some(completed) = completion_time {
        let age = (now - completed).num_seconds();
        if succeeded && thresholds.success_max_age > 0 && age > thresholds.success_max_age {
            return Ok(Some(format!("{age}s old and succeeded")));
        }
        // Either the job reported failed pods or it never got a status and
        // was aged by creationTimestamp. Both count as failures.
        if !succeeded && thresholds.failure_max_age > 0 && age > thresholds.failure_max_age {
            return Ok(Some(format!("{age}s old and failed")));
        }
    }

    if let Some(start) = status.and_then(|s| s.start_time.as_ref()) {
        let running = (now - start.0).num_seconds();
        let timeout = effective_timeout(thresholds.timeout_seconds, job)?;
        if timeout > 0 && running > timeout {
            return Ok(Some(format!("timeout ({running}s running)")));
        }
    }

    Ok(None)
}

fn effective_timeout(default: i64, job: &Job) -> Result<i64> {
    match job.annotations().get(TIMEOUT_ANNOTATION) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Annotation(format!("{raw:?} on job {}", job.name_any()))),
        None => Ok(default),
    }
}
