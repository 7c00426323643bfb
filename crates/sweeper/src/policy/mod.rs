mod job;
mod pod;

pub use job::{job_expired, TIMEOUT_ANNOTATION};
pub use pod::pod_expired;

/// Age and timeout knobs for a sweep, in seconds.
///
/// A non-positive value disables the corresponding rule.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub success_max_age: i64,
    pub failure_max_age: i64,
    pub timeout_seconds: i64,
}
