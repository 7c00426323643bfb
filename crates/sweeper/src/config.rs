use clap::Parser;

use crate::policy::Thresholds;

/// Delete finished and stuck Jobs and Pods across all namespaces.
///
/// Meant to be run on a schedule (e.g. a CronJob); every invocation performs
/// a single sweep and exits.
#[derive(Debug, Parser)]
#[command(name = "kube-sweeper", version)]
pub struct Config {
    /// Delete all successfully finished jobs older than this many seconds
    #[arg(long, default_value_t = 3600, allow_negative_numbers = true)]
    pub success_seconds: i64,

    /// Delete all failed finished jobs older than this many seconds
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub failure_seconds: i64,

    /// Kill all jobs running longer than this many seconds
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub timeout_seconds: i64,

    /// Report intended deletions without performing them
    #[arg(long)]
    pub dry_run: bool,
}

impl Config {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            success_max_age: self.success_seconds,
            failure_max_age: self.failure_seconds,
            timeout_seconds: self.timeout_seconds,
        }
    }
}
