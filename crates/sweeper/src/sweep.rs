use chrono::Utc;
use kube::ResourceExt;
use tracing::info;

use crate::kubernetes::ClusterApi;
use crate::policy::{job_expired, pod_expired, Thresholds};
use crate::Result;

/// One full pass over the cluster: jobs first, then pods.
///
/// Deletion announcements go to stdout so an external scheduler's logs show
/// exactly what was removed and why; a failed delete call aborts the sweep
/// and leaves the remaining candidates to the next invocation.
pub struct Sweeper<C> {
    api: C,
    thresholds: Thresholds,
    dry_run: bool,
}

impl<C: ClusterApi> Sweeper<C> {
    pub fn new(api: C, thresholds: Thresholds, dry_run: bool) -> Self {
        Self {
            api,
            thresholds,
            dry_run,
        }
    }

    pub async fn run(&self) -> Result<()> {
        self.sweep_jobs().await?;
        self.sweep_pods().await
    }

    async fn sweep_jobs(&self) -> Result<()> {
        let jobs = self.api.list_jobs().await?;
        let scanned = jobs.len();
        let mut deleted = 0;

        let now = Utc::now();
        for job in jobs {
            if let Some(reason) = job_expired(&self.thresholds, now, &job)? {
                self.announce("Job", &job.name_any(), &reason);
                if !self.dry_run {
                    let namespace = job.namespace().unwrap_or_default();
                    self.api.delete_job(&namespace, &job.name_any()).await?;
                }
                deleted += 1;
            }
        }

        info!(scanned, deleted, "job sweep complete");
        Ok(())
    }

    async fn sweep_pods(&self) -> Result<()> {
        let pods = self.api.list_pods().await?;
        let scanned = pods.len();
        let mut deleted = 0;

        let now = Utc::now();
        for pod in pods {
            if let Some(reason) = pod_expired(&self.thresholds, now, &pod) {
                self.announce("Pod", &pod.name_any(), &reason);
                if !self.dry_run {
                    let namespace = pod.namespace().unwrap_or_default();
                    self.api.delete_pod(&namespace, &pod.name_any()).await?;
                }
                deleted += 1;
            }
        }

        info!(scanned, deleted, "pod sweep complete");
        Ok(())
    }

    fn announce(&self, kind: &str, name: &str, reason: &str) {
        println!("Deleting {kind} {name} ({reason})");
        if self.dry_run {
            println!("** DRY RUN **");
        }
    }
}
