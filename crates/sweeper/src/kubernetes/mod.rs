mod client;

pub use client::KubeClient;

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;

/// The slice of the Kubernetes API this tool consumes: list the candidate
/// kinds across every namespace, delete a single object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_jobs(&self) -> crate::Result<Vec<Job>>;
    async fn list_pods(&self) -> crate::Result<Vec<Pod>>;
    async fn delete_job(&self, namespace: &str, name: &str) -> crate::Result<()>;
    async fn delete_pod(&self, namespace: &str, name: &str) -> crate::Result<()>;
}
