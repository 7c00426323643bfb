use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, DeleteParams, ListParams},
    config::KubeConfigOptions,
    Client, Config,
};
use tracing::debug;

use super::ClusterApi;
use crate::{Error, Result};

pub struct KubeClient {
    client: Client,
}

impl KubeClient {
    /// Connect to the cluster, trying credential sources in order: the
    /// in-cluster service account, then the local kubeconfig.
    pub async fn new() -> Result<Self> {
        let config = Self::resolve_config().await?;
        let client = Client::try_from(config).map_err(Error::Kube)?;
        Ok(Self { client })
    }

    async fn resolve_config() -> Result<Config> {
        match Config::incluster() {
            Ok(config) => Ok(config),
            Err(err) => {
                // Local testing outside the cluster.
                debug!(%err, "no in-cluster environment, falling back to kubeconfig");
                Config::from_kubeconfig(&KubeConfigOptions::default())
                    .await
                    .map_err(|e| Error::Config(format!("failed to load kubeconfig: {e}")))
            }
        }
    }

    fn jobs(&self, namespace: &str) -> Api<Job> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ClusterApi for KubeClient {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let jobs: Api<Job> = Api::all(self.client.clone());
        let list = jobs.list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn list_pods(&self) -> Result<Vec<Pod>> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let list = pods.list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn delete_job(&self, namespace: &str, name: &str) -> Result<()> {
        self.jobs(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()> {
        self.pods(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}
