pub mod config;
pub mod kubernetes;
pub mod policy;
pub mod sweep;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid cleanup-timeout annotation: {0}")]
    Annotation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
