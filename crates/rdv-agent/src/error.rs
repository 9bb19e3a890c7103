use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("world size is unknown; barriers need a fixed group size")]
    UnknownWorldSize,

    #[error("worker has not registered yet")]
    NotRegistered,

    #[error("no worker named {0}")]
    UnknownWorker(String),

    #[error("registry error: {0}")]
    Registry(#[from] rdv_registry::RegistryError),

    #[error("barrier error: {0}")]
    Barrier(#[from] rdv_barrier::BarrierError),
}

pub type AgentResult<T> = Result<T, AgentError>;
