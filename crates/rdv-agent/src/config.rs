use std::path::Path;

use rdv_store::StoreConfig;
use rdv_types::{WorkerId, WorkerName};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};

/// Identity and group settings for one [`Agent`](crate::Agent).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// This worker's id within the group.
    pub worker_id: u32,
    /// This worker's name; must be unique within the group.
    pub worker_name: String,
    /// Fixed group size. `None` selects dynamic registration and disables
    /// barriers.
    pub world_size: Option<u32>,
    /// Namespace for every key this agent touches in the shared store.
    pub prefix: String,
    /// Settings for the in-memory store backend.
    pub store: StoreConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            worker_id: 0,
            worker_name: "worker0".into(),
            world_size: None,
            prefix: "rdv".into(),
            store: StoreConfig::default(),
        }
    }
}

impl AgentConfig {
    /// A configuration for worker `id` named `name` in a group of `world_size`.
    pub fn fixed(id: u32, name: impl Into<String>, world_size: u32) -> Self {
        Self {
            worker_id: id,
            worker_name: name.into(),
            world_size: Some(world_size),
            ..Default::default()
        }
    }

    /// A configuration for worker `id` named `name` joining a group of
    /// unknown size.
    pub fn dynamic(id: u32, name: impl Into<String>) -> Self {
        Self {
            worker_id: id,
            worker_name: name.into(),
            world_size: None,
            ..Default::default()
        }
    }

    pub fn from_toml_str(s: &str) -> AgentResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| AgentError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> AgentResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> AgentResult<String> {
        toml::to_string_pretty(self).map_err(|e| AgentError::Config(e.to_string()))
    }

    pub fn validate(&self) -> AgentResult<()> {
        if self.worker_name.is_empty() {
            return Err(AgentError::Config("worker_name must not be empty".into()));
        }
        if self.worker_name.contains(',') {
            return Err(AgentError::Config(
                "worker_name must not contain ','".into(),
            ));
        }
        if let Some(world_size) = self.world_size {
            if world_size == 0 {
                return Err(AgentError::Config("world_size must be at least 1".into()));
            }
            if self.worker_id >= world_size {
                return Err(AgentError::Config(format!(
                    "worker_id {} is outside a world of size {world_size}",
                    self.worker_id
                )));
            }
        }
        if self.prefix.is_empty() {
            return Err(AgentError::Config("prefix must not be empty".into()));
        }
        Ok(())
    }

    pub fn id(&self) -> WorkerId {
        WorkerId::new(self.worker_id)
    }

    pub fn name(&self) -> WorkerName {
        WorkerName::from(self.worker_name.as_str())
    }
}
