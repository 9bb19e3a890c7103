use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the in-memory store backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound on how long `get` and `wait` block, in milliseconds.
    /// `None` waits forever.
    pub timeout_ms: Option<u64>,
}

impl StoreConfig {
    /// A configuration whose blocking operations give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout_ms: Some(timeout.as_millis() as u64),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
