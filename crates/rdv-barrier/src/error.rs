use rdv_store::StoreError;

/// Errors produced by the call-count barrier.
#[derive(Debug, thiserror::Error)]
pub enum BarrierError {
    /// A barrier needs at least one participant.
    #[error("barrier world size must be at least 1, got {0}")]
    InvalidWorldSize(u32),

    /// The aggregated call count could not be read back as an integer. The
    /// store is corrupt or workers derived mismatched session keys.
    #[error("protocol corruption at {key:?}: expected an integer, found {raw:?}")]
    ProtocolCorruption { key: String, raw: String },

    /// The coordination store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias used throughout the barrier crate.
pub type BarrierResult<T> = std::result::Result<T, BarrierError>;
