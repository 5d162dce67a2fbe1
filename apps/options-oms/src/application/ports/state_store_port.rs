//! State Store Port (Driven Port)
//!
//! Durable snapshot of every order the OMS knows about.

use async_trait::async_trait;

use crate::domain::order_execution::MultiLegOrder;

/// State store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("State file I/O error at '{path}': {source}")]
    Io {
        /// Path involved.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Snapshot could not be encoded or decoded.
    #[error("Invalid state snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot written by a newer release.
    #[error("Unsupported snapshot schema version {found} (max supported {supported})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Highest version this build reads.
        supported: u32,
    },

    /// Snapshot decoded but describes an invalid order.
    #[error("Corrupt order record '{order_id}': {message}")]
    CorruptRecord {
        /// Offending order.
        order_id: String,
        /// Details.
        message: String,
    },
}

/// Port for order state persistence.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Replace the stored snapshot with `orders`.
    async fn save(&self, orders: &[MultiLegOrder]) -> Result<(), StoreError>;

    /// Load every stored order in creation order. A missing snapshot loads
    /// as empty.
    async fn load(&self) -> Result<Vec<MultiLegOrder>, StoreError>;
}
