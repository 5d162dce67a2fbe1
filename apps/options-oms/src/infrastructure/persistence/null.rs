//! No-op state store used when persistence is disabled.

use async_trait::async_trait;

use crate::application::ports::{StateStore, StoreError};
use crate::domain::order_execution::MultiLegOrder;

/// State store that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStateStore;

#[async_trait]
impl StateStore for NullStateStore {
    async fn save(&self, _orders: &[MultiLegOrder]) -> Result<(), StoreError> {
        Ok(())
    }

    async fn load(&self) -> Result<Vec<MultiLegOrder>, StoreError> {
        Ok(Vec::new())
    }
}
