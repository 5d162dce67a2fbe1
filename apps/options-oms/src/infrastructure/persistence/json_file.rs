//! JSON file state store.
//!
//! The whole order set is rewritten on every save: serialized to a sibling
//! temp file, then renamed over the target so a crash mid-write leaves the
//! previous snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use super::snapshot::{SNAPSHOT_SCHEMA_VERSION, SnapshotHeader, StateSnapshot};
use crate::application::ports::{StateStore, StoreError};
use crate::domain::order_execution::MultiLegOrder;

/// State store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    /// Create a store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the state file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn save(&self, orders: &[MultiLegOrder]) -> Result<(), StoreError> {
        let snapshot = StateSnapshot::capture(orders, Utc::now());
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::io_error(parent, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes)
            .await
            .map_err(|e| Self::io_error(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))?;

        debug!(path = %self.path.display(), orders = orders.len(), "State saved");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<MultiLegOrder>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No state file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(Self::io_error(&self.path, e)),
        };

        let header: SnapshotHeader = serde_json::from_slice(&bytes)?;
        if header.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: header.schema_version,
                supported: SNAPSHOT_SCHEMA_VERSION,
            });
        }

        let snapshot: StateSnapshot = serde_json::from_slice(&bytes)?;
        let orders = snapshot.into_orders()?;
        info!(
            path = %self.path.display(),
            orders = orders.len(),
            "State loaded"
        );
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::{OptionContract, parse_expiration};
    use crate::domain::order_execution::{
        NewOrderParams, OrderLeg, OrderSide, OrderType, StrategyType, TimeInForce,
    };
    use rust_decimal_macros::dec;

    fn order() -> MultiLegOrder {
        let expiration = parse_expiration("2024-02-16").unwrap();
        MultiLegOrder::new(NewOrderParams {
            strategy_type: StrategyType::BullCallSpread,
            legs: vec![
                OrderLeg::option(
                    OptionContract::call("SPY", dec!(400), expiration).unwrap(),
                    OrderSide::BuyToOpen,
                    1,
                )
                .unwrap(),
                OrderLeg::option(
                    OptionContract::call("SPY", dec!(420), expiration).unwrap(),
                    OrderSide::SellToOpen,
                    1,
                )
                .unwrap(),
            ],
            net_debit_credit: dec!(2.50),
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Day,
            quantity: 1,
            commission_per_contract: dec!(0.65),
            created_at: Utc::now(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("state.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("nested/state.json"));
        let orders = vec![order(), order()];

        store.save(&orders).await.unwrap();
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().await.unwrap(), orders);
    }

    #[tokio::test]
    async fn save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("state.json"));

        store.save(&[order(), order()]).await.unwrap();
        store.save(&[order()]).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn newer_schema_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"schemaVersion": 99, "timestamp": "2024-02-16T00:00:00Z", "orders": []}"#,
        )
        .unwrap();

        let err = JsonFileStateStore::new(path).load().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[tokio::test]
    async fn unversioned_snapshot_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"timestamp":"2024-01-01T00:00:00Z","orders":[]}"#).unwrap();

        let orders = JsonFileStateStore::new(path).load().await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn garbage_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileStateStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let store = JsonFileStateStore::new(blocker.join("state.json"));
        let err = store.save(&[order()]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
