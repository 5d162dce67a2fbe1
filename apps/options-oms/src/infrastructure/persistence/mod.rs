//! Persistence Adapters
//!
//! Implementations of the `StateStore` port.

mod json_file;
mod null;
pub mod snapshot;

pub use json_file::JsonFileStateStore;
pub use null::NullStateStore;
pub use snapshot::{SNAPSHOT_SCHEMA_VERSION, StateSnapshot};
