//! # Civic Store
//!
//! Single-table persistence for the civic assistant.
//!
//! ## Architecture
//!
//! ```text
//! Records (garbage routes, park reservations, forms)
//!     │
//!     ├──> civic-keyspace::EntityKey / ScanPrefix
//!     │      └─> (pk, sk) and (pk, sk_prefix)
//!     │
//!     └──> dyn KvStore
//!            ├─> MemoryStore     (process-local)
//!            ├─> JsonFileStore   (pretty JSON on disk)
//!            └─> DynamoDbStore   (civic-aws)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use civic_store::{MemoryStore, Records};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> civic_store::Result<()> {
//!     let records = Records::new(Arc::new(MemoryStore::new()));
//!     records.put_garbage_route("A1", "Yellow").await?;
//!     assert_eq!(records.garbage_route("A1").await?, "Yellow");
//!     Ok(())
//! }
//! ```

mod error;
mod file_store;
mod records;
mod store;
mod types;

pub use error::{Result, StoreError};
pub use file_store::JsonFileStore;
pub use records::Records;
pub use store::{KvStore, MemoryStore};
pub use types::{
    FieldDefinition, FieldValue, FormVersionRecord, Item, Reservation, TemplateField,
    VersionStatus,
};

// Re-export key types for convenience
pub use civic_keyspace::{EntityKey, KeyError, KeyPrefix, ScanPrefix, StorageKey};
