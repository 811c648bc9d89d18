pub mod error;
pub mod memory;
pub mod mongo;
pub mod sync;
pub mod traits;

use std::sync::Arc;

use tracing::info;

pub use error::{StorageError, StoreError, SyncPhase};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use sync::{CollectionSynchronizer, SyncResult};
pub use traits::DocumentStore;

/// Which backend a run writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

/// Open the destination store once for the whole run.
pub async fn open_store(
    config: &roster_core::Config,
    kind: StoreKind,
) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match kind {
        StoreKind::Mongo => {
            let store = MongoStore::connect(&config.mongo).await?;
            Ok(Arc::new(store))
        }
        StoreKind::Memory => {
            info!("Storage: in-memory backend, nothing will be persisted");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
