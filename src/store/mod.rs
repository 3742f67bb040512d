//! Collection store: the encrypted load-mutate-persist core.

mod collection;
mod errors;
mod locks;

pub use collection::CollectionStore;
pub use errors::{StoreError, StoreResult};
pub use locks::LockRegistry;
