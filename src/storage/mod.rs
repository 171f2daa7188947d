pub mod backend;
pub mod store;

pub use backend::{KeyValueStore, MemoryStore, SledStore};
pub use store::PersistenceStore;
