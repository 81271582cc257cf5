pub mod memory;

pub use linkvault_core::storage::{RecordStore, Result};
pub use linkvault_core::StorageError;
pub use memory::InMemoryStore;
