pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{Result, StorageError};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use store::{DurableStorage, DurableStorageExt, validate_key};
