//! Persistence implementations for the token slot.

mod file_system;
mod token_storage;

pub use file_system::TokioFileSystem;
pub use token_storage::{DEFAULT_NAMESPACE, FileTokenStorage, MemoryTokenStorage};
