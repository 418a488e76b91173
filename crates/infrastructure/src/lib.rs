//! Warden Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the settings file loader.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::ReqwestHttpClient;
pub use config::{SettingsError, SettingsFile};
pub use persistence::{DEFAULT_NAMESPACE, FileTokenStorage, MemoryTokenStorage, TokioFileSystem};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes};
