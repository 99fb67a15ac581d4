//! # storage-adapters
//!
//! Filesystem and in-memory implementations of the wall's storage ports:
//! the key-value profile store and the staging area for selected files.

pub mod file_store;
pub mod local_media;
pub mod memory_store;

pub use file_store::FileKeyValueStore;
pub use local_media::LocalMediaStore;
pub use memory_store::MemoryKeyValueStore;
