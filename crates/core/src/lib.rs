//! Athena core types and utilities

pub mod config;
pub mod error;
pub mod storage;

#[cfg(feature = "tracing")]
pub mod tracing;

#[cfg(any(test, feature = "tests"))]
pub mod tests;

pub use crate::config::{ApiConfig, Deployment};
pub use error::{CoreError, CoreResult};
pub use storage::{KeyValueStore, MemoryStore};
