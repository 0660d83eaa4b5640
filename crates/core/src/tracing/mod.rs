//! Tracing setup for native hosts
//!
//! Browser builds route events to the console through
//! `athena_frontend_common::logging` instead.

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod init;

#[cfg(not(target_arch = "wasm32"))]
pub use self::config::InstrumentationConfig;
#[cfg(not(target_arch = "wasm32"))]
pub use self::init::{init_default, init_tracing};
