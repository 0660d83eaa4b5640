//! Authentication module

pub mod credentials;

pub use credentials::CredentialStore;
