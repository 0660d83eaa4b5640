//! Reusable test harnesses


pub use storage::KeyValueStoreTestSuite;
