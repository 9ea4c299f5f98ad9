//! Shared test fixtures for adapters and application services.

#[cfg(any(test, feature = "testing"))]
pub mod fixtures;
