//! Testing utilities and mock implementations
//!
//! Provides a mock instruction processor so the request path can be tested
//! without a live model backend.

pub mod mocks;

pub use mocks::*;
