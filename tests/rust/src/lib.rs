//! Shared helpers for sessmux integration tests.

pub mod mocks;
