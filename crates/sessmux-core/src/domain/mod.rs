//! Core value types.

mod credentials;

pub use credentials::{ConnectionKey, Credentials};
