//! Concrete transport implementations.

mod http;

pub use http::{HttpTransport, HttpTransportFactory};
