//! Reference-counted session pooling.
//!
//! - **ConnectionPool**: registry mapping a connection key to one shared
//!   authenticated session and its live holder count
//! - **Connection**: per-holder handle; closing the last one logs the
//!   session out server-side

mod connection;
mod registry;

pub use connection::Connection;
pub use registry::ConnectionPool;
