//! Caller-facing handle to one pooled session.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use sessmux_core::{Authenticator, ConnectionKey, ServiceTransport};

use super::registry::ConnectionPool;

/// State shared by every handle to the same session. Owned by the pool's
/// registry entry; `count` is the entry's live refcount.
pub(crate) struct ConnectionInner {
    pub(crate) key: ConnectionKey,
    pub(crate) transport: Arc<dyn ServiceTransport>,
    pub(crate) session_token: String,
    pub(crate) authenticator: Box<dyn Authenticator>,
    pub(crate) count: AtomicUsize,
}

/// One holder's handle to a pooled session.
///
/// Every successful [`ConnectionPool::get_connection`] returns a fresh
/// handle; handles to the same key share the underlying session. Call
/// [`close`](Connection::close) when done: dropping a handle without
/// closing it leaks its reference, and the session will never be logged
/// out.
pub struct Connection {
    inner: Arc<ConnectionInner>,
    pool: Arc<ConnectionPool>,
    closed: AtomicBool,
}

impl Connection {
    pub(crate) fn new(inner: Arc<ConnectionInner>, pool: Arc<ConnectionPool>) -> Self {
        Self {
            inner,
            pool,
            closed: AtomicBool::new(false),
        }
    }

    /// Release this holder's reference.
    ///
    /// Idempotent per handle: a second close is a no-op and never
    /// double-decrements. When the last holder closes, the pool evicts the
    /// entry and logs the session out.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.pool.release(&self.inner.key).await;
    }

    /// Live holder count for this session's key; 0 once fully released.
    pub fn connection_count(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// The opaque session token issued at login.
    pub fn session_token(&self) -> &str {
        &self.inner.session_token
    }

    /// The authenticated transport handle bound to this session.
    pub fn transport(&self) -> &Arc<dyn ServiceTransport> {
        &self.inner.transport
    }

    /// Host this session was opened against.
    pub fn hostname(&self) -> &str {
        self.inner.key.hostname()
    }
}

/// Two handles are equal iff they share the same underlying session.
impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Connection {}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("hostname", &self.inner.key.hostname())
            .field("username", &self.inner.key.username())
            .field("connection_count", &self.connection_count())
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}
