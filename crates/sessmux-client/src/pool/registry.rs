//! Process-wide registry of shared authenticated sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use sessmux_core::{Authenticator, ClientError, ConnectionKey, Credentials, TransportFactory};

use super::connection::{Connection, ConnectionInner};
use crate::auth::login;

/// Maps a connection key (host + credentials) to one shared session.
///
/// Explicitly constructed and dependency-injected; the composition root
/// decides its lifetime (typically one per process, held in an `Arc`).
///
/// A single pool-wide lock serializes lookups and session creation, so a
/// slow login handshake for one key delays acquisitions for every other
/// key. Logout on eviction runs outside the lock.
pub struct ConnectionPool {
    factory: Arc<dyn TransportFactory>,
    entries: Mutex<HashMap<ConnectionKey, Arc<ConnectionInner>>>,
}

impl ConnectionPool {
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self {
            factory,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Join the session for this key, or create it.
    ///
    /// Cache hit: increments the holder count and returns a handle to the
    /// same shared session; `authenticator` is not consulted. Cache miss:
    /// builds a transport for `hostname`, performs the login, applies the
    /// issued token to the transport, and inserts the entry with count 1.
    /// A failed login leaves the registry untouched.
    pub async fn get_connection(
        self: &Arc<Self>,
        hostname: &str,
        username: &str,
        password: &str,
        access_token: &str,
        authenticator: Box<dyn Authenticator>,
    ) -> Result<Connection, ClientError> {
        let credentials = Credentials::new(username, password, access_token);
        let key = ConnectionKey::new(hostname, &credentials);

        let mut entries = self.entries.lock().await;

        if let Some(inner) = entries.get(&key) {
            let count = inner.count.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(
                "[ConnectionPool] Joined session for {}@{} ({} holders)",
                username, hostname, count
            );
            return Ok(Connection::new(Arc::clone(inner), Arc::clone(self)));
        }

        info!("[ConnectionPool] Opening session for {}@{}", username, hostname);
        let transport = self.factory.create(hostname)?;
        let session_token = authenticator.login(&transport, &credentials).await?;
        login::set_authentication_token(transport.as_ref(), &session_token);

        let inner = Arc::new(ConnectionInner {
            key: key.clone(),
            transport,
            session_token,
            authenticator,
            count: AtomicUsize::new(1),
        });
        entries.insert(key, Arc::clone(&inner));

        Ok(Connection::new(inner, Arc::clone(self)))
    }

    /// Release one reference to `key`; evicts and logs out on the last one.
    ///
    /// Called by [`Connection::close`]. A key with no entry (already
    /// evicted) is a no-op; the count never underflows.
    pub(crate) async fn release(&self, key: &ConnectionKey) {
        let evicted = {
            let mut entries = self.entries.lock().await;
            match entries.get(key) {
                None => None,
                Some(inner) => {
                    let remaining = inner.count.fetch_sub(1, Ordering::SeqCst) - 1;
                    debug!(
                        "[ConnectionPool] Released session for {}@{} ({} holders)",
                        key.username(),
                        key.hostname(),
                        remaining
                    );
                    if remaining == 0 {
                        entries.remove(key)
                    } else {
                        None
                    }
                }
            }
        };

        // Logout runs outside the registry lock; failures are observable
        // but never block eviction.
        if let Some(inner) = evicted {
            info!(
                "[ConnectionPool] Closing session for {}@{}",
                key.username(),
                key.hostname()
            );
            if let Err(e) = inner.authenticator.logout(&inner.transport).await {
                warn!(
                    "[ConnectionPool] Logout failed for {}@{}: {}",
                    key.username(),
                    key.hostname(),
                    e
                );
            }
        }
    }

    /// Number of live entries.
    pub async fn active_sessions(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Test isolation: drop every entry without logging anything out.
    #[cfg(any(test, feature = "test-util"))]
    pub async fn reset(&self) {
        self.entries.lock().await.clear();
    }
}
