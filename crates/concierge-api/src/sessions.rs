//! Live chat sessions held by the REST server.
//!
//! Sessions opened over HTTP stay here until the visitor closes them, they
//! sit idle past the configured timeout, or the server shuts down. Every
//! exit path goes through `ChatSession::close`, so a summary is still
//! written for each conversation that had an exchange.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use concierge_core::chat::repository::ChatLogRepository;
use concierge_core::chat::session::ChatSession;

/// Returned when opening a session would exceed the live-session cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryFull {
    pub max_live: usize,
}

/// Bounded map of open chat sessions.
pub struct SessionRegistry<R: ChatLogRepository + 'static> {
    sessions: DashMap<Uuid, Arc<ChatSession<R>>>,
    live: AtomicUsize,
    max_live: usize,
}

impl<R: ChatLogRepository + 'static> SessionRegistry<R> {
    pub fn new(max_live: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            live: AtomicUsize::new(0),
            max_live,
        }
    }

    /// Register a freshly opened session, unless the cap is reached.
    pub fn insert(&self, session: Arc<ChatSession<R>>) -> Result<(), RegistryFull> {
        self.live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_live).then_some(n + 1)
            })
            .map_err(|_| RegistryFull {
                max_live: self.max_live,
            })?;
        self.sessions.insert(session.id(), session);
        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<ChatSession<R>>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, id: &Uuid) -> Option<Arc<ChatSession<R>>> {
        let (_, session) = self.sessions.remove(id)?;
        self.live.fetch_sub(1, Ordering::SeqCst);
        Some(session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Close and drop sessions with no activity for at least `idle_for`.
    ///
    /// Sessions waiting on a model reply are left alone. Returns the
    /// summarization handles of the sessions that had an exchange.
    pub fn close_idle(&self, idle_for: chrono::Duration, now: DateTime<Utc>) -> Vec<JoinHandle<()>> {
        // Collect first: removing while iterating would deadlock the shard.
        let stale: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| {
                let session = entry.value();
                !session.is_awaiting_reply() && now - session.last_activity_at() >= idle_for
            })
            .map(|entry| *entry.key())
            .collect();

        if !stale.is_empty() {
            info!(count = stale.len(), "Closing idle chat sessions");
        }
        stale
            .iter()
            .filter_map(|id| self.remove(id))
            .filter_map(|session| session.close())
            .collect()
    }

    /// Close and drop every session, e.g. at shutdown.
    pub fn close_all(&self) -> Vec<JoinHandle<()>> {
        let ids: Vec<Uuid> = self.sessions.iter().map(|entry| *entry.key()).collect();
        ids.iter()
            .filter_map(|id| self.remove(id))
            .filter_map(|session| session.close())
            .collect()
    }

    /// Periodically close sessions idle for longer than `idle_for`.
    ///
    /// Summaries of swept sessions run detached; the returned handle only
    /// controls the sweep loop itself.
    pub fn spawn_idle_sweeper(self: Arc<Self>, idle_for: Duration) -> JoinHandle<()> {
        let period = (idle_for / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
        let idle_for = chrono::Duration::from_std(idle_for).unwrap_or(chrono::Duration::MAX);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if self.is_empty() {
                    continue;
                }
                let swept = self.close_idle(idle_for, Utc::now());
                debug!(summaries = swept.len(), live = self.len(), "Idle session sweep");
            }
        })
    }
}
