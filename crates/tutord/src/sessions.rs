//! Session continuity.
//!
//! Sessions live behind the [`SessionStore`] trait; the default store is an
//! in-memory LRU bounded by `max_sessions`, evicting the least recently
//! active session. [`SessionManager`] serializes work per session id with
//! keyed async locks so two requests on the same session never interleave
//! their read-modify-write.

use async_trait::async_trait;
use chrono::Utc;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::{debug, info};
use tutor_shared::{AnalysisContext, Session, TutorError, DEFAULT_HISTORY_CAP};

/// Storage backend for sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, TutorError>;

    async fn put(&self, session: Session) -> Result<(), TutorError>;

    /// Returns true if a session was removed
    async fn delete(&self, session_id: &str) -> Result<bool, TutorError>;

    async fn len(&self) -> Result<usize, TutorError>;
}

/// LRU-bounded in-memory session store
pub struct InMemorySessionStore {
    cache: Mutex<LruCache<String, Session>>,
}

impl InMemorySessionStore {
    /// `capacity` of zero is treated as one
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    /// Reads do not count as activity; only `put` refreshes recency
    async fn get(&self, session_id: &str) -> Result<Option<Session>, TutorError> {
        Ok(self.cache.lock().await.peek(session_id).cloned())
    }

    async fn put(&self, session: Session) -> Result<(), TutorError> {
        let mut cache = self.cache.lock().await;
        if let Some((evicted, _)) = cache.push(session.session_id.clone(), session) {
            // push also returns the old value on a plain update
            if !cache.contains(&evicted) {
                info!("Session store full, evicted least recently active {}", evicted);
            }
        }
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool, TutorError> {
        Ok(self.cache.lock().await.pop(session_id).is_some())
    }

    async fn len(&self) -> Result<usize, TutorError> {
        Ok(self.cache.lock().await.len())
    }
}

/// Session lifecycle on top of a [`SessionStore`]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
    history_cap: usize,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, history_cap: usize) -> Self {
        Self {
            store,
            locks: StdMutex::new(HashMap::new()),
            history_cap: history_cap.max(1),
        }
    }

    pub fn in_memory(max_sessions: usize) -> Self {
        Self::new(
            Arc::new(InMemorySessionStore::new(max_sessions)),
            DEFAULT_HISTORY_CAP,
        )
    }

    /// Resolve the session for a request.
    ///
    /// Known id: reused, `last_active_at` bumped. Unknown id: a fresh session
    /// is created under that id. Missing or blank id: `{user_id}_{unix_secs}`.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        session_id: Option<&str>,
    ) -> Result<Session, TutorError> {
        let now = Utc::now();
        let session_id = match session_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => Session::synthesize_id(user_id, now),
        };

        let lock = self.lock_for(&session_id);
        let result = {
            let _guard = lock.lock().await;
            self.get_or_create_locked(&session_id, user_id).await
        };
        self.release(&session_id, lock);
        result
    }

    async fn get_or_create_locked(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Session, TutorError> {
        let now = Utc::now();
        let session = match self.store.get(session_id).await? {
            Some(mut session) => {
                session.touch(now);
                session
            }
            None => {
                debug!("Creating session {} for {}", session_id, user_id);
                Session::new(session_id, user_id, now)
            }
        };
        self.store.put(session.clone()).await?;
        Ok(session)
    }

    /// Append an analysis context, creating the session if it vanished
    pub async fn append(
        &self,
        session_id: &str,
        user_id: &str,
        context: AnalysisContext,
    ) -> Result<Session, TutorError> {
        let lock = self.lock_for(session_id);
        let result = {
            let _guard = lock.lock().await;
            self.append_locked(session_id, user_id, context).await
        };
        self.release(session_id, lock);
        result
    }

    async fn append_locked(
        &self,
        session_id: &str,
        user_id: &str,
        context: AnalysisContext,
    ) -> Result<Session, TutorError> {
        let now = Utc::now();
        let mut session = self
            .store
            .get(session_id)
            .await?
            .unwrap_or_else(|| Session::new(session_id, user_id, now));
        session.touch(now);
        session.push_history(context, self.history_cap);
        self.store.put(session.clone()).await?;
        Ok(session)
    }

    pub async fn get(&self, session_id: &str) -> Result<Option<Session>, TutorError> {
        self.store.get(session_id).await
    }

    /// Remove a session. Returns false if it did not exist.
    pub async fn clear(&self, session_id: &str) -> Result<bool, TutorError> {
        let lock = self.lock_for(session_id);
        let removed = {
            let _guard = lock.lock().await;
            self.store.delete(session_id).await
        };
        self.release(session_id, lock);
        removed
    }

    pub async fn active_sessions(&self) -> Result<usize, TutorError> {
        self.store.len().await
    }

    fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the per-key lock once no other request holds a handle to it
    fn release(&self, session_id: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(session_id)
            .is_some_and(|l| Arc::strong_count(l) == 1)
        {
            locks.remove(session_id);
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}
