//! The session registry: id to session, guarded by a short mutex.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;
use uuid::Uuid;

use crate::error::SessionError;
use crate::session::{GameConfig, Session};

/// Owns every live session. Transport handlers resolve a game id here and
/// drop the lock before doing anything slow.
#[derive(Default)]
pub struct Registry {
    sessions: Mutex<HashMap<Uuid, Arc<Session>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Create a session for two users and register it.
    pub fn create(&self, white_user: &str, black_user: &str, config: GameConfig) -> Arc<Session> {
        let id = Uuid::new_v4();
        let session = Session::create(id, white_user, black_user, config);
        self.lock().insert(id, Arc::clone(&session));
        session
    }

    /// Look up a session by id.
    pub fn get(&self, id: Uuid) -> Result<Arc<Session>, SessionError> {
        self.lock()
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound { id })
    }

    /// Remove a session from the registry, returning it if present.
    pub fn remove(&self, id: Uuid) -> Option<Arc<Session>> {
        self.lock().remove(&id)
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Return `true` if no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Close every session and clear the registry.
    pub fn shutdown(&self) {
        let sessions: Vec<Arc<Session>> = {
            let mut map = self.lock();
            map.drain().map(|(_, session)| session).collect()
        };
        info!(count = sessions.len(), "shutting down all sessions");
        for session in sessions {
            session.close();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Arc<Session>>> {
        self.sessions.lock().expect("registry mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::error::SessionError;
    use crate::session::GameConfig;
    use crate::subscriber::CloseReason;

    use super::Registry;

    #[tokio::test(start_paused = true)]
    async fn create_and_lookup() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        let session = registry.create("alice", "bob", GameConfig::default());
        assert_eq!(registry.len(), 1);

        let found = registry.get(session.id()).unwrap();
        assert_eq!(found.id(), session.id());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_id_is_not_found() {
        let registry = Registry::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            registry.get(id),
            Err(SessionError::NotFound { id: missing }) if missing == id
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn remove_unregisters() {
        let registry = Registry::new();
        let session = registry.create("alice", "bob", GameConfig::default());
        assert!(registry.remove(session.id()).is_some());
        assert!(registry.get(session.id()).is_err());
        assert!(registry.remove(session.id()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_every_session() {
        let registry = Registry::new();
        let session = registry.create("alice", "bob", GameConfig::default());
        let (alice, _) = session.subscribe("alice").unwrap();

        registry.shutdown();
        assert!(registry.is_empty());
        assert!(session.is_ended());
        assert_eq!(*alice.done.borrow(), Some(CloseReason::Shutdown));
    }
}
