//! In-memory scan-session store with TTL eviction.
//!
//! # Purpose
//! Holds one `ScanSession` per operator scan between the scan call and the
//! confirm/cancel call, keyed by a UUID handed back to the client.
//!
//! # Key invariants
//! - Entries expire `ttl` after creation; expired entries are dropped lazily
//!   on access, there is no sweeper task.
//! - All mutation goes through `with_session` so phase transitions stay
//!   behind the map's entry lock.
use dashmap::DashMap;
use lanyard_checkin::ScanSession;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug)]
struct StoredSession {
    session: ScanSession,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct ScanSessionStore {
    ttl: Duration,
    sessions: DashMap<Uuid, StoredSession>,
}

impl ScanSessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: DashMap::new(),
        }
    }

    /// Stores a session and returns the id the client will confirm with.
    pub fn insert(&self, session: ScanSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            StoredSession {
                session,
                expires_at: Instant::now() + self.ttl,
            },
        );
        id
    }

    /// Runs `apply` on the live session under the entry lock.
    ///
    /// Returns `None` for unknown ids and for entries past their TTL, which
    /// are removed on the way out.
    pub fn with_session<T>(&self, id: &Uuid, apply: impl FnOnce(&mut ScanSession) -> T) -> Option<T> {
        // The entry guard must be released before removing, so the expiry
        // check cannot call `remove` inline.
        let expired = match self.sessions.get_mut(id) {
            Some(mut entry) => {
                if entry.expires_at > Instant::now() {
                    return Some(apply(&mut entry.session));
                }
                true
            }
            None => false,
        };
        if expired {
            self.sessions.remove(id);
        }
        None
    }

    pub fn remove(&self, id: &Uuid) {
        self.sessions.remove(id);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanyard_checkin::ScanPhase;

    #[test]
    fn insert_and_mutate_round_trip() {
        let store = ScanSessionStore::new(Duration::from_secs(60));
        let mut session = ScanSession::new();
        session.start_scan().expect("start");
        let id = store.insert(session);

        let phase = store.with_session(&id, |session| session.phase());
        assert_eq!(phase, Some(ScanPhase::Scanning));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_id_is_none() {
        let store = ScanSessionStore::new(Duration::from_secs(60));
        assert!(store.with_session(&Uuid::new_v4(), |_| ()).is_none());
    }

    #[test]
    fn expired_entries_are_dropped_on_access() {
        let store = ScanSessionStore::new(Duration::from_millis(0));
        let id = store.insert(ScanSession::new());

        std::thread::sleep(Duration::from_millis(5));
        assert!(store.with_session(&id, |_| ()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_clears_the_entry() {
        let store = ScanSessionStore::new(Duration::from_secs(60));
        let id = store.insert(ScanSession::new());
        store.remove(&id);
        assert!(store.with_session(&id, |_| ()).is_none());
    }
}
