use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use std::collections::HashMap;
use std::sync::Mutex;

const STATE_TTL_MINUTES: i64 = 10;

/// In-memory store of pending OAuth `state` values.
///
/// A state is issued when the authorization URL is built and must come
/// back unchanged on the callback. Consuming a state removes it, so a
/// replayed callback fails. Entries expire after ten minutes.
pub struct OAuthStateStore {
    pending: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuthStateStore {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Generate and remember a fresh state value.
    pub fn issue(&self) -> String {
        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        let now = Utc::now();
        pending.retain(|_, issued| now - *issued < Duration::minutes(STATE_TTL_MINUTES));
        pending.insert(state.clone(), now);

        state
    }

    /// Validate and remove a state. Returns false for unknown, reused,
    /// or expired states.
    pub fn consume(&self, state: &str) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        match pending.remove(state) {
            Some(issued) => Utc::now() - issued < Duration::minutes(STATE_TTL_MINUTES),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_consume() {
        let store = OAuthStateStore::new();
        let state = store.issue();
        assert_eq!(state.len(), 32);

        assert!(store.consume(&state));
        // A state is single-use.
        assert!(!store.consume(&state));
    }

    #[test]
    fn test_unknown_state_rejected() {
        let store = OAuthStateStore::new();
        assert!(!store.consume("never-issued"));
    }

    #[test]
    fn test_states_are_unique() {
        let store = OAuthStateStore::new();
        assert_ne!(store.issue(), store.issue());
    }
}
