//! Revoked access tokens.
//!
//! Logging out inserts the token's `jti` together with its expiry. Entries are
//! only needed until the token would have expired anyway, so a periodic sweep
//! (see [`crate::background::denylist_sweep`]) drops them after that.

use annotate_core::types::Timestamp;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct TokenDenylist {
    entries: DashMap<String, Timestamp>,
}

impl TokenDenylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke `jti` until `expires_at`.
    pub fn insert(&self, jti: impl Into<String>, expires_at: Timestamp) {
        self.entries.insert(jti.into(), expires_at);
    }

    pub fn contains(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// Drop entries that expired at or before `now`. Returns how many were removed.
    pub fn sweep(&self, now: Timestamp) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn inserted_ids_are_denied() {
        let denylist = TokenDenylist::new();
        denylist.insert("abc", Utc::now() + Duration::hours(1));
        assert!(denylist.contains("abc"));
        assert!(!denylist.contains("def"));
    }

    #[test]
    fn sweep_drops_only_expired() {
        let now = Utc::now();
        let denylist = TokenDenylist::new();
        denylist.insert("old", now - Duration::minutes(1));
        denylist.insert("edge", now);
        denylist.insert("live", now + Duration::minutes(1));

        assert_eq!(denylist.sweep(now), 2);
        assert_eq!(denylist.len(), 1);
        assert!(denylist.contains("live"));
    }

    #[test]
    fn sweep_on_empty_is_noop() {
        let denylist = TokenDenylist::new();
        assert_eq!(denylist.sweep(Utc::now()), 0);
        assert!(denylist.is_empty());
    }
}
