// Ignored-token set: a case-insensitive set of normalized tokens with
// optional scope and expiry.
//
// The set is materialized in memory from the relational store by the
// surrounding layer; the engine never performs I/O here. Mutations build
// a fresh snapshot and swap it atomically -- invalidation is precise
// (on add/remove), never scheduled. Reads fail open: a poisoned lock
// yields the last snapshot rather than swallowing every token.

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use hashbrown::HashMap;

use crate::normalize::normalize;

/// Scope name under which an entry applies to every note.
pub const GLOBAL_SCOPE: &str = "global";

/// One ignore entry for a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredEntry {
    /// `"global"` or a caller-defined scope identifier.
    pub scope: String,
    /// Expiry as epoch seconds; `None` never expires.
    pub expires_at: Option<u64>,
}

/// An immutable view of the ignore set at one point in time.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSnapshot {
    entries: HashMap<String, Vec<IgnoredEntry>>,
}

impl IgnoreSnapshot {
    /// Whether `normalized` is ignored under the given scope at time `now`.
    ///
    /// Global entries apply in every scope; scoped entries apply only when
    /// the query scope matches. Expired entries never apply.
    pub fn contains(&self, normalized: &str, scope: Option<&str>, now: u64) -> bool {
        let Some(entries) = self.entries.get(normalized) else {
            return false;
        };
        entries.iter().any(|entry| {
            let in_scope = entry.scope == GLOBAL_SCOPE || Some(entry.scope.as_str()) == scope;
            let live = entry.expires_at.is_none_or(|expiry| expiry > now);
            in_scope && live
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared, swappable ignore set.
///
/// In-flight classifications hold the `Arc` snapshot they started with;
/// a mutation never mutates entries in place.
#[derive(Debug, Default)]
pub struct IgnoredTokenSet {
    inner: RwLock<Arc<IgnoreSnapshot>>,
}

impl IgnoredTokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set from already-materialized store rows
    /// `(token, scope, expires_at)`. Tokens are normalized on the way in.
    pub fn hydrate<I>(&self, rows: I)
    where
        I: IntoIterator<Item = (String, String, Option<u64>)>,
    {
        let mut entries: HashMap<String, Vec<IgnoredEntry>> = HashMap::new();
        for (token, scope, expires_at) in rows {
            let normalized = normalize(&token);
            if normalized.is_empty() {
                continue;
            }
            entries
                .entry(normalized)
                .or_default()
                .push(IgnoredEntry { scope, expires_at });
        }
        self.swap(IgnoreSnapshot { entries });
    }

    /// Add (or refresh) one entry. Same token + scope replaces the expiry.
    ///
    /// The clone-and-mutate runs under the write lock so concurrent
    /// mutations serialize instead of losing each other's entries.
    pub fn add(&self, token: &str, scope: &str, expires_at: Option<u64>) {
        let normalized = normalize(token);
        if normalized.is_empty() {
            return;
        }
        let mut guard = self.write_guard();
        let mut next = (**guard).clone();
        let entries = next.entries.entry(normalized).or_default();
        match entries.iter_mut().find(|e| e.scope == scope) {
            Some(existing) => existing.expires_at = expires_at,
            None => entries.push(IgnoredEntry {
                scope: scope.to_string(),
                expires_at,
            }),
        }
        *guard = Arc::new(next);
    }

    /// Remove a token, either from one scope or from all scopes.
    pub fn remove(&self, token: &str, scope: Option<&str>) {
        let normalized = normalize(token);
        let mut guard = self.write_guard();
        let mut next = (**guard).clone();
        match scope {
            None => {
                next.entries.remove(&normalized);
            }
            Some(scope) => {
                if let Some(entries) = next.entries.get_mut(&normalized) {
                    entries.retain(|e| e.scope != scope);
                    if entries.is_empty() {
                        next.entries.remove(&normalized);
                    }
                }
            }
        }
        *guard = Arc::new(next);
    }

    /// Current snapshot; a poisoned lock yields its last value (fail open).
    pub fn snapshot(&self) -> Arc<IgnoreSnapshot> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Arc<IgnoreSnapshot>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn swap(&self, snapshot: IgnoreSnapshot) {
        *self.write_guard() = Arc::new(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_normalizes_casing() {
        let set = IgnoredTokenSet::new();
        set.add("MilkoScna", GLOBAL_SCOPE, None);
        assert!(set.snapshot().contains("milkoscna", None, 0));
    }

    #[test]
    fn global_entries_apply_in_any_scope() {
        let set = IgnoredTokenSet::new();
        set.add("hygge", GLOBAL_SCOPE, None);
        assert!(set.snapshot().contains("hygge", Some("note-7"), 0));
    }

    #[test]
    fn scoped_entries_apply_only_in_their_scope() {
        let set = IgnoredTokenSet::new();
        set.add("hygge", "note-7", None);
        let snapshot = set.snapshot();
        assert!(snapshot.contains("hygge", Some("note-7"), 0));
        assert!(!snapshot.contains("hygge", Some("note-8"), 0));
        assert!(!snapshot.contains("hygge", None, 0));
    }

    #[test]
    fn expired_entries_do_not_apply() {
        let set = IgnoredTokenSet::new();
        set.add("hygge", GLOBAL_SCOPE, Some(100));
        let snapshot = set.snapshot();
        assert!(snapshot.contains("hygge", None, 99));
        assert!(!snapshot.contains("hygge", None, 100));
    }

    #[test]
    fn re_adding_refreshes_expiry() {
        let set = IgnoredTokenSet::new();
        set.add("hygge", GLOBAL_SCOPE, Some(100));
        set.add("hygge", GLOBAL_SCOPE, None);
        assert!(set.snapshot().contains("hygge", None, 1_000_000));
    }

    #[test]
    fn remove_scoped_keeps_other_scopes() {
        let set = IgnoredTokenSet::new();
        set.add("hygge", GLOBAL_SCOPE, None);
        set.add("hygge", "note-7", None);
        set.remove("hygge", Some("note-7"));
        let snapshot = set.snapshot();
        assert!(snapshot.contains("hygge", None, 0));
        assert!(snapshot.contains("hygge", Some("note-7"), 0)); // via global
    }

    #[test]
    fn remove_all_scopes_drops_the_token() {
        let set = IgnoredTokenSet::new();
        set.add("hygge", GLOBAL_SCOPE, None);
        set.remove("hygge", None);
        assert!(set.snapshot().is_empty());
    }

    #[test]
    fn hydrate_replaces_everything() {
        let set = IgnoredTokenSet::new();
        set.add("gammel", GLOBAL_SCOPE, None);
        set.hydrate(vec![("Ny".to_string(), GLOBAL_SCOPE.to_string(), None)]);
        let snapshot = set.snapshot();
        assert!(!snapshot.contains("gammel", None, 0));
        assert!(snapshot.contains("ny", None, 0));
    }

    #[test]
    fn concurrent_adds_both_survive() {
        let set = IgnoredTokenSet::new();
        std::thread::scope(|scope| {
            scope.spawn(|| set.add("hygge", GLOBAL_SCOPE, None));
            scope.spawn(|| set.add("kaffe", GLOBAL_SCOPE, None));
        });
        let snapshot = set.snapshot();
        assert!(snapshot.contains("hygge", None, 0));
        assert!(snapshot.contains("kaffe", None, 0));
    }

    #[test]
    fn old_snapshots_survive_mutation() {
        let set = IgnoredTokenSet::new();
        set.add("hygge", GLOBAL_SCOPE, None);
        let before = set.snapshot();
        set.remove("hygge", None);
        assert!(before.contains("hygge", None, 0));
        assert!(!set.snapshot().contains("hygge", None, 0));
    }
}
