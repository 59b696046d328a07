//! Bounded conversation history.
//!
//! The store keeps prior exchanges as whole [`Turn`]s — a user entry paired
//! with the assistant entry that answered it. Representing the pair as one
//! value makes the alternating-pair invariant structural: the store can
//! never hold half a turn, and eviction can never split one.
//!
//! The store is append-only except for head truncation, owns no I/O, and is
//! meant to have a single owner for the lifetime of a session.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::message::{Entry, Role};

/// One completed exchange: a user entry and the assistant entry it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: Entry,
    pub assistant: Entry,
}

impl Turn {
    /// Pair a user entry with its assistant response.
    ///
    /// Fails with [`Error::InvalidEntry`] if either entry carries the wrong
    /// role for its position.
    pub fn new(user: Entry, assistant: Entry) -> Result<Self> {
        if user.role != Role::User {
            return Err(Error::InvalidEntry {
                expected: Role::User,
                actual: user.role,
            });
        }
        if assistant.role != Role::Assistant {
            return Err(Error::InvalidEntry {
                expected: Role::Assistant,
                actual: assistant.role,
            });
        }
        Ok(Self { user, assistant })
    }
}

/// An ordered, bounded sequence of completed turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStore {
    turns: VecDeque<Turn>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed (user, assistant) pair at the tail.
    ///
    /// Role validation happens before anything is stored, so a failed
    /// append leaves the store untouched.
    pub fn append(&mut self, user: Entry, assistant: Entry) -> Result<()> {
        let turn = Turn::new(user, assistant)?;
        self.turns.push_back(turn);
        Ok(())
    }

    /// Evict whole turns from the head until the entry count fits `max_len`.
    ///
    /// `max_len` counts entries, not turns. An odd bound is treated as
    /// `max_len - 1`: a partial pair can never be retained, so the odd slot
    /// is unusable by definition.
    pub fn enforce_limit(&mut self, max_len: usize) {
        let effective = max_len - (max_len % 2);
        let mut evicted = 0usize;
        while self.len() > effective {
            self.turns.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, remaining = self.len(), "Trimmed conversation history");
        }
    }

    /// Iterate over entries in chronological order, user before assistant
    /// within each turn.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.turns
            .iter()
            .flat_map(|t| [&t.user, &t.assistant])
    }

    /// The stored turns, oldest first.
    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    /// Number of entries (always even).
    pub fn len(&self) -> usize {
        self.turns.len() * 2
    }

    /// Whether the store holds no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(user: &str, assistant: &str) -> (Entry, Entry) {
        (Entry::user(user), Entry::assistant(assistant))
    }

    fn store_with(pairs: &[(&str, &str)]) -> ConversationStore {
        let mut store = ConversationStore::new();
        for (u, a) in pairs {
            let (u, a) = turn(u, a);
            store.append(u, a).unwrap();
        }
        store
    }

    #[test]
    fn new_store_is_empty() {
        let store = ConversationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.entries().count(), 0);
    }

    #[test]
    fn append_grows_by_two() {
        let mut store = ConversationStore::new();
        let (u, a) = turn("hi", "hello");
        store.append(u, a).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.turns().count(), 1);
    }

    #[test]
    fn append_rejects_swapped_roles() {
        let mut store = ConversationStore::new();
        let err = store
            .append(Entry::assistant("hello"), Entry::user("hi"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEntry { .. }));
        // A failed append must leave the store untouched.
        assert!(store.is_empty());
    }

    #[test]
    fn append_rejects_system_entry() {
        let mut store = ConversationStore::new();
        let err = store
            .append(Entry::user("hi"), Entry::system("preamble"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEntry {
                expected: Role::Assistant,
                actual: Role::System,
            }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn entries_alternate_in_chronological_order() {
        let store = store_with(&[("u1", "a1"), ("u2", "a2")]);
        let texts: Vec<&str> = store.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["u1", "a1", "u2", "a2"]);

        let roles: Vec<Role> = store.entries().map(|e| e.role).collect();
        assert_eq!(roles, [Role::User, Role::Assistant, Role::User, Role::Assistant]);
    }

    #[test]
    fn enforce_limit_evicts_oldest_pair_first() {
        let mut store = store_with(&[("u1", "a1"), ("u2", "a2"), ("u3", "a3")]);
        store.enforce_limit(4);
        let texts: Vec<&str> = store.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["u2", "a2", "u3", "a3"]);
    }

    #[test]
    fn enforce_limit_noop_when_under_bound() {
        let mut store = store_with(&[("u1", "a1")]);
        let before = store.clone();
        store.enforce_limit(10);
        assert_eq!(store, before);
    }

    #[test]
    fn odd_limit_rounds_down_to_whole_pairs() {
        // An odd bound of 5 can hold at most two whole pairs.
        let mut store = store_with(&[("u1", "a1"), ("u2", "a2"), ("u3", "a3")]);
        store.enforce_limit(5);
        assert_eq!(store.len(), 4);
        assert_eq!(store.entries().next().unwrap().text, "u2");
    }

    #[test]
    fn limit_of_one_empties_the_store() {
        let mut store = store_with(&[("u1", "a1")]);
        store.enforce_limit(1);
        assert!(store.is_empty());
    }

    #[test]
    fn length_stays_even_and_bounded_over_many_turns() {
        let limit = 6;
        let mut store = ConversationStore::new();
        for i in 0..20 {
            let (u, a) = turn(&format!("u{i}"), &format!("a{i}"));
            store.append(u, a).unwrap();
            store.enforce_limit(limit);
            assert!(store.len() <= limit);
            assert_eq!(store.len() % 2, 0);
        }
        // The most recent turns survive.
        let last = store.entries().last().unwrap();
        assert_eq!(last.text, "a19");
    }

    #[test]
    fn entries_read_is_idempotent() {
        let store = store_with(&[("u1", "a1"), ("u2", "a2")]);
        let first: Vec<Entry> = store.entries().cloned().collect();
        let second: Vec<Entry> = store.entries().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn turn_constructor_validates_roles() {
        assert!(Turn::new(Entry::user("u"), Entry::assistant("a")).is_ok());
        assert!(Turn::new(Entry::system("s"), Entry::assistant("a")).is_err());
        assert!(Turn::new(Entry::user("u"), Entry::user("u2")).is_err());
    }
}
