//! Bounded, ordered log of conversation turns

use super::ChatError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation. Fields are private so a turn cannot change
/// after it is created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    /// Failure notice shown to the user in place of a reply
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    diagnostic: bool,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Utc::now()),
            diagnostic: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Assistant turn that reports a failure instead of answering
    pub fn diagnostic(content: impl Into<String>) -> Self {
        Self {
            diagnostic: true,
            ..Self::assistant(content)
        }
    }

    /// Same turn without a timestamp
    #[cfg(test)]
    #[must_use]
    pub fn untimed(mut self) -> Self {
        self.timestamp = None;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic
    }
}

/// Transcript of a single session.
///
/// Insertion order is preserved. When a bound is set, the oldest turns are
/// evicted first once [`TranscriptStore::enforce_bound`] runs.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    turns: VecDeque<Turn>,
    bound: Option<usize>,
}

impl TranscriptStore {
    pub fn new(bound: Option<usize>) -> Self {
        Self {
            turns: VecDeque::new(),
            bound,
        }
    }

    #[cfg(test)]
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Add a turn at the end. Only empty content is rejected.
    pub fn append(&mut self, turn: Turn) -> Result<(), ChatError> {
        if turn.content.is_empty() {
            return Err(ChatError::EmptyContent);
        }
        self.turns.push_back(turn);
        Ok(())
    }

    /// All turns in insertion order. Iterating again yields the same sequence.
    pub fn all(&self) -> impl Iterator<Item = &Turn> + Clone + '_ {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    /// Keep only the most recent `n` turns
    pub fn trim_to_bound(&mut self, n: usize) {
        let excess = self.turns.len().saturating_sub(n);
        if excess > 0 {
            self.turns.drain(..excess);
        }
    }

    /// Apply the store's own bound, if any
    pub fn enforce_bound(&mut self) {
        if let Some(n) = self.bound {
            self.trim_to_bound(n);
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn bound(&self) -> Option<usize> {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(store: &TranscriptStore) -> Vec<&str> {
        store.all().map(Turn::content).collect()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = TranscriptStore::unbounded();
        store.append(Turn::user("one")).unwrap();
        store.append(Turn::assistant("two")).unwrap();
        store.append(Turn::user("three")).unwrap();
        assert_eq!(contents(&store), ["one", "two", "three"]);
        assert_eq!(store.last().unwrap().role(), Role::User);
    }

    #[test]
    fn test_append_rejects_empty_content() {
        let mut store = TranscriptStore::unbounded();
        let err = store.append(Turn::user("")).unwrap_err();
        assert!(matches!(err, ChatError::EmptyContent));
        assert!(store.is_empty());
    }

    #[test]
    fn test_whitespace_content_is_literal() {
        let mut store = TranscriptStore::unbounded();
        store.append(Turn::user("   ")).unwrap();
        assert_eq!(contents(&store), ["   "]);
    }

    #[test]
    fn test_all_is_restartable() {
        let mut store = TranscriptStore::unbounded();
        store.append(Turn::user("a")).unwrap();
        store.append(Turn::assistant("b")).unwrap();

        let iter = store.all();
        let first: Vec<_> = iter.clone().map(Turn::content).collect();
        let second: Vec<_> = iter.map(Turn::content).collect();
        assert_eq!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_trim_to_bound_keeps_most_recent() {
        let mut store = TranscriptStore::unbounded();
        for i in 0..5 {
            store.append(Turn::user(format!("turn {i}"))).unwrap();
        }
        store.trim_to_bound(3);
        assert_eq!(contents(&store), ["turn 2", "turn 3", "turn 4"]);
    }

    #[test]
    fn test_trim_to_bound_under_limit_is_noop() {
        let mut store = TranscriptStore::unbounded();
        store.append(Turn::user("only")).unwrap();
        store.trim_to_bound(20);
        assert_eq!(contents(&store), ["only"]);
    }

    #[test]
    fn test_trim_to_zero_empties() {
        let mut store = TranscriptStore::unbounded();
        store.append(Turn::user("gone")).unwrap();
        store.trim_to_bound(0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_enforce_bound_uses_configured_bound() {
        let mut store = TranscriptStore::new(Some(2));
        for c in ["a", "b", "c"] {
            store.append(Turn::user(c)).unwrap();
        }
        assert_eq!(store.len(), 3);
        store.enforce_bound();
        assert_eq!(contents(&store), ["b", "c"]);
    }

    #[test]
    fn test_enforce_bound_unbounded_keeps_everything() {
        let mut store = TranscriptStore::unbounded();
        for i in 0..50 {
            store.append(Turn::user(i.to_string())).unwrap();
        }
        store.enforce_bound();
        assert_eq!(store.len(), 50);
        assert_eq!(store.bound(), None);
    }

    #[test]
    fn test_clear() {
        let mut store = TranscriptStore::new(Some(20));
        store.append(Turn::user("hello")).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.bound(), Some(20));
    }

    #[test]
    fn test_turn_serialization() {
        let json = serde_json::to_value(Turn::assistant("hi").untimed()).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));

        let timed = serde_json::to_value(Turn::user("hi")).unwrap();
        assert!(timed.get("timestamp").is_some());

        let diagnostic = serde_json::to_value(Turn::diagnostic("⚠️ Error: x").untimed()).unwrap();
        assert_eq!(
            diagnostic,
            serde_json::json!({"role": "assistant", "content": "⚠️ Error: x", "diagnostic": true})
        );
    }
}
