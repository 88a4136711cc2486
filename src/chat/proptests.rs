//! Property-based tests for the transcript and reply trimming
//!
//! - Appends come back in order, and trimming keeps exactly the newest turns
//! - Trimming never produces more than two sentence boundaries
//! - Text without a sentence boundary is never changed

use super::transcript::{Role, TranscriptStore, Turn};
use super::trimmer::{trim, MAX_SENTENCES};
use proptest::prelude::*;

fn arb_turn() -> impl Strategy<Value = Turn> {
    (any::<bool>(), "[a-zA-Z0-9 .!?]{1,40}").prop_map(|(is_user, content)| {
        let role = if is_user { Role::User } else { Role::Assistant };
        Turn::new(role, content)
    })
}

proptest! {
    #[test]
    fn appends_preserve_order_and_trim_keeps_newest(
        turns in proptest::collection::vec(arb_turn(), 0..60),
        bound in 0usize..40,
    ) {
        let mut store = TranscriptStore::unbounded();
        for turn in &turns {
            store.append(turn.clone()).unwrap();
        }
        let all: Vec<Turn> = store.all().cloned().collect();
        prop_assert_eq!(&all, &turns);

        store.trim_to_bound(bound);
        prop_assert_eq!(store.len(), turns.len().min(bound));

        let survivors: Vec<Turn> = store.all().cloned().collect();
        let expected = &turns[turns.len() - store.len()..];
        prop_assert_eq!(survivors.as_slice(), expected);
    }

    #[test]
    fn trim_keeps_at_most_two_sentences(
        sentences in proptest::collection::vec("[a-zA-Z ]{1,20}", 1..8),
    ) {
        let text = sentences.join(". ");
        let trimmed = trim(&text);
        prop_assert!(trimmed.matches(". ").count() < MAX_SENTENCES);
        if sentences.len() <= MAX_SENTENCES {
            prop_assert_eq!(&trimmed, &text);
        } else {
            prop_assert!(trimmed.ends_with('.'));
            prop_assert!(text.starts_with(trimmed.trim_end_matches('.')));
        }
    }

    #[test]
    fn trim_without_delimiter_is_identity(text in "[a-zA-Z0-9,!?]{0,200}") {
        prop_assert_eq!(trim(&text), text);
    }
}
