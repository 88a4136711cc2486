//! Canned replies for known demo inputs

use std::collections::HashMap;

const DEMO_RESPONSES: &[(&str, &str)] = &[
    (
        "How’s the weather today?",
        "It's a lovely day! Mostly sunny, 72°F high, 52°F low, gentle NW breeze.",
    ),
    (
        "Explain Python lists",
        "Python lists are containers that hold multiple items. You can add, remove, or change items easily.",
    ),
    (
        "Tell me a joke",
        "Why did the computer go to the doctor? Because it caught a virus! 😄",
    ),
];

/// Read-only exact-match table consulted before the model.
///
/// Keys match byte for byte: no case folding, no whitespace trimming.
#[derive(Debug, Clone, Default)]
pub struct DemoOverrideTable {
    entries: HashMap<String, String>,
}

impl DemoOverrideTable {
    /// Table with the built-in demo entries
    pub fn builtin() -> Self {
        Self::from_pairs(DEMO_RESPONSES.iter().copied())
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn lookup(&self, input: &str) -> Option<&str> {
        self.entries.get(input).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
