//! Sentence-bounded shortening of model output

/// Approximate sentence boundary
const DELIMITER: &str = ". ";

/// Sentences kept by [`trim`]
pub const MAX_SENTENCES: usize = 2;

/// Shorten `text` to its first two sentences.
///
/// Sentences are approximated by splitting on `". "`. Text that splits into
/// more than two pieces keeps the first two and gets a closing period;
/// anything else, including text without the delimiter, is returned as is.
pub fn trim(text: &str) -> String {
    trim_to_sentences(text, MAX_SENTENCES)
}

pub fn trim_to_sentences(text: &str, max: usize) -> String {
    let pieces: Vec<&str> = text.split(DELIMITER).collect();
    if pieces.len() <= max {
        return text.to_string();
    }
    let mut out = pieces[..max].join(DELIMITER);
    out.push('.');
    out
}
