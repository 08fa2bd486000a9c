//! Offline phrase completion
//!
//! Completes the current line from a fixed list of phrases: when the end of
//! the line matches the start of a phrase (from a word boundary, ignoring
//! ASCII case), the rest of the phrase is suggested.

use tokio_util::sync::CancellationToken;

use super::{SuggestionFuture, SuggestionProvider};

/// Shortest typed prefix that triggers a completion
const MIN_PREFIX_CHARS: usize = 2;

const DEFAULT_PHRASES: &[&str] = &[
    "the quick brown fox jumps over the lazy dog",
    "thank you for your time",
    "thanks in advance",
    "looking forward to hearing from you",
    "let me know if you have any questions",
    "as soon as possible",
    "in the meantime",
    "on the other hand",
    "for what it's worth",
    "best regards",
    "kind regards",
    "please find attached",
    "hope this helps",
];

#[derive(Debug, Clone)]
pub struct PhrasebookProvider {
    phrases: Vec<String>,
}

impl Default for PhrasebookProvider {
    fn default() -> Self {
        Self::new(DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect())
    }
}

impl PhrasebookProvider {
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }

    /// Completion for the last line of `leading_text`, or an empty string
    ///
    /// The longest matching prefix wins; ties go to the earlier phrase.
    pub fn complete(&self, leading_text: &str) -> String {
        let line = leading_text.rsplit('\n').next().unwrap_or_default();

        let mut best: Option<(usize, &str)> = None;
        for phrase in &self.phrases {
            if let Some((matched, rest)) = match_phrase(line, phrase)
                && best.is_none_or(|(best_len, _)| matched > best_len)
            {
                best = Some((matched, rest));
            }
        }

        best.map(|(_, rest)| rest.to_string()).unwrap_or_default()
    }
}

/// Longest proper prefix of `phrase` that ends `line` at a word boundary
///
/// Returns the matched length in bytes and the remaining phrase text.
fn match_phrase<'a>(line: &str, phrase: &'a str) -> Option<(usize, &'a str)> {
    let boundaries: Vec<usize> = phrase.char_indices().map(|(index, _)| index).collect();

    for &split in boundaries.iter().skip(MIN_PREFIX_CHARS).rev() {
        let prefix = &phrase[..split];
        let Some(start) = line.len().checked_sub(prefix.len()) else {
            continue;
        };
        let Some(tail) = line.get(start..) else {
            continue;
        };
        let at_word_boundary = line[..start]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if at_word_boundary && tail.eq_ignore_ascii_case(prefix) {
            return Some((prefix.len(), &phrase[split..]));
        }
    }
    None
}

impl SuggestionProvider for PhrasebookProvider {
    fn name(&self) -> &str {
        "Phrasebook"
    }

    fn suggest(&self, leading_text: String, _cancel_token: CancellationToken) -> SuggestionFuture {
        let completion = self.complete(&leading_text);
        Box::pin(async move { Ok(completion) })
    }
}
