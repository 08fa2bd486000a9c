//! Prompt template generation
//!
//! Builds the continuation prompt sent to model providers and cleans up what
//! comes back so it can be shown directly after the caret.

/// Longest tail of the leading text sent to the model, in characters
const MAX_CONTEXT_CHARS: usize = 2000;

/// Build a continuation prompt for `leading_text`
pub fn build_prompt(leading_text: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are an inline autocomplete engine.\n");
    prompt.push_str("Continue the text below from exactly where it stops.\n");
    prompt.push_str(
        "Reply with the continuation only: no quotes, no explanation, do not repeat the given text.\n",
    );
    prompt.push_str("If the text stops mid-word, finish that word first.\n");
    prompt.push_str("Keep it short: at most one sentence.\n\n");

    prompt.push_str("<text>\n");
    prompt.push_str(context_tail(leading_text));
    prompt.push_str("\n</text>\n");

    prompt
}

/// The last `MAX_CONTEXT_CHARS` characters of `text`
fn context_tail(text: &str) -> &str {
    let count = text.chars().count();
    if count <= MAX_CONTEXT_CHARS {
        return text;
    }
    let skip = count - MAX_CONTEXT_CHARS;
    match text.char_indices().nth(skip) {
        Some((index, _)) => &text[index..],
        None => text,
    }
}

/// Clean a raw model continuation for display after `leading_text`
///
/// Trailing whitespace is dropped. When the leading text already ends in
/// whitespace, leading whitespace of the continuation is dropped too so the
/// ghost text does not double the space.
pub fn normalize_continuation(leading_text: &str, raw: &str) -> String {
    let trimmed = raw.trim_end();
    let leading_ends_in_space = leading_text.chars().next_back().is_some_and(char::is_whitespace);
    if leading_ends_in_space {
        trimmed.trim_start().to_string()
    } else {
        trimmed.to_string()
    }
}
