/// Flattens extracted text before it is sent to the model.
///
/// NUL characters are dropped, every whitespace run (newlines included)
/// becomes one ASCII space, and the ends are trimmed. Line structure is lost.
/// Idempotent.
pub fn preprocess(text: &str) -> String {
    text.replace('\0', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
