//! Local key-point extraction. Independent of the remote summary: key
//! points always come from the full transcription, even though the remote
//! model only ever sees a truncated prefix.

/// Minimum trimmed sentence length for a key point, in characters.
pub const MIN_KEY_POINT_CHARS: usize = 20;

/// At most this many key points are kept.
pub const MAX_KEY_POINTS: usize = 5;

/// Split text into sentences ending in a run of `.`, `!`, or `?`.
///
/// Each sentence keeps its terminal punctuation. Trailing text without a
/// terminator is not a sentence and is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_terminal = false;

    for (i, c) in text.char_indices() {
        let terminal = matches!(c, '.' | '!' | '?');

        match start {
            // Terminators before any sentence content belong to no sentence
            None if terminal => {}
            None => start = Some(i),
            Some(s) => {
                if terminal {
                    in_terminal = true;
                } else if in_terminal {
                    sentences.push(&text[s..i]);
                    start = Some(i);
                    in_terminal = false;
                }
            }
        }
    }

    if let (Some(s), true) = (start, in_terminal) {
        sentences.push(&text[s..]);
    }

    sentences
}

/// Key points: sentences of trimmed length ≥ [`MIN_KEY_POINT_CHARS`], first
/// [`MAX_KEY_POINTS`] in original order, trimmed.
pub fn extract_key_points(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|s| s.trim().chars().count() >= MIN_KEY_POINT_CHARS)
        .take(MAX_KEY_POINTS)
        .map(|s| s.trim().to_string())
        .collect()
}
