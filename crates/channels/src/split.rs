//! Splitting long replies to fit the platform's message size limit.

/// Default maximum characters per reply message.
pub const MAX_CHARS_PER_REPLY_MSG: usize = 1500;

/// Split `text` into consecutive slices of at most `max_chars` characters.
///
/// Slices are cut on char boundaries and concatenate back to `text`.
/// Empty input yields no chunks.
pub fn split_into_shorter_messages(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_into_shorter_messages("hello", 1500), vec!["hello"]);
    }

    #[test]
    fn nine_hundred_chars_at_five_hundred_is_two_chunks() {
        let text = "x".repeat(900);
        let chunks = split_into_shorter_messages(&text, 500);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 500);
        assert_eq!(chunks[1].len(), 400);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let chunks = split_into_shorter_messages(&"ab".repeat(5), 5);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.chars().count() == 5));
    }

    #[test]
    fn concatenation_reconstructs_input() {
        let text = "Grüße aus Köln 🦀\nzweite Zeile — mit Sonderzeichen ✓".repeat(7);
        let chunks = split_into_shorter_messages(&text, 13);
        assert!(chunks.iter().all(|c| c.chars().count() <= 13));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn empty_and_degenerate_limits() {
        assert!(split_into_shorter_messages("", 10).is_empty());
        assert_eq!(split_into_shorter_messages("abc", 0), vec!["a", "b", "c"]);
    }
}
