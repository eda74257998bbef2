//! Boundary-aware text chunking
//!
//! Splits raw document text into overlapping segments of bounded length,
//! preferring to end a chunk at a sentence-terminating period or newline
//! when one falls in the second half of the window.

/// Split `text` into overlapping, trimmed, non-empty chunks.
///
/// `chunk_size` is a target maximum length in characters; consecutive
/// chunks repeat `overlap` characters. The scan is left to right: when the
/// candidate window ends before the end of the text, the last `.` or `\n`
/// inside the window becomes the chunk end if it lies past the window
/// midpoint. Text shorter than `chunk_size` yields exactly one chunk.
///
/// Pure function of its inputs.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if chunk_size == 0 || text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let overlap = overlap.min(chunk_size - 1);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let window_end = (start + chunk_size).min(chars.len());
        let mut end = window_end;

        if window_end < chars.len() {
            if let Some(pos) = chars[start..window_end]
                .iter()
                .rposition(|&c| c == '.' || c == '\n')
            {
                let break_at = start + pos;
                if break_at > start + chunk_size / 2 {
                    end = break_at + 1;
                }
            }
        }

        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end >= chars.len() {
            break;
        }

        // The boundary search can shrink the window below the overlap;
        // never move backwards.
        start = (end - overlap).max(start + 1);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2500 characters of prose with a period every 80 characters
    fn prose_2500() -> String {
        let sentence: String = "a".repeat(79) + ".";
        let mut text = sentence.repeat(31);
        text.push_str(&"a".repeat(20));
        assert_eq!(text.chars().count(), 2500);
        text
    }

    #[test]
    fn short_text_yields_one_chunk() {
        let chunks = chunk_text("just a short note", 1000, 100);
        assert_eq!(chunks, vec!["just a short note".to_string()]);
    }

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        assert!(chunk_text("", 1000, 100).is_empty());
        assert!(chunk_text("   \n\n  ", 1000, 100).is_empty());
    }

    #[test]
    fn prose_splits_into_three_sentence_bounded_chunks() {
        let chunks = chunk_text(&prose_2500(), 1000, 100);

        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
        }
        // Interior chunks end at a sentence boundary
        assert!(chunks[0].ends_with('.'));
        assert!(chunks[1].ends_with('.'));
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let chunks = chunk_text(&prose_2500(), 1000, 100);

        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(50).collect::<String>();
            let tail: String = tail.chars().rev().collect();
            assert!(
                pair[1].contains(&tail) || pair[0].len() < 50,
                "chunk tail not repeated in the next chunk"
            );
        }
    }

    #[test]
    fn chunks_cover_the_whole_text() {
        let text = prose_2500();
        let chunks = chunk_text(&text, 1000, 100);

        // Every chunk is a contiguous substring, and the last one reaches
        // the end of the text.
        for chunk in &chunks {
            assert!(text.contains(chunk.as_str()));
        }
        let last = chunks.last().unwrap();
        assert!(text.trim_end().ends_with(last.as_str()));
    }

    #[test]
    fn breaks_prefer_newlines_too() {
        let mut text = "first paragraph\n".to_string();
        text.push_str(&"b".repeat(100));
        let chunks = chunk_text(&text, 24, 4);

        assert_eq!(chunks[0], "first paragraph");
    }

    #[test]
    fn early_break_points_are_ignored() {
        // A period before the midpoint must not shrink the window
        let mut text = "ab. ".to_string();
        text.push_str(&"c".repeat(60));
        let chunks = chunk_text(&text, 40, 5);

        assert!(chunks[0].chars().count() == 40);
    }

    #[test]
    fn large_overlap_still_makes_progress() {
        let text = "x".repeat(5000);
        let chunks = chunk_text(&text, 100, 99);

        assert!(!chunks.is_empty());
        // Termination is the property under test; the chunk count is
        // bounded by one chunk per advanced character.
        assert!(chunks.len() <= 5000);
    }

    #[test]
    fn no_chunk_is_empty_after_trimming() {
        let text = "  \n.  \n".repeat(100);
        for chunk in chunk_text(&text, 10, 2) {
            assert!(!chunk.trim().is_empty());
        }
    }
}
