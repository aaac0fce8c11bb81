//! Normalized edit-distance similarity
//!
//! Distances are counted over Unicode scalar values, so one Hangul syllable
//! or one jamo is one symbol regardless of its UTF-8 width.

/// Levenshtein distance with unit insert/delete/substitute costs.
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Similarity in `[0, 100]`: `(maxLen - distance) / maxLen * 100`.
///
/// Two empty strings are a perfect match. Case and whitespace folding is the
/// caller's job.
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0;
    }
    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_classic() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_levenshtein_counts_chars_not_bytes() {
        assert_eq!(levenshtein("사과", "사가"), 1);
        assert_eq!(levenshtein("ㅏㅘ", "ㅏㅏㅏ"), 2);
    }

    #[test]
    fn test_similarity_edges() {
        assert_eq!(similarity("", ""), 100.0);
        assert_eq!(similarity("", "물"), 0.0);
        assert_eq!(similarity("물", ""), 0.0);
        assert_eq!(similarity("사과", "사과"), 100.0);
    }

    #[test]
    fn test_similarity_partial() {
        // one substitution out of four symbols
        assert!((similarity("abcd", "abed") - 75.0).abs() < 1e-9);
    }
}
