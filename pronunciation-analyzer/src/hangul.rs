//! Hangul syllable decomposition
//!
//! Precomposed syllables occupy U+AC00..=U+D7A3 and are laid out as
//! `lead * (21 * 28) + vowel * 28 + final`. Decomposition is pure block
//! arithmetic against the three ordered tables below.

use serde::{Deserialize, Serialize};

/// First precomposed Hangul syllable (가).
pub const SYLLABLE_BASE: u32 = 0xAC00;
/// Last precomposed Hangul syllable (힣).
pub const SYLLABLE_LAST: u32 = 0xD7A3;

pub const LEAD_COUNT: u32 = 19;
pub const VOWEL_COUNT: u32 = 21;
pub const FINAL_COUNT: u32 = 28;

pub const LEADS: [char; LEAD_COUNT as usize] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ',
    'ㅌ', 'ㅍ', 'ㅎ',
];

pub const VOWELS: [char; VOWEL_COUNT as usize] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ',
    'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

/// Index 0 is "no final consonant". Compound finals keep their single
/// compatibility jamo so each block contributes at most one final symbol.
pub const FINALS: [Option<char>; FINAL_COUNT as usize] = [
    None,
    Some('ㄱ'),
    Some('ㄲ'),
    Some('ㄳ'),
    Some('ㄴ'),
    Some('ㄵ'),
    Some('ㄶ'),
    Some('ㄷ'),
    Some('ㄹ'),
    Some('ㄺ'),
    Some('ㄻ'),
    Some('ㄼ'),
    Some('ㄽ'),
    Some('ㄾ'),
    Some('ㄿ'),
    Some('ㅀ'),
    Some('ㅁ'),
    Some('ㅂ'),
    Some('ㅄ'),
    Some('ㅅ'),
    Some('ㅆ'),
    Some('ㅇ'),
    Some('ㅈ'),
    Some('ㅊ'),
    Some('ㅋ'),
    Some('ㅌ'),
    Some('ㅍ'),
    Some('ㅎ'),
];

/// Consonant and vowel channels of a decomposed string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticDecomposition {
    /// Lead and final consonants in order, plus any non-Hangul characters.
    pub consonants: String,
    /// One vowel per decomposed syllable block.
    pub vowels: String,
}

/// The three components of a single syllable block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyllableParts {
    pub lead: char,
    pub vowel: char,
    pub final_consonant: Option<char>,
}

pub fn is_syllable_block(c: char) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&u32::from(c))
}

/// Split one precomposed syllable; `None` for anything outside the block.
pub fn split_syllable(c: char) -> Option<SyllableParts> {
    if !is_syllable_block(c) {
        return None;
    }
    let offset = u32::from(c) - SYLLABLE_BASE;
    let lead_index = offset / (VOWEL_COUNT * FINAL_COUNT);
    let vowel_index = (offset % (VOWEL_COUNT * FINAL_COUNT)) / FINAL_COUNT;
    let final_index = offset % FINAL_COUNT;

    Some(SyllableParts {
        lead: *LEADS.get(lead_index as usize)?,
        vowel: *VOWELS.get(vowel_index as usize)?,
        final_consonant: FINALS.get(final_index as usize).copied().flatten(),
    })
}

/// Decompose `text` into consonant and vowel channels.
///
/// Whitespace is removed before the walk. Characters outside the syllable
/// block (Latin letters, digits, bare jamo, punctuation) are appended to the
/// consonant channel unchanged.
pub fn decompose(text: &str) -> PhoneticDecomposition {
    let mut out = PhoneticDecomposition::default();

    for c in text.chars().filter(|c| !c.is_whitespace()) {
        match split_syllable(c) {
            Some(parts) => {
                out.consonants.push(parts.lead);
                if let Some(final_consonant) = parts.final_consonant {
                    out.consonants.push(final_consonant);
                }
                out.vowels.push(parts.vowel);
            }
            None => out.consonants.push(c),
        }
    }

    out
}

pub fn count_syllable_blocks(text: &str) -> usize {
    text.chars().filter(|c| is_syllable_block(*c)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_water() {
        let d = decompose("물");
        assert_eq!(d.consonants, "ㅁㄹ");
        assert_eq!(d.vowels, "ㅜ");
    }

    #[test]
    fn test_decompose_open_syllables() {
        let d = decompose("사과");
        assert_eq!(d.consonants, "ㅅㄱ");
        assert_eq!(d.vowels, "ㅏㅘ");
    }

    #[test]
    fn test_compound_final_is_one_symbol() {
        // 닭: ㄷ + ㅏ + ㄺ
        let d = decompose("닭");
        assert_eq!(d.consonants, "ㄷㄺ");
        assert_eq!(d.vowels, "ㅏ");
    }

    #[test]
    fn test_block_edges() {
        let first = split_syllable('가').unwrap();
        assert_eq!((first.lead, first.vowel, first.final_consonant), ('ㄱ', 'ㅏ', None));

        let last = split_syllable('힣').unwrap();
        assert_eq!((last.lead, last.vowel, last.final_consonant), ('ㅎ', 'ㅣ', Some('ㅎ')));
    }

    #[test]
    fn test_whitespace_removed_and_passthrough() {
        let d = decompose(" 물 a1 ");
        assert_eq!(d.consonants, "ㅁㄹa1");
        assert_eq!(d.vowels, "ㅜ");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decompose(""), PhoneticDecomposition::default());
        assert_eq!(decompose("   \t\n"), PhoneticDecomposition::default());
    }

    #[test]
    fn test_bare_jamo_is_not_a_block() {
        assert!(!is_syllable_block('ㄱ'));
        assert_eq!(decompose("ㄱ").consonants, "ㄱ");
        assert_eq!(count_syllable_blocks("ㄱ가a"), 1);
    }
}
