//! Text normalization
//!
//! Canonicalizes raw Japanese text before tokenization. Width and form
//! variants are folded with NFKC, hyphen and prolonged-sound look-alikes are
//! unified, tildes are dropped, whitespace around Japanese text is removed
//! and ASCII letters are lower-cased. Lemma lookup and the single-character
//! filter both depend on this running first.

use unicode_normalization::UnicodeNormalization;

/// Canonicalizes raw document text.
///
/// # Contract
///
/// - Deterministic: the same input always yields the same output.
/// - Idempotent: `normalize(normalize(x)) == normalize(x)`.
/// - Empty input yields empty output.
pub trait Normalizer: Send + Sync {
    /// Normalize one document.
    fn normalize(&self, text: &str) -> String;
}

/// Pass-through normalizer for text that is already canonical.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNormalizer;

impl Normalizer for NoopNormalizer {
    #[inline]
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Japanese orthographic normalizer in the style of `neologdn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeologdNormalizer;

const HYPHENS: &[char] = &[
    '\u{02D7}', '\u{058A}', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2043}', '\u{207B}',
    '\u{208B}', '\u{2212}',
];

const PROLONGED_MARKS: &[char] = &[
    '\u{FE63}', '\u{FF0D}', '\u{FF70}', '\u{2014}', '\u{2015}', '\u{2500}', '\u{2501}', '\u{30FC}',
];

const TILDES: &[char] = &[
    '~', '\u{223C}', '\u{223E}', '\u{301C}', '\u{3030}', '\u{FF5E}',
];

const PROLONGED: char = '\u{30FC}';

impl Normalizer for NeologdNormalizer {
    fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let folded: String = text.nfkc().filter_map(map_variant).collect();
        let spaced = normalize_whitespace(&folded);
        let collapsed = collapse_prolonged(&spaced);

        let mut out: String = collapsed.nfkc().collect();
        out.make_ascii_lowercase();
        out
    }
}

/// Unify hyphen / prolonged-sound look-alikes and drop tildes.
fn map_variant(c: char) -> Option<char> {
    if HYPHENS.contains(&c) {
        Some('-')
    } else if PROLONGED_MARKS.contains(&c) {
        Some(PROLONGED)
    } else if TILDES.contains(&c) {
        None
    } else if c.is_whitespace() {
        Some(' ')
    } else {
        Some(c)
    }
}

/// Trim, collapse runs of spaces, and drop any space touching Japanese text.
fn normalize_whitespace(text: &str) -> String {
    let chars: Vec<char> = text.trim().chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != ' ' {
            out.push(c);
            i += 1;
            continue;
        }

        let run_end = chars[i..]
            .iter()
            .position(|&ch| ch != ' ')
            .map_or(chars.len(), |offset| i + offset);
        let prev = out.chars().next_back();
        let next = chars.get(run_end).copied();

        let touches_japanese = prev.is_some_and(is_japanese) || next.is_some_and(is_japanese);
        if !touches_japanese {
            out.push(' ');
        }
        i = run_end;
    }

    out
}

fn collapse_prolonged(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    for c in text.chars() {
        if c == PROLONGED && prev == Some(PROLONGED) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Whether a character belongs to a Japanese script or CJK punctuation block.
pub fn is_japanese(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'   // CJK symbols and punctuation
        | '\u{3040}'..='\u{309F}' // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{31F0}'..='\u{31FF}' // Katakana phonetic extensions
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{F900}'..='\u{FAFF}' // CJK compatibility ideographs
        | '\u{FF01}'..='\u{FF60}' // Full-width forms
        | '\u{20000}'..='\u{2FA1F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(text: &str) -> String {
        NeologdNormalizer.normalize(text)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("   "), "");
    }

    #[test]
    fn test_width_folding() {
        // Full-width ASCII -> half-width, half-width katakana -> full-width
        assert_eq!(norm("ＡＢＣ１２３"), "abc123");
        assert_eq!(norm("ｶﾀｶﾅ"), "カタカナ");
        assert_eq!(norm("ﾊﾟﾝ"), "パン");
    }

    #[test]
    fn test_ascii_lowercase() {
        assert_eq!(norm("Rust URL"), "rust url");
    }

    #[test]
    fn test_hyphens_and_prolonged_marks() {
        assert_eq!(norm("a\u{2010}b\u{2212}c"), "a-b-c");
        assert_eq!(norm("ラーーーメン"), "ラーメン");
        assert_eq!(norm("スーパ\u{2015}"), "スーパー");
    }

    #[test]
    fn test_tildes_removed() {
        assert_eq!(norm("わ〜い"), "わい");
        assert_eq!(norm("1～2"), "12");
    }

    #[test]
    fn test_spaces_between_japanese_removed() {
        assert_eq!(norm("猫 が　走る"), "猫が走る");
        assert_eq!(norm("Rust で 書く"), "rustで書く");
        assert_eq!(norm("machine   learning"), "machine learning");
        assert_eq!(norm("  前後の空白  "), "前後の空白");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "ＰＲ ＴＩＭＥＳ で 公開された　ﾌﾟﾚｽﾘﾘｰｽ〜ーー",
            "Machine   Learning と AI",
            "価格は１，０００円（税込）です！",
            "",
            "ー ー ー",
        ];
        for sample in samples {
            let once = norm(sample);
            let twice = norm(&once);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_noop_normalizer() {
        assert_eq!(NoopNormalizer.normalize("ＡＢＣ"), "ＡＢＣ");
    }

    #[test]
    fn test_is_japanese() {
        assert!(is_japanese('猫'));
        assert!(is_japanese('あ'));
        assert!(is_japanese('ア'));
        assert!(!is_japanese('a'));
        assert!(!is_japanese('1'));
    }
}
