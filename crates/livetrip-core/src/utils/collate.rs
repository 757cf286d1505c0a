//! Japanese-aware label collation.
//!
//! Approximates the `ja` locale ordering used by the display layer:
//! symbols, then digits, then Latin letters, then kana in gojūon order,
//! then everything else (kanji) by code point. Katakana sorts with its
//! hiragana equivalent (half-width katakana included), full-width ASCII
//! with its half-width form, and the long-vowel mark `ー` with the vowel it
//! lengthens.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Symbol,
    Digit,
    Latin,
    Kana,
    Other,
}

/// Half-width katakana U+FF66..=U+FF9D in code point order.
const HALF_WIDTH_KANA: &str =
    "ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン";

const LONG_VOWEL: char = 'ー';
const HALF_WIDTH_VOICED: char = 'ﾞ';
const HALF_WIDTH_SEMI_VOICED: char = 'ﾟ';

// Hiragana by the vowel a following long-vowel mark repeats
const VOWEL_ROWS: &[(char, &str)] = &[
    ('あ', "ぁあかがさざただなはばぱまゃやらわ"),
    ('い', "ぃいきぎしじちぢにひびぴみりゐ"),
    ('う', "ぅうくぐすずっつづぬふぶぷむゅゆるゔ"),
    ('え', "ぇえけげせぜてでねへべぺめれゑ"),
    ('お', "ぉおこごそぞとどのほぼぽもょよろを"),
];

const VOICEABLE: &str = "うかきくけこさしすせそたちつてとはひふへほ";
const SEMI_VOICEABLE: &str = "はひふへほ";

fn widen(c: char) -> char {
    match c as u32 {
        code @ 0xFF66..=0xFF9D => HALF_WIDTH_KANA.chars().nth((code - 0xFF66) as usize).unwrap_or(c),
        _ => c,
    }
}

fn fold(c: char) -> char {
    let code = widen(c) as u32;
    let folded = match code {
        // Full-width ASCII variants
        0xFF01..=0xFF5E => code - 0xFEE0,
        // Katakana ァ..ヶ to hiragana ぁ..ゖ
        0x30A1..=0x30F6 => code - 0x60,
        _ => code,
    };
    char::from_u32(folded).unwrap_or(c).to_ascii_lowercase()
}

fn vowel_of(c: char) -> Option<char> {
    VOWEL_ROWS.iter().find(|(_, row)| row.contains(c)).map(|(vowel, _)| *vowel)
}

/// Voiced form of `base` for a separate half-width (semi-)voiced mark.
fn voiced(base: char, mark: char) -> Option<char> {
    let offset = match mark {
        HALF_WIDTH_VOICED if VOICEABLE.contains(base) => if base == 'う' { 0x4E } else { 1 },
        HALF_WIDTH_SEMI_VOICED if SEMI_VOICEABLE.contains(base) => 2,
        _ => return None,
    };
    char::from_u32(base as u32 + offset)
}

fn class(c: char) -> CharClass {
    match c as u32 {
        0x3041..=0x309F | 0x30A0..=0x30FF | 0xFF66..=0xFF9F => CharClass::Kana,
        _ if c.is_ascii_digit() => CharClass::Digit,
        _ if c.is_ascii_alphabetic() => CharClass::Latin,
        _ if c.is_alphanumeric() => CharClass::Other,
        _ => CharClass::Symbol,
    }
}

fn key(s: &str) -> Vec<(CharClass, char)> {
    let mut key: Vec<(CharClass, char)> = Vec::with_capacity(s.len());
    for c in s.chars().map(fold) {
        let prev = key.last().map(|&(_, p)| p);
        if c == HALF_WIDTH_VOICED || c == HALF_WIDTH_SEMI_VOICED {
            if let Some(combined) = prev.and_then(|p| voiced(p, c)) {
                key.pop();
                key.push((CharClass::Kana, combined));
                continue;
            }
        }
        // The long-vowel mark sorts as the vowel it extends
        let c = if c == LONG_VOWEL { prev.and_then(vowel_of).unwrap_or(c) } else { c };
        key.push((class(c), c));
    }
    key
}

/// Compare two labels for display ordering.
///
/// Equal keys fall back to a plain code point comparison so the result is a
/// total order (hiragana before katakana, upper case before lower).
pub fn compare(a: &str, b: &str) -> Ordering {
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut labels: Vec<&str>) -> Vec<&str> {
        labels.sort_by(|a, b| compare(a, b));
        labels
    }

    #[test]
    fn test_kana_order() {
        assert_eq!(sorted(vec!["さくら", "あお", "かに"]), vec!["あお", "かに", "さくら"]);
    }

    #[test]
    fn test_long_vowel_mark_sorts_as_vowel() {
        assert_eq!(compare("ラーメン", "らいと"), Ordering::Less);
        assert_eq!(compare("ラーメン", "らあめん"), Ordering::Greater);
        assert_eq!(key("ラーメン"), key("らあめん"));
        assert_eq!(sorted(vec!["ソース", "そうじ", "ソーダ"]), vec!["そうじ", "ソース", "ソーダ"]);
        // Nothing to extend: the mark is kept as is
        assert_eq!(key("ー").len(), 1);
    }

    #[test]
    fn test_half_width_katakana() {
        assert_eq!(key("ｱｵ"), key("あお"));
        assert_eq!(key("ｶﾞｲﾄﾞ"), key("がいど"));
        assert_eq!(key("ﾊﾟｰﾃｨｰ"), key("ぱあてぃい"));
        assert_eq!(sorted(vec!["ｻｸﾗ", "かに", "ｱｵ"]), vec!["ｱｵ", "かに", "ｻｸﾗ"]);
        assert_eq!(compare("ﾗｰﾒﾝ", "らいと"), Ordering::Less);
    }

    #[test]
    fn test_katakana_sorts_with_hiragana() {
        assert_eq!(sorted(vec!["サクラ", "かに", "アオ"]), vec!["アオ", "かに", "サクラ"]);
        assert_eq!(compare("あお", "アオ"), Ordering::Less);
    }

    #[test]
    fn test_class_order() {
        assert_eq!(
            sorted(vec!["東京", "あ", "Zepp", "2nd", "#tag"]),
            vec!["#tag", "2nd", "Zepp", "あ", "東京"]
        );
    }

    #[test]
    fn test_case_and_width_fold() {
        assert_eq!(sorted(vec!["beta", "Alpha", "ＡＢＣ"]), vec!["ＡＢＣ", "Alpha", "beta"]);
        assert_eq!(compare("abc", "ABC"), Ordering::Greater);
        assert_eq!(compare("x", "x"), Ordering::Equal);
    }
}
