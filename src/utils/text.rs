//! Text folding and cleanup helpers shared by the matcher and the
//! collaborator normalizer.
//!
//! Accent folding decomposes each character (NFD) and drops combining marks,
//! plus a handful of letters that have no decomposition (`ø`, `ł`, `ß`, ...).
//! No other transliteration is attempted.

use std::ops::Range;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Append the accent-folded form of `c` to `out`.
fn fold_char(c: char, out: &mut String) {
    if c.is_ascii() {
        out.push(c);
        return;
    }
    match c {
        'ø' => out.push('o'),
        'Ø' => out.push('O'),
        'ł' => out.push('l'),
        'Ł' => out.push('L'),
        'đ' => out.push('d'),
        'Đ' => out.push('D'),
        'ı' => out.push('i'),
        'ß' => out.push_str("ss"),
        'æ' => out.push_str("ae"),
        'Æ' => out.push_str("AE"),
        'œ' => out.push_str("oe"),
        'Œ' => out.push_str("OE"),
        _ => out.extend(std::iter::once(c).nfd().filter(|d| !is_combining_mark(*d))),
    }
}

/// Strip accents from `s`, preserving case.
pub fn fold_accents(s: &str) -> String {
    if s.is_ascii() {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        fold_char(c, &mut out);
    }
    out
}

/// Strip accents from `s` and lowercase the result.
///
/// This is the form every pattern is built from and tested against.
pub fn deaccent(s: &str) -> String {
    fold_accents(s).to_lowercase()
}

/// Accent-folded, lowercased text that remembers where each byte came from.
///
/// Highlighting runs patterns over the folded text and needs to report spans
/// in the caller's original text.
#[derive(Debug, Clone)]
pub struct FoldedText {
    pub text: String,
    /// `origin[i]` is the byte offset in the original text of the character
    /// that produced folded byte `i`. One extra entry maps the end.
    origin: Vec<usize>,
}

impl FoldedText {
    pub fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len() + 1);
        let mut scratch = String::new();
        for (offset, c) in original.char_indices() {
            scratch.clear();
            fold_char(c, &mut scratch);
            for lc in scratch.chars().flat_map(char::to_lowercase) {
                let before = text.len();
                text.push(lc);
                origin.extend(std::iter::repeat_n(offset, text.len() - before));
            }
        }
        origin.push(original.len());
        Self { text, origin }
    }

    /// Map a byte range of the folded text back onto the original text.
    pub fn original_range(&self, range: Range<usize>) -> Range<usize> {
        let start = self.origin[range.start];
        if range.is_empty() {
            return start..start;
        }
        // The end of a span maps to the start of the next original character.
        let mut end_index = range.end;
        while end_index < self.text.len() && self.origin[end_index] == self.origin[range.end - 1]
        {
            end_index += 1;
        }
        start..self.origin[end_index]
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn simplify_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize line endings to `\n`, drop a leading byte-order mark, and make
/// sure non-empty text ends with a newline.
pub fn clean_newlines(s: &str) -> String {
    let s = s.strip_prefix('\u{feff}').unwrap_or(s);
    let mut out = s.replace("\r\n", "\n").replace('\r', "\n");
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Return the byte index of the `)` that closes the `(` at `pos`, or
/// `s.len()` if it is never closed.
pub fn skip_balanced_parens(s: &str, pos: usize) -> usize {
    let mut depth = 0usize;
    for (i, b) in s.bytes().enumerate().skip(pos) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    s.len()
}

/// True if `s` is non-empty and made only of ASCII uppercase letters.
pub fn is_all_upper(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_uppercase())
}
