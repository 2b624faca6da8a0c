//! Cleanup and line splitting.
//!
//! Collaborator lists are pasted from anywhere. Before the per-line rules
//! run, typographic punctuation is folded, enumeration markers are stripped,
//! and lines that clearly list several people are split apart.

use std::sync::LazyLock;

use regex::Regex;

use super::SplitMode;
use crate::matching::AffiliationClassifier;
use crate::utils::text::skip_balanced_parens;

/// Lines at most this long are never split.
const SPLIT_THRESHOLD: usize = 35;

const LINE_TRIM: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

static TYPOGRAPHY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"“|”|–|—|•|\.~|\\item").unwrap());

static ENUMERATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:\(?[1-9][0-9]*[.)][ \t]*|[-*;\s]*[ \t]+)").unwrap()
});

/// Also strips lettered sub-items ("a. Jane", "ab. Jane"). The capital that
/// follows the marker is captured and put back.
static ENUMERATION_LETTERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:\(?[1-9][0-9]*[.)][ \t]*|[-*;\s]*[ \t]+|[a-z][a-z]?\.[ \t]+([A-Z]))")
        .unwrap()
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"(?:[^"]|"")*(?:"|$)([\s,;]*)"#).unwrap());

fn fold_typography(text: &str) -> String {
    TYPOGRAPHY
        .replace_all(text, |caps: &regex::Captures<'_>| match &caps[0] {
            "“" | "”" => "\"",
            "–" | "—" => "-",
            "•" => ";",
            ".~" => ". ",
            _ => "; ",
        })
        .into_owned()
}

/// Fold punctuation and strip list markers from already newline-cleaned text.
pub(super) fn clean_text(text: &str, mode: SplitMode) -> String {
    let folded = fold_typography(text);
    let enumeration = match mode {
        SplitMode::Plain => &*ENUMERATION,
        SplitMode::Lettered => &*ENUMERATION_LETTERED,
    };
    enumeration.replace_all(&folded, "${1}").into_owned()
}

/// Split cleaned text into lines, breaking up multi-person lines.
pub(super) fn split_lines(
    text: &str,
    mode: SplitMode,
    classifier: &AffiliationClassifier<'_>,
) -> Vec<String> {
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let line = line.trim_matches(LINE_TRIM);
        if line.len() <= SPLIT_THRESHOLD || !LineSplitter::new(line, mode).split(&mut lines, classifier)
        {
            lines.push(line.to_string());
        }
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// At a `"`; the quoted span is one atomic piece.
    InQuote,
    /// Looking for the next `,`, `;` or `(`.
    ScanningDelimiter,
    /// At a `(`; the balanced group is skipped whole.
    InParens,
}

/// One piece of a split line: `rest[..end]`, then `skip` separator bytes.
struct Piece {
    end: usize,
    skip: usize,
    quoted: bool,
}

struct LineSplitter<'a> {
    line: &'a str,
    mode: SplitMode,
    commas: usize,
    parens: usize,
    semicolons: usize,
}

impl<'a> LineSplitter<'a> {
    fn new(line: &'a str, mode: SplitMode) -> Self {
        Self {
            line,
            mode,
            commas: line.matches(',').count(),
            parens: line.matches('(').count(),
            semicolons: line.matches(';').count(),
        }
    }

    fn lists_several(&self) -> bool {
        self.commas > 2
            || (self.mode == SplitMode::Lettered && self.parens > 1)
            || self.semicolons > 1
    }

    /// Append the pieces of the line to `lines`. Returns false, leaving
    /// `lines` untouched, if the line does not list several entries.
    fn split(&self, lines: &mut Vec<String>, classifier: &AffiliationClassifier<'_>) -> bool {
        if !self.lists_several() {
            return false;
        }
        if self.commas == 0 && self.semicolons == 0 && self.mode == SplitMode::Lettered {
            return self.split_paren_groups(lines);
        }

        let mut rest = self.line;
        let mut after_name = false;
        while !rest.is_empty() {
            let piece = self.next_piece(rest);
            let w = &rest[..piece.end];
            if piece.quoted {
                after_name = false;
            }
            // "Jane Doe, MIT, John Smith, Stanford": the affiliation pieces
            // belong to the preceding name.
            if self.parens == 0
                && self.semicolons == 0
                && after_name
                && classifier.looks_like_affiliation(w, false)
                && let Some(last) = lines.last_mut()
            {
                last.push_str(", ");
                last.push_str(w);
            } else {
                lines.push(w.trim_start().to_string());
                after_name = after_name || !w.contains('(');
            }
            rest = &rest[piece.end + piece.skip..];
        }
        true
    }

    /// "Jane Doe (MIT) John Smith (Stanford) Ann Lee (CMU)": one entry per
    /// group. A group followed by " -" takes the rest of the line as a note.
    fn split_paren_groups(&self, lines: &mut Vec<String>) -> bool {
        let mut pieces = Vec::new();
        let mut rest = self.line;
        while let Some(open) = rest.find('(') {
            let mut close = (skip_balanced_parens(rest, open) + 1).min(rest.len());
            if rest[close..].starts_with(" -") {
                close = rest.len();
            }
            pieces.push(rest[..close].trim().to_string());
            rest = rest[close..].trim_start();
        }
        if !rest.is_empty() {
            pieces.push(rest.to_string());
        }

        if pieces.len() <= 2 {
            return false;
        }
        lines.extend(pieces);
        true
    }

    fn next_piece(&self, rest: &str) -> Piece {
        let mut cursor = if rest.starts_with('"') {
            Cursor::InQuote
        } else {
            Cursor::ScanningDelimiter
        };
        let mut pos = 0;

        loop {
            match cursor {
                Cursor::InQuote => {
                    let (whole, trailing) = match QUOTED.captures(rest) {
                        Some(caps) => (caps[0].len(), caps[1].len()),
                        None => (rest.len(), 0),
                    };
                    return Piece {
                        end: whole - trailing,
                        skip: trailing,
                        quoted: true,
                    };
                }
                Cursor::ScanningDelimiter => {
                    let Some(offset) = rest[pos..].find([',', '(', ';']) else {
                        return Piece {
                            end: rest.len(),
                            skip: 0,
                            quoted: false,
                        };
                    };
                    pos += offset;
                    match rest.as_bytes()[pos] {
                        b'(' => cursor = Cursor::InParens,
                        b';' => {
                            return Piece {
                                end: pos,
                                skip: 1,
                                quoted: false,
                            };
                        }
                        // Commas separate entries unless semicolons do.
                        _ if self.semicolons == 0 || self.commas > self.semicolons + 1 => {
                            return Piece {
                                end: pos,
                                skip: 1,
                                quoted: false,
                            };
                        }
                        _ => pos += 1,
                    }
                }
                Cursor::InParens => {
                    let close = (skip_balanced_parens(rest, pos) + 1).min(rest.len());
                    if close + 2 < rest.len() && rest[close..].starts_with(" -") {
                        return Piece {
                            end: rest.len(),
                            skip: 0,
                            quoted: false,
                        };
                    }
                    pos = close;
                    cursor = Cursor::ScanningDelimiter;
                }
            }
        }
    }
}
