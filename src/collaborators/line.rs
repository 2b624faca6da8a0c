//! Per-line rewriting into `Name (Affiliation) - note` form.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::matching::{AffiliationClassifier, AuthorMatcher, WordDictionary};
use crate::utils::text::{is_all_upper, simplify_whitespace};

static DOUBLED_QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""?""#).unwrap());

static TABS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t+").unwrap());

/// Names that stand for "everyone at the affiliation".
static ALL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:|-|all|any|institution|none)\s*[.,:;}]?$").unwrap()
});

static JUNK_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[-,:;.#()\s"]*$"#).unwrap());

static SUFFIX_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*-+\s*|\s*[,:;.#%(\[{]\s*)").unwrap());

/// A lowercase tail such as " advisor" or " co-author/student".
static LOWERCASE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[a-z/\s]+$").unwrap());

static TRAILING_AFFILIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^,;]+)[,;]\s*(\S.+)$").unwrap());

static NONE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(|none|n/a|na)\s*[.,;}]?$").unwrap());

static SEPARATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(\s*)([-,;:}])\s+(.*)$").unwrap());

/// Lines that say nothing beyond "none".
pub(super) static EMPTY_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:none|n/a|na|-*|\.*)[\s,;.]*$").unwrap());

/// What a raw line turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum LineOutcome {
    /// A `#` comment, kept verbatim.
    Comment(String),
    /// A rewritten entry; may be empty or "None".
    Entry(String),
}

pub(super) struct LineRewriter<'a> {
    dictionary: &'a Arc<WordDictionary>,
    classifier: AffiliationClassifier<'a>,
}

impl<'a> LineRewriter<'a> {
    pub(super) fn new(dictionary: &'a Arc<WordDictionary>) -> Self {
        Self {
            dictionary,
            classifier: AffiliationClassifier::new(dictionary),
        }
    }

    fn looks_like_affiliation(&self, text: &str) -> bool {
        self.classifier.looks_like_affiliation(text, false)
    }

    pub(super) fn rewrite(&self, line: &str) -> LineOutcome {
        let unquoted;
        let mut line = line;
        if line.starts_with('"') {
            unquoted = unquote(line);
            line = &unquoted;
        }

        if line.starts_with('#') {
            return LineOutcome::Comment(line.to_string());
        }
        if line.ends_with(':') {
            return LineOutcome::Comment(format!("# {line}"));
        }

        let line = if !line.contains('(') && line.contains('\t') {
            expand_tabs(line)
        } else {
            line.to_string()
        };
        let line = simplify_whitespace(&line);

        LineOutcome::Entry(match line.find('(') {
            Some(paren) => self.rewrite_with_parens(line, paren),
            None => self.rewrite_without_parens(&line),
        })
    }

    fn rewrite_with_parens(&self, mut line: String, mut paren: usize) -> String {
        if ALL_NAME.is_match(line[..paren].trim_end()) {
            line = format!("All {}", &line[paren..]);
            paren = 4;
        }

        // Close the group opened at `paren`, adding missing parens at the end.
        let mut len = line.len();
        let mut pos = paren + 1;
        let mut depth = 1usize;
        if line[pos..].find(')').map(|i| pos + i) == Some(len - 1) {
            pos = len;
            depth = 0;
        } else {
            let bytes = line.as_bytes();
            while pos < len && depth > 0 {
                match bytes[pos] {
                    b'(' => depth += 1,
                    b')' => depth -= 1,
                    _ => {}
                }
                pos += 1;
            }
        }
        for _ in 0..depth {
            line.push(')');
            pos += 1;
            len += 1;
        }

        if pos == len {
            // "Massachusetts Institute of Technology (MIT)" names an institution.
            let affiliation = &line[paren + 1..pos - 1];
            if is_all_upper(affiliation)
                && AuthorMatcher::from_affiliation(affiliation, Arc::clone(self.dictionary))
                    .test_text(&line[..paren], false)
                    .is_match()
            {
                return format!("All ({})", line[..paren].trim_end());
            }
            return line;
        }

        let rest = &line[pos..];
        if JUNK_SUFFIX.is_match(rest) {
            line.truncate(pos);
            return line;
        }

        let separator = SUFFIX_SEPARATOR
            .find(rest)
            .map(|m| m.len())
            .or_else(|| LOWERCASE_TAIL.captures(rest).map(|caps| caps[1].len()));
        if let Some(separator) = separator {
            let suffix = rest[separator..].to_string();
            line.truncate(pos);
            if !suffix.is_empty() {
                line.push_str(" - ");
                line.push_str(&suffix);
            }
            return line;
        }

        if !rest.contains('(') {
            return match TRAILING_AFFILIATION.captures(rest) {
                Some(caps) => format!("{}{} ({})", &line[..pos], &caps[1], &caps[2]),
                None => format!("{line} (unknown)"),
            };
        }
        line
    }

    fn rewrite_without_parens(&self, line: &str) -> String {
        let line = line.replace(')', "");
        if let Some(caps) = NONE_LINE.captures(&line) {
            return if caps[1].is_empty() {
                String::new()
            } else {
                "None".to_string()
            };
        }

        if let Some(caps) = SEPARATED.captures(&line) {
            let (name, space, separator, rest) = (&caps[1], &caps[2], &caps[3], &caps[4]);
            if !space.is_empty() || separator != "-" {
                if name.eq_ignore_ascii_case("institution") || name.eq_ignore_ascii_case("all") {
                    return format!("All ({rest})");
                }
                let name_has_space = name.contains(' ');
                if (separator != "," || name_has_space) && !self.looks_like_affiliation(name) {
                    return format!("{name} ({rest})");
                }
                // "Doe, Jane Stanford University"
                if !name_has_space
                    && separator == ","
                    && let Some((first, affiliation)) = rest.split_once(' ')
                    && self.classifier.looks_like_affiliation(affiliation, true)
                {
                    return format!("{name}{space}{separator} {first} ({affiliation})");
                }
            }
        }

        if self.looks_like_affiliation(&line) {
            format!("All ({line})")
        } else {
            line
        }
    }
}

/// `"Doe, Jane"` → `Doe, Jane`; a doubled `""` stands for one quote.
fn unquote(line: &str) -> String {
    DOUBLED_QUOTE
        .replace_all(line, |caps: &regex::Captures<'_>| {
            if caps[0].len() == 1 { "" } else { "\"" }
        })
        .into_owned()
}

/// Spreadsheet rows: `First<TAB>Last<TAB>Affiliation<TAB>note...` or
/// `Name<TAB>Affiliation<TAB>note...`.
fn expand_tabs(line: &str) -> String {
    let fields: Vec<&str> = TABS.split(line).collect();
    let (name, affiliation, rest) = if fields.len() > 2 && !fields[0].contains(' ') {
        (
            format!("{} {}", fields[0], fields[1]).trim_end().to_string(),
            fields[2].trim_end(),
            fields[3..].join(" "),
        )
    } else {
        (
            fields[0].to_string(),
            fields.get(1).map_or("", |f| f.trim_end()),
            fields.get(2..).map(|f| f.join(" ")).unwrap_or_default(),
        )
    };
    let rest = rest
        .trim_end()
        .trim_start_matches(|c: char| c == ',' || c.is_whitespace());

    let mut out = name;
    if !affiliation.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        if affiliation.starts_with('(') {
            out.push_str(affiliation);
        } else {
            out.push_str(&format!("({affiliation})"));
        }
    }
    if !rest.is_empty() {
        if !out.is_empty() {
            out.push_str(" - ");
        }
        out.push_str(rest);
    }
    out
}
