//! Pre-parse text normalization.
//!
//! Generators wrap payloads in fenced code blocks, substitute typographic
//! quotes, annotate values with comments, and leave trailing separators.
//! [`sanitize`] removes all of that in one total, idempotent pass so the
//! lexer and parser only ever see plain ASCII delimiters.

use regex::Regex;
use std::sync::LazyLock;

/// Typographic quote variants mapped to their ASCII equivalents.
///
/// Applied before lexing: the string-literal scanner only recognizes the
/// plain ASCII quote characters as delimiters.
const SMART_QUOTES: [(char, char); 6] = [
    ('\u{201C}', '"'),  // left double quotation mark
    ('\u{201D}', '"'),  // right double quotation mark
    ('\u{201E}', '"'),  // double low-9 quotation mark
    ('\u{2018}', '\''), // left single quotation mark
    ('\u{2019}', '\''), // right single quotation mark
    ('\u{201A}', '\''), // single low-9 quotation mark
];

/// Normalizes raw generator text before lexing and parsing.
///
/// Total function: never fails, and `sanitize(sanitize(x)) == sanitize(x)`
/// for all inputs. Removes fenced code-block delimiters, maps smart quotes
/// to ASCII, strips comments outside string literals, and drops trailing
/// commas before closers.
pub fn sanitize(raw: &str) -> String {
    // SAFETY: These regexes are compile-time constants and are validated by tests.
    static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)```[a-z0-9_+-]*[ \t]*\r?\n?").expect("static regex must compile")
    });
    static TRAILING_COMMA_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("static regex must compile"));

    let unfenced = FENCE_RE.replace_all(raw, "");
    let unquoted: String = unfenced
        .trim()
        .chars()
        .map(|ch| {
            SMART_QUOTES
                .iter()
                .find(|(smart, _)| *smart == ch)
                .map_or(ch, |(_, ascii)| *ascii)
        })
        .collect();

    let mut cleaned = strip_comments(&unquoted);
    while TRAILING_COMMA_RE.is_match(&cleaned) {
        cleaned = TRAILING_COMMA_RE.replace_all(&cleaned, "$1").into_owned();
    }
    cleaned
}

/// Strips `//` line comments and `/* */` block comments outside string
/// literals. Quote state is tracked character-by-character with backslash
/// escapes so comment-like sequences inside values survive verbatim.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if let Some(quote) = in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                in_string = Some(ch);
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                for next in chars.by_ref() {
                    if next == '\n' || next == '\r' {
                        out.push(next);
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}
