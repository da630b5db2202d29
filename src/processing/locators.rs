//! Normalization of the free-text "Localizadores" cell.
//!
//! A locator cell lists one or more tags, for example
//! `"SECRETARIA (Principal) - AGUARDA PRAZO (G) - Conclusos p/ despacho"`. Normalization:
//!
//! 1. decodes HTML entities,
//! 2. counts `(G)` markers (tags owned by the gabinete),
//! 3. removes `(Principal)` (any case) and trims,
//! 4. breaks the list onto separate lines where the next tag starts with an upper-case token.
//!
//! Step 4 follows a small grammar. A *separator* is `WS+ '-' WS+ TOKEN`, where `WS` is any
//! character accepted by [`is_space`] and `TOKEN` is the maximal run of non-`WS` characters that
//! follows.
//! Separators are matched left to right without overlap. A separator whose token has no
//! lower-case letters (it equals its own upper-case form) becomes `"\n" + TOKEN`; any other
//! separator is rewritten as `" - " + TOKEN`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::entities::decode_cell;
use crate::types::Cell;

/// Marker for locators that belong to the gabinete.
pub const GABINETE_MARKER: &str = "(G)";

static PRINCIPAL_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(principal\)").expect("static regex is valid"));

/// Result of normalizing one locator cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLocators {
    /// Cleaned, line-broken text.
    pub text: String,
    /// Number of `(G)` markers found in the decoded input.
    pub gabinete_count: usize,
}

/// Normalize a locator cell. Blank cells yield empty text and a zero count.
pub fn normalize_locator_cell(cell: &Cell) -> NormalizedLocators {
    if cell.is_blank() {
        return NormalizedLocators {
            text: cell.to_text(),
            gabinete_count: 0,
        };
    }
    normalize_locators(&decode_cell(cell))
}

/// Normalize already-decoded locator text.
pub fn normalize_locators(decoded: &str) -> NormalizedLocators {
    let gabinete_count = count_gabinete_markers(decoded);
    let without_principal = PRINCIPAL_TAG.replace_all(decoded, "");
    NormalizedLocators {
        text: break_locator_lines(without_principal.trim_matches(is_space)),
        gabinete_count,
    }
}

/// Non-overlapping occurrences of [`GABINETE_MARKER`].
pub fn count_gabinete_markers(text: &str) -> usize {
    text.matches(GABINETE_MARKER).count()
}

/// Apply the separator rewrite described in the module docs.
pub fn break_locator_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let Some(ws_start) = rest.find(is_space) else {
            break;
        };
        let run_start = pos + ws_start;
        match match_separator(&text[run_start..]) {
            Some(sep) => {
                out.push_str(&text[pos..run_start]);
                if is_upper_token(sep.token) {
                    out.push('\n');
                } else {
                    out.push_str(" - ");
                }
                out.push_str(sep.token);
                pos = run_start + sep.len;
            }
            None => {
                // No separator starts in this whitespace run; copy it and move on.
                let run_len = leading_whitespace_len(&text[run_start..]);
                out.push_str(&text[pos..run_start + run_len]);
                pos = run_start + run_len;
            }
        }
    }

    out.push_str(&text[pos..]);
    out
}

struct Separator<'a> {
    /// Bytes consumed, from the first leading whitespace through the end of the token.
    len: usize,
    token: &'a str,
}

/// Match `WS+ '-' WS+ TOKEN` at the start of `input`.
fn match_separator(input: &str) -> Option<Separator<'_>> {
    let lead = leading_whitespace_len(input);
    if lead == 0 {
        return None;
    }
    let after_lead = &input[lead..];
    let after_dash = after_lead.strip_prefix('-')?;
    let gap = leading_whitespace_len(after_dash);
    if gap == 0 {
        return None;
    }
    let token_src = &after_dash[gap..];
    let token_len = token_src.find(is_space).unwrap_or(token_src.len());
    if token_len == 0 {
        return None;
    }
    Some(Separator {
        len: lead + 1 + gap + token_len,
        token: &token_src[..token_len],
    })
}

fn leading_whitespace_len(s: &str) -> usize {
    s.find(|c: char| !is_space(c)).unwrap_or(s.len())
}

/// Whitespace as spreadsheet exports see it: Unicode `White_Space` plus the byte-order mark
/// U+FEFF, without U+0085 (NEL).
pub(crate) fn is_space(c: char) -> bool {
    match c {
        '\u{feff}' => true,
        '\u{85}' => false,
        c => c.is_whitespace(),
    }
}

/// Upper-case words, digits and punctuation all count as "upper".
fn is_upper_token(token: &str) -> bool {
    token == token.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_token_moves_to_a_new_line() {
        assert_eq!(break_locator_lines("Loc A - TESTE"), "Loc A\nTESTE");
    }

    #[test]
    fn mixed_case_token_keeps_the_dash() {
        assert_eq!(break_locator_lines("Loc B - Normal"), "Loc B - Normal");
    }

    #[test]
    fn separator_whitespace_is_collapsed() {
        assert_eq!(break_locator_lines("a   -\t b"), "a - b");
        assert_eq!(break_locator_lines("a  -  B  c"), "a\nB  c");
    }

    #[test]
    fn digits_and_symbols_count_as_uppercase() {
        assert_eq!(break_locator_lines("Prazo - 15 dias"), "Prazo\n15 dias");
        assert_eq!(break_locator_lines("x - (G)"), "x\n(G)");
    }

    #[test]
    fn incomplete_separators_are_left_alone() {
        assert_eq!(break_locator_lines("a -b"), "a -b");
        assert_eq!(break_locator_lines("a- B"), "a- B");
        assert_eq!(break_locator_lines("trailing -"), "trailing -");
        assert_eq!(break_locator_lines("no separators here"), "no separators here");
    }

    #[test]
    fn matches_do_not_overlap() {
        // The first separator consumes "-" as its token; scanning resumes after it.
        assert_eq!(break_locator_lines("a - - B"), "a\n- B");
    }

    #[test]
    fn counts_markers_and_strips_principal() {
        let out = normalize_locators(" SECRETARIA (principal) - AGUARDA (G) - Outro (G) ");
        assert_eq!(out.gabinete_count, 2);
        assert_eq!(out.text, "SECRETARIA\nAGUARDA (G) - Outro (G)");
        assert!(!out.text.to_lowercase().contains("(principal)"));
    }

    #[test]
    fn entities_are_decoded_before_counting() {
        let out = normalize_locator_cell(&Cell::text("A&nbsp;-&nbsp;B &amp; C (G)"));
        assert_eq!(out.gabinete_count, 1);
        assert_eq!(out.text, "A\nB & C (G)");
    }

    #[test]
    fn blank_cells_yield_zero_markers() {
        let out = normalize_locator_cell(&Cell::Blank);
        assert_eq!(out, NormalizedLocators { text: String::new(), gabinete_count: 0 });
    }

    #[test]
    fn principal_only_cell_collapses_to_empty_text() {
        let out = normalize_locators("(PRINCIPAL)");
        assert_eq!(out.text, "");
        assert_eq!(out.gabinete_count, 0);
    }

    #[test]
    fn byte_order_marks_count_as_whitespace() {
        assert_eq!(normalize_locators("\u{feff}A - B\u{feff}").text, "A\nB");
        assert_eq!(break_locator_lines("a\u{feff}-\u{feff}B"), "a\nB");
        assert_eq!(break_locator_lines("a - B\u{feff}c"), "a\nB\u{feff}c");
    }

    #[test]
    fn next_line_is_not_a_separator_space() {
        assert_eq!(break_locator_lines("a\u{85}-\u{85}B"), "a\u{85}-\u{85}B");
    }
}
