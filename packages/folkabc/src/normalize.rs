//! # Token Normalization
//!
//! ABC has several spellings for the same repeat and volta structure
//! (`:||:`, `::`, `:|:`; `|[1`, `| 1`, `[1`). The folk-rnn vocabulary only
//! knows one of them, so after lexing the tokens are joined with single spaces,
//! rewritten by the ordered rules in [`RULES`], and split again.
//!
//! ## Rule order
//! Rules are applied one at a time, each over the whole string (left to right,
//! non-overlapping) before the next one runs. The table is not confluent:
//! `::` must become `:| |:` before `||` collapses to `|`, `|[1` must become
//! `|1` before `|[` is split into `| [`, and so on. Never reorder it.
//!
//! The table runs exactly once. Normalizing the output again changes nothing
//! as long as no run of `|` and `:` characters is longer than two; longer runs
//! only lose one step per pass (`|||` becomes `||`, then `|`).
//!
//! | #  | pattern          | replacement        |
//! |----|------------------|--------------------|
//! | 1  | `: \|`           | `:\|`              |
//! | 2  | `\| :`           | `\|:`              |
//! | 3  | `\|[` digit      | `\|` digit         |
//! | 4  | `\| [` digit     | `\|` digit         |
//! | 5  | `\|[ ` digit     | `\|` digit         |
//! | 6  | `\| ` digit      | `\|` digit         |
//! | 7  | `:\|:`           | `:\| \|:`          |
//! | 8  | `:\|` digit      | `:\| \|` digit     |
//! | 9  | `::`             | `:\| \|:`          |
//! | 10 | `\|[`            | `\| [`             |
//! | 11 | `][`             | `] [`              |
//! | 12 | `]\|`            | `] \|`             |
//! | 13 | `\|:[`           | `\|: [`            |
//! | 14 | `]:\|`           | `] :\|`            |
//! | 15 | `:\|\|:`         | `:\| \|:`          |
//! | 16 | `[ ` digit       | `\|` digit         |
//! | 17 | `-\|`            | `- \|`             |
//! | 18 | `\|\|`           | `\|`               |
//! | 19 | `-:\|`           | `- :\|`            |

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// A single rewrite step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// Replace every occurrence of a literal string.
    Literal {
        from: &'static str,
        to: &'static str,
    },
    /// Replace every match of a regex capturing one digit as group 1.
    Digit {
        pattern: &'static str,
        replacement: &'static str,
    },
}

/// The normalization table, in application order.
pub const RULES: [Rewrite; 19] = [
    Rewrite::Literal { from: ": |", to: ":|" },
    Rewrite::Literal { from: "| :", to: "|:" },
    Rewrite::Digit { pattern: r"\|\[([0-9])", replacement: "|${1}" },
    Rewrite::Digit { pattern: r"\| \[([0-9])", replacement: "|${1}" },
    Rewrite::Digit { pattern: r"\|\[ ([0-9])", replacement: "|${1}" },
    Rewrite::Digit { pattern: r"\| ([0-9])", replacement: "|${1}" },
    Rewrite::Literal { from: ":|:", to: ":| |:" },
    Rewrite::Digit { pattern: r":\|([0-9])", replacement: ":| |${1}" },
    Rewrite::Literal { from: "::", to: ":| |:" },
    Rewrite::Literal { from: "|[", to: "| [" },
    Rewrite::Literal { from: "][", to: "] [" },
    Rewrite::Literal { from: "]|", to: "] |" },
    Rewrite::Literal { from: "|:[", to: "|: [" },
    Rewrite::Literal { from: "]:|", to: "] :|" },
    Rewrite::Literal { from: ":||:", to: ":| |:" },
    Rewrite::Digit { pattern: r"\[ ([0-9])", replacement: "|${1}" },
    Rewrite::Literal { from: "-|", to: "- |" },
    Rewrite::Literal { from: "||", to: "|" },
    Rewrite::Literal { from: "-:|", to: "- :|" },
];

enum CompiledRewrite {
    Literal {
        from: &'static str,
        to: &'static str,
    },
    Digit {
        regex: Regex,
        replacement: &'static str,
    },
}

impl CompiledRewrite {
    fn apply<'s>(&self, text: &'s str) -> Cow<'s, str> {
        match self {
            CompiledRewrite::Literal { from, to } => {
                if text.contains(*from) {
                    Cow::Owned(text.replace(*from, to))
                } else {
                    Cow::Borrowed(text)
                }
            }
            CompiledRewrite::Digit { regex, replacement } => regex.replace_all(text, *replacement),
        }
    }
}

static COMPILED_RULES: Lazy<Vec<CompiledRewrite>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|rule| match *rule {
            Rewrite::Literal { from, to } => CompiledRewrite::Literal { from, to },
            Rewrite::Digit { pattern, replacement } => CompiledRewrite::Digit {
                regex: Regex::new(pattern).unwrap(),
                replacement,
            },
        })
        .collect()
});

/// Apply every rule, in order, to a space-joined token string.
pub fn normalize_joined(joined: &str) -> String {
    let mut text = joined.to_string();
    for (i, rule) in COMPILED_RULES.iter().enumerate() {
        let rewritten = match rule.apply(&text) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(rewritten) => rewritten,
        };
        log::trace!("rule {} rewrote {:?} -> {:?}", i + 1, text, rewritten);
        text = rewritten;
    }
    text
}

/// Normalize raw lexer tokens into vocabulary tokens.
///
/// Empty pieces produced by the final split are dropped, so the result never
/// contains an empty token.
///
/// # Example
/// ```
/// use folkabc::normalize;
///
/// let raw: Vec<String> = ["A", ":||:", "B"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(normalize(&raw), vec!["A", ":|", "|:", "B"]);
/// ```
pub fn normalize<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let joined = tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_joined(&joined)
        .split(' ')
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(tokens: &[&str]) -> Vec<String> {
        normalize(tokens)
    }

    #[test]
    fn test_rule_count() {
        assert_eq!(RULES.len(), 19);
        assert_eq!(COMPILED_RULES.len(), 19);
    }

    #[test]
    fn test_double_repeat_is_split() {
        assert_eq!(norm(&["A", ":||:", "B"]), vec!["A", ":|", "|:", "B"]);
    }

    #[test]
    fn test_double_colon_is_split() {
        assert_eq!(norm(&["A", "::", "B"]), vec!["A", ":|", "|:", "B"]);
    }

    #[test]
    fn test_colon_bar_colon_is_split() {
        assert_eq!(norm(&["A", ":|:", "B"]), vec!["A", ":|", "|:", "B"]);
    }

    #[test]
    fn test_volta_after_bar() {
        assert_eq!(norm(&["A", "|", "1", "B"]), vec!["A", "|1", "B"]);
        assert_eq!(norm(&["A", "|[", "2", "B"]), vec!["A", "|2", "B"]);
        assert_eq!(norm(&["A", "|", "[", "2"]), vec!["A", "|2"]);
    }

    #[test]
    fn test_bracketed_volta_without_bar() {
        assert_eq!(norm(&["A", "[", "1", "B"]), vec!["A", "|1", "B"]);
    }

    #[test]
    fn test_volta_after_repeat_close() {
        assert_eq!(norm(&["A", ":|", "2", "B"]), vec!["A", ":|", "|2", "B"]);
    }

    #[test]
    fn test_spaced_repeat_is_joined() {
        assert_eq!(norm(&["A", ":", "|", "B"]), vec!["A", ":|", "B"]);
        assert_eq!(norm(&["|", ":", "A"]), vec!["|:", "A"]);
    }

    #[test]
    fn test_double_bar_collapses() {
        assert_eq!(norm(&["A", "||", "B"]), vec!["A", "|", "B"]);
    }

    #[test]
    fn test_chord_brackets_are_separated() {
        assert_eq!(norm(&["|[", "A"]), vec!["|", "[", "A"]);
        assert_eq!(norm(&["]["]), vec!["]", "["]);
        assert_eq!(norm(&["]|"]), vec!["]", "|"]);
        assert_eq!(norm(&["|:[", "A"]), vec!["|:", "[", "A"]);
        assert_eq!(norm(&["]:|"]), vec!["]", ":|"]);
    }

    #[test]
    fn test_plain_tokens_untouched() {
        assert_eq!(norm(&["A", "B", "C", "|"]), vec!["A", "B", "C", "|"]);
        assert!(norm(&[]).is_empty());
    }

    #[test]
    fn test_empty_tokens_are_dropped() {
        assert_eq!(norm(&["A", "", "B"]), vec!["A", "B"]);
    }

    #[test]
    fn test_normalizing_canonical_output_is_stable() {
        let samples: [&[&str]; 5] = [
            &["A", ":||:", "B"],
            &["|:", "A", "B", ":|", "2", "C"],
            &["A", "::", "B", "||"],
            &["|[", "A", "][", "B", "]|"],
            &["=A,", "2", "|", "[", "1", "B", ":|:"],
        ];
        for sample in samples {
            let once = norm(sample);
            let twice = normalize(once.as_slice());
            assert_eq!(once, twice, "normalizing {:?} twice changed it", sample);
        }
    }

    #[test]
    fn test_long_bar_runs_collapse_one_step_per_pass() {
        let once = norm(&["A", "|||", "B"]);
        assert_eq!(once, vec!["A", "||", "B"]);
        assert_eq!(normalize(once.as_slice()), vec!["A", "|", "B"]);

        let once = norm(&["A", ":::", "B"]);
        assert_eq!(once, vec!["A", ":|", "|::", "B"]);
        assert_eq!(normalize(once.as_slice()), vec!["A", ":|", "|:|", "|:", "B"]);
    }

    #[test]
    fn test_normalize_joined() {
        assert_eq!(normalize_joined("A :: B"), "A :| |: B");
        assert_eq!(normalize_joined("A - | B -:| C"), "A - | B - :| C");
    }
}
