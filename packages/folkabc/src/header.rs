//! # Header Extraction
//!
//! Recognizes the optional preamble of an ABC start notation:
//!
//! ```text
//! L:1/8        unit note length (optional, only in the three-line form)
//! M:4/4        meter
//! K:Cmaj       key and mode
//! ```
//!
//! Each line may be wrapped in a single pair of square brackets (`[M:6/8]`).
//! Matching is anchored at the very start of the input; a header-shaped line
//! anywhere else is ordinary body text.
//!
//! The accepted layouts are tried in a fixed priority order (see
//! [`HEADER_LAYOUTS`]). Supporting a new convention means appending a layout,
//! never reordering the existing ones, so old inputs keep their meaning.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

/// One of the three declaration lines a header can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeaderField {
    UnitNoteLength,
    Meter,
    Key,
}

impl HeaderField {
    /// Field prefix as it appears in ABC and in model vocabularies.
    pub fn prefix(self) -> &'static str {
        match self {
            HeaderField::UnitNoteLength => "L:",
            HeaderField::Meter => "M:",
            HeaderField::Key => "K:",
        }
    }

    /// Regex fragment for the full field text, prefix included.
    fn value_pattern(self) -> &'static str {
        match self {
            HeaderField::UnitNoteLength => "L:[0-9]+/[0-9]+",
            HeaderField::Meter => "M:[0-9]+/[0-9]+",
            HeaderField::Key => "K:[A-G][b#]?[A-Za-z]{3}",
        }
    }
}

/// Header layouts in priority order.
pub const HEADER_LAYOUTS: &[&[HeaderField]] = &[
    &[HeaderField::UnitNoteLength, HeaderField::Meter, HeaderField::Key],
    &[HeaderField::Meter, HeaderField::Key],
];

/// Header values found at the start of the input.
///
/// Every value keeps its prefix (`"M:4/4"`, not `"4/4"`), which is also the
/// form used by model vocabularies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    pub l: Option<String>,
    pub m: Option<String>,
    pub k: Option<String>,
}

impl Header {
    pub fn is_empty(&self) -> bool {
        self.l.is_none() && self.m.is_none() && self.k.is_none()
    }

    pub fn get(&self, field: HeaderField) -> Option<&str> {
        match field {
            HeaderField::UnitNoteLength => self.l.as_deref(),
            HeaderField::Meter => self.m.as_deref(),
            HeaderField::Key => self.k.as_deref(),
        }
    }

    fn set(&mut self, field: HeaderField, value: String) {
        match field {
            HeaderField::UnitNoteLength => self.l = Some(value),
            HeaderField::Meter => self.m = Some(value),
            HeaderField::Key => self.k = Some(value),
        }
    }

    /// Present fields in L, M, K order.
    pub fn fields(&self) -> impl Iterator<Item = (HeaderField, &str)> {
        [HeaderField::UnitNoteLength, HeaderField::Meter, HeaderField::Key]
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }
}

/// Result of header extraction: the header and where the body starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderMatch {
    pub header: Header,
    /// Byte offset of the first body character in the input.
    pub body_start: usize,
}

struct CompiledLayout {
    fields: &'static [HeaderField],
    regex: Regex,
}

/// A field line, bracketed or bare. Each line contributes two capture groups:
/// the bracketed form and the bare form, exactly one of which participates.
fn line_pattern(field: HeaderField) -> String {
    let value = field.value_pattern();
    format!(r"(?:\[({value})\]|({value}))")
}

fn layout_pattern(fields: &[HeaderField]) -> String {
    let lines: Vec<String> = fields.iter().map(|&field| line_pattern(field)).collect();
    format!(r"\A{}\n?", lines.join(r"\n"))
}

static LAYOUTS: Lazy<Vec<CompiledLayout>> = Lazy::new(|| {
    HEADER_LAYOUTS
        .iter()
        .map(|&fields| CompiledLayout {
            fields,
            regex: Regex::new(&layout_pattern(fields)).unwrap(),
        })
        .collect()
});

fn header_from_captures(fields: &[HeaderField], caps: &Captures) -> Header {
    let mut header = Header::default();
    for (i, &field) in fields.iter().enumerate() {
        let bracketed = caps.get(2 * i + 1);
        let bare = caps.get(2 * i + 2);
        if let Some(value) = bracketed.or(bare) {
            header.set(field, value.as_str().to_string());
        }
    }
    header
}

/// Extract the header from the start of `abc`.
///
/// Returns an empty header with `body_start == 0` when no layout matches.
///
/// # Example
/// ```
/// use folkabc::extract_header;
///
/// let found = extract_header("M:6/8\nK:Cdor\nABc");
/// assert_eq!(found.header.m.as_deref(), Some("M:6/8"));
/// assert_eq!(found.header.k.as_deref(), Some("K:Cdor"));
/// assert_eq!(found.header.l, None);
/// assert_eq!(&"M:6/8\nK:Cdor\nABc"[found.body_start..], "ABc");
/// ```
pub fn extract_header(abc: &str) -> HeaderMatch {
    for layout in LAYOUTS.iter() {
        if let Some(caps) = layout.regex.captures(abc) {
            let body_start = caps.get(0).map_or(0, |m| m.end());
            log::trace!("header layout {:?} matched, body starts at {}", layout.fields, body_start);
            return HeaderMatch {
                header: header_from_captures(layout.fields, &caps),
                body_start,
            };
        }
    }
    HeaderMatch::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_line_header() {
        let abc = "L:1/8\nM:4/4\nK:Cmaj\nABC";
        let found = extract_header(abc);
        assert_eq!(found.header.l.as_deref(), Some("L:1/8"));
        assert_eq!(found.header.m.as_deref(), Some("M:4/4"));
        assert_eq!(found.header.k.as_deref(), Some("K:Cmaj"));
        assert_eq!(&abc[found.body_start..], "ABC");
    }

    #[test]
    fn test_two_line_header() {
        let abc = "M:4/4\nK:Cmaj\n|: abc :|";
        let found = extract_header(abc);
        assert_eq!(found.header.l, None);
        assert_eq!(found.header.m.as_deref(), Some("M:4/4"));
        assert_eq!(found.header.k.as_deref(), Some("K:Cmaj"));
        assert_eq!(&abc[found.body_start..], "|: abc :|");
    }

    #[test]
    fn test_bracketed_lines() {
        let abc = "[M:6/8]\n[K:Dbmix]\nA";
        let found = extract_header(abc);
        assert_eq!(found.header.m.as_deref(), Some("M:6/8"));
        assert_eq!(found.header.k.as_deref(), Some("K:Dbmix"));
        assert_eq!(&abc[found.body_start..], "A");
    }

    #[test]
    fn test_mixed_bracketing() {
        let abc = "[L:1/16]\nM:12/8\n[K:F#min]";
        let found = extract_header(abc);
        assert_eq!(found.header.l.as_deref(), Some("L:1/16"));
        assert_eq!(found.header.m.as_deref(), Some("M:12/8"));
        assert_eq!(found.header.k.as_deref(), Some("K:F#min"));
        assert_eq!(found.body_start, abc.len());
    }

    #[test]
    fn test_unbalanced_bracket_is_not_a_header() {
        let found = extract_header("[M:4/4\nK:Cmaj\nABC");
        assert!(found.header.is_empty());
        assert_eq!(found.body_start, 0);
    }

    #[test]
    fn test_header_must_start_at_offset_zero() {
        let found = extract_header("ABC\nM:4/4\nK:Cmaj\n");
        assert!(found.header.is_empty());
        assert_eq!(found.body_start, 0);
    }

    #[test]
    fn test_wrong_order_is_not_a_header() {
        let found = extract_header("K:Cmaj\nM:4/4\nABC");
        assert!(found.header.is_empty());
    }

    #[test]
    fn test_unit_length_without_meter_falls_back_to_no_header() {
        // L then K: neither layout matches from offset 0
        let found = extract_header("L:1/8\nK:Cmaj\nABC");
        assert!(found.header.is_empty());
        assert_eq!(found.body_start, 0);
    }

    #[test]
    fn test_key_needs_three_mode_letters() {
        assert!(extract_header("M:4/4\nK:Cm\nABC").header.is_empty());
        assert!(extract_header("M:4/4\nK:Hmaj\nABC").header.is_empty());
    }

    #[test]
    fn test_fields_iterate_in_order() {
        let found = extract_header("L:1/8\nM:3/4\nK:Gmaj\n");
        let fields: Vec<_> = found.header.fields().collect();
        assert_eq!(
            fields,
            vec![
                (HeaderField::UnitNoteLength, "L:1/8"),
                (HeaderField::Meter, "M:3/4"),
                (HeaderField::Key, "K:Gmaj"),
            ]
        );
    }
}
