//! Line layout for tunes streamed one token at a time.
//!
//! While a model generates, tokens arrive individually and are appended to a
//! tune's text. A line break goes in before every fourth plain bar line so the
//! text stays readable. The bar count lives in a [`BarLayout`] owned by
//! whoever owns the text, one per tune.

/// Bar lines per output line.
pub const BARS_PER_LINE: u32 = 4;

const BAR_LINE: &str = "|";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarLayout {
    bars_since_newline: u32,
}

impl BarLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bars_since_newline(&self) -> u32 {
        self.bars_since_newline
    }

    /// Append `token` to `out`, breaking the line first when it is the bar
    /// line that completes a row. A token carrying its own line feed starts a
    /// new row.
    pub fn push_token(&mut self, token: &str, out: &mut String) {
        if token == BAR_LINE {
            self.bars_since_newline += 1;
            if self.bars_since_newline >= BARS_PER_LINE {
                self.bars_since_newline = 0;
                out.push('\n');
            }
        } else if token.contains('\n') {
            self.bars_since_newline = 0;
        }
        out.push_str(token);
    }

    pub fn reset(&mut self) {
        self.bars_since_newline = 0;
    }
}

/// Text of a tune being generated, with its own bar layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuneText {
    text: String,
    layout: BarLayout,
}

impl TuneText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: &str) {
        self.layout.push_token(token, &mut self.text);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.layout.reset();
    }
}
