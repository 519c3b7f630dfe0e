//! # Body Lexer
//!
//! Splits ABC body text into the raw tokens of the folk-rnn training
//! vocabulary. The lexer is a single left-to-right pass over the characters:
//! every character belongs to exactly one [`CharClass`], and the class of the
//! current character together with the [`LexState`] left by the previous one
//! decides whether the character extends the pending token or starts a new
//! one.
//!
//! ## Examples
//! - `"=A,2"` lexes as `["=A,", "2"]` (accidental + note + octave, then duration)
//! - `"^^f/2>"` lexes as `["^^f", "/2>"]`
//! - `"|:"` lexes as a single token, `"|" "2"` after a note as two
//!
//! Characters outside every class are not tokens: their byte offsets (relative
//! to the whole input, header included) are collected in
//! [`Tokenized::invalid_indexes`] and lexing carries on.

use serde::Serialize;

/// Lexical class of a body character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Space, line feed, carriage return
    Ignorable,
    /// `a`-`g`, `A`-`G`, and the rests `z`, `x`
    Note,
    /// `,` `'`
    Octave,
    /// `=` `_` `^`
    Accidental,
    /// `|` `[` `]`
    Structural,
    /// `:`
    Colon,
    /// `(`
    OpenParen,
    /// `1`-`9`
    Digit,
    /// `/`
    Slash,
    /// `>` `<`
    BrokenRhythm,
    /// `*`
    Wildcard,
}

impl CharClass {
    /// Classify a character, or `None` when it is not valid ABC body text.
    pub fn of(c: char) -> Option<Self> {
        let class = match c {
            ' ' | '\n' | '\r' => CharClass::Ignorable,
            'a'..='g' | 'A'..='G' | 'z' | 'x' => CharClass::Note,
            ',' | '\'' => CharClass::Octave,
            '=' | '_' | '^' => CharClass::Accidental,
            '|' | '[' | ']' => CharClass::Structural,
            ':' => CharClass::Colon,
            '(' => CharClass::OpenParen,
            '1'..='9' => CharClass::Digit,
            '/' => CharClass::Slash,
            '>' | '<' => CharClass::BrokenRhythm,
            '*' => CharClass::Wildcard,
            _ => return None,
        };
        Some(class)
    }
}

/// What the previously consumed character established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    #[default]
    Neutral,
    /// An accidental was seen and the note letter it modifies is pending
    ExpectingNote,
    InNote,
    InDuration,
}

/// Raw lexer output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokenized {
    pub tokens: Vec<String>,
    pub invalid_indexes: Vec<usize>,
}

/// Lexer for ABC body text
pub struct Lexer<'a> {
    input: &'a str,
    /// Offset of `input` within the full text, added to invalid indexes
    base_offset: usize,
    state: LexState,
    pending: String,
    tokens: Vec<String>,
    invalid_indexes: Vec<usize>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_offset(input, 0)
    }

    /// Lexer over a body slice that starts `base_offset` bytes into the full text.
    pub fn with_offset(input: &'a str, base_offset: usize) -> Self {
        Self {
            input,
            base_offset,
            state: LexState::Neutral,
            pending: String::new(),
            tokens: Vec::new(),
            invalid_indexes: Vec::new(),
        }
    }

    /// Emit the pending token if it holds anything.
    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.tokens.push(std::mem::take(&mut self.pending));
        }
    }

    /// Close the pending token and open a new one holding `c`.
    fn start(&mut self, c: char) {
        self.flush();
        self.pending.push(c);
    }

    fn extend(&mut self, c: char) {
        self.pending.push(c);
    }

    fn in_note_or_duration(&self) -> bool {
        matches!(self.state, LexState::InNote | LexState::InDuration)
    }

    fn consume(&mut self, c: char, class: CharClass) {
        self.state = match class {
            CharClass::Ignorable => return,
            CharClass::Octave => {
                self.extend(c);
                return;
            }
            CharClass::Note => {
                if self.state == LexState::ExpectingNote {
                    self.extend(c);
                } else {
                    self.start(c);
                }
                LexState::InNote
            }
            CharClass::Accidental => {
                if self.state == LexState::ExpectingNote {
                    // Double accidental: ^^ or __
                    self.extend(c);
                } else {
                    self.start(c);
                }
                LexState::ExpectingNote
            }
            CharClass::Structural => {
                if self.in_note_or_duration() {
                    self.start(c);
                } else {
                    self.extend(c);
                }
                LexState::Neutral
            }
            CharClass::Colon => {
                if self.in_note_or_duration() {
                    self.flush();
                }
                self.extend(c);
                LexState::Neutral
            }
            CharClass::OpenParen => {
                self.start(c);
                LexState::InDuration
            }
            CharClass::Digit | CharClass::BrokenRhythm => {
                if self.state == LexState::InDuration {
                    self.extend(c);
                } else {
                    self.start(c);
                }
                LexState::InDuration
            }
            CharClass::Slash => {
                if self.state == LexState::InNote {
                    self.start(c);
                } else {
                    self.extend(c);
                }
                LexState::InDuration
            }
            CharClass::Wildcard => {
                self.flush();
                self.tokens.push(c.to_string());
                LexState::Neutral
            }
        };
    }

    pub fn tokenize(mut self) -> Tokenized {
        let input = self.input;
        for (i, c) in input.char_indices() {
            match CharClass::of(c) {
                Some(class) => self.consume(c, class),
                None => {
                    log::trace!("unrecognized character {:?} at {}", c, self.base_offset + i);
                    self.invalid_indexes.push(self.base_offset + i);
                }
            }
        }
        self.flush();

        Tokenized {
            tokens: self.tokens,
            invalid_indexes: self.invalid_indexes,
        }
    }
}

/// Lex a body slice starting `base_offset` bytes into the full text.
pub fn tokenize_body(body: &str, base_offset: usize) -> Tokenized {
    Lexer::with_offset(body, base_offset).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<String> {
        Lexer::new(input).tokenize().tokens
    }

    #[test]
    fn test_simple_notes() {
        assert_eq!(lex("ABC|"), vec!["A", "B", "C", "|"]);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(lex("A B\nC\r\n|"), vec!["A", "B", "C", "|"]);
        assert_eq!(lex("  \n "), Vec::<String>::new());
    }

    #[test]
    fn test_accidentals_attach_to_note() {
        assert_eq!(lex("=A^c_B"), vec!["=A", "^c", "_B"]);
    }

    #[test]
    fn test_double_accidental() {
        assert_eq!(lex("^^f__G"), vec!["^^f", "__G"]);
    }

    #[test]
    fn test_octave_marks_extend_note() {
        assert_eq!(lex("A,B,,c'd''"), vec!["A,", "B,,", "c'", "d''"]);
    }

    #[test]
    fn test_duration_after_note() {
        assert_eq!(lex("A2B/2c3/2"), vec!["A", "2", "B", "/2", "c", "3/2"]);
        assert_eq!(lex("A,/2"), vec!["A,", "/2"]);
    }

    #[test]
    fn test_multi_digit_duration() {
        assert_eq!(lex("A16"), vec!["A", "16"]);
    }

    #[test]
    fn test_broken_rhythm() {
        assert_eq!(lex("A>B"), vec!["A", ">", "B"]);
        assert_eq!(lex("A2>B/2<c"), vec!["A", "2>", "B", "/2<", "c"]);
    }

    #[test]
    fn test_tuplet_group() {
        assert_eq!(lex("(3ABC"), vec!["(3", "A", "B", "C"]);
    }

    #[test]
    fn test_bar_and_repeat_symbols() {
        assert_eq!(lex("|:AB:|"), vec!["|:", "A", "B", ":|"]);
        assert_eq!(lex("A||B"), vec!["A", "||", "B"]);
        assert_eq!(lex("A::B"), vec!["A", "::", "B"]);
    }

    #[test]
    fn test_digit_after_bar_starts_new_token() {
        // "|1" stays split here; the normalizer joins volta markers
        assert_eq!(lex("A|1B"), vec!["A", "|", "1", "B"]);
        assert_eq!(lex("A[2B"), vec!["A", "[", "2", "B"]);
    }

    #[test]
    fn test_structural_after_structural_extends() {
        assert_eq!(lex("|]"), vec!["|]"]);
        assert_eq!(lex("A|[B"), vec!["A", "|[", "B"]);
    }

    #[test]
    fn test_wildcard_is_standalone() {
        assert_eq!(lex("A*B"), vec!["A", "*", "B"]);
        assert_eq!(lex("=*A"), vec!["=", "*", "A"]);
        assert_eq!(lex("**"), vec!["*", "*"]);
        assert_eq!(lex("A/*2"), vec!["A", "/", "*", "2"]);
    }

    #[test]
    fn test_invalid_characters_are_recorded() {
        let out = Lexer::new("A?B%C").tokenize();
        assert_eq!(out.tokens, vec!["A", "B", "C"]);
        assert_eq!(out.invalid_indexes, vec![1, 3]);
    }

    #[test]
    fn test_invalid_character_keeps_state() {
        // the rejected character does not break the pending note
        assert_eq!(lex("^?A"), vec!["^A"]);
    }

    #[test]
    fn test_invalid_indexes_use_base_offset() {
        let out = tokenize_body("A?B", 10);
        assert_eq!(out.invalid_indexes, vec![11]);
    }

    #[test]
    fn test_invalid_indexes_are_byte_offsets() {
        let out = Lexer::new("é0A\t").tokenize();
        assert_eq!(out.tokens, vec!["A"]);
        assert_eq!(out.invalid_indexes, vec![0, 2, 4]);
    }

    #[test]
    fn test_no_empty_tokens() {
        let out = Lexer::new("A*").tokenize();
        assert_eq!(out.tokens, vec!["A", "*"]);
        assert!(Lexer::new("").tokenize().tokens.is_empty());
        assert!(Lexer::new("?").tokenize().tokens.is_empty());
    }

    #[test]
    fn test_char_classes() {
        assert_eq!(CharClass::of('x'), Some(CharClass::Note));
        assert_eq!(CharClass::of('h'), None);
        assert_eq!(CharClass::of('0'), None);
        assert_eq!(CharClass::of('\t'), None);
        assert_eq!(CharClass::of('\''), Some(CharClass::Octave));
    }
}
