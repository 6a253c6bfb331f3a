//! Line-level syntax for GCode programs
//!
//! Pure data: words carry their decoded numeric value, nothing here knows
//! about positioning modes or geometry.

use crate::parser::lexer::{Token, TokenKind};

/// A parsed line of GCode
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// One or more words with an optional trailing comment
    Block(Block),
    /// A comment-only line
    Comment(Comment),
    /// An empty or whitespace-only line
    Empty,
}

/// The words of a line, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub words: Vec<Word>,
    pub comment: Option<Comment>,
}

/// A single address word like "G1" or "X-2.5"
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Address letter, upper-cased
    pub letter: char,
    /// Numeric value; zero when the literal is malformed
    pub value: f64,
    /// Literal text as written
    pub literal: String,
    /// Set when the literal could not be parsed
    pub malformed: bool,
}

impl Word {
    /// Integer code of a word (`G01` → 1); `None` for fractional or negative values
    pub fn code(&self) -> Option<u32> {
        if self.value >= 0.0 && self.value.fract() == 0.0 && self.value <= f64::from(u32::MAX) {
            Some(self.value as u32)
        } else {
            None
        }
    }
}

/// A comment (semicolon or parenthetical)
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment text (without the delimiters)
    pub text: String,
}

/// Convert tokens into a parsed line
pub fn tokens_to_parsed_line(tokens: Vec<Token<'_>>) -> ParsedLine {
    if tokens.is_empty() {
        return ParsedLine::Empty;
    }

    let words: Vec<Word> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Word)
        .filter_map(word_from_token)
        .collect();

    let comment = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Comment)
        .map(|t| Comment {
            text: extract_comment_text(t.text),
        });

    if words.is_empty() {
        match comment {
            Some(comment) => ParsedLine::Comment(comment),
            None => ParsedLine::Empty,
        }
    } else {
        ParsedLine::Block(Block { words, comment })
    }
}

/// Decode a word token; malformed literals become zero
fn word_from_token(token: &Token<'_>) -> Option<Word> {
    let letter = token.letter()?;
    let literal = token.literal();
    let parsed = literal.parse::<f64>().ok().filter(|v| v.is_finite());

    Some(Word {
        letter,
        value: parsed.unwrap_or(0.0),
        literal: literal.to_string(),
        malformed: parsed.is_none(),
    })
}

/// Extract comment text, removing delimiters
fn extract_comment_text(text: &str) -> String {
    if let Some(stripped) = text.strip_prefix(';') {
        stripped.to_string()
    } else if let Some(inner) = text.strip_prefix('(') {
        inner.strip_suffix(')').unwrap_or(inner).to_string()
    } else {
        text.to_string()
    }
}
