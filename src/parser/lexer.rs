//! GCode Lexer
//!
//! Non-destructive tokenization of a single program line.
//! Words may be packed without whitespace (`G90G1X5Y-2.5`), so a word ends
//! at the first character that cannot belong to a numeric literal.

/// Token types in a program line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// Address letter plus literal, like "G1" or "X-2.5"
    Word,
    /// Comment (semicolon or parenthetical)
    Comment,
}

/// A token borrowing its text from the source line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Address letter of a word token, upper-cased
    pub fn letter(&self) -> Option<char> {
        match self.kind {
            TokenKind::Word => self.text.chars().next().map(|c| c.to_ascii_uppercase()),
            TokenKind::Comment => None,
        }
    }

    /// Literal following the address letter of a word token
    pub fn literal(&self) -> &'a str {
        match self.kind {
            // Address letters are ASCII, so the literal starts at byte 1
            TokenKind::Word => &self.text[1..],
            TokenKind::Comment => "",
        }
    }
}

/// Tokenize a line of GCode into tokens
///
/// Everything from the first `;` onward is a single comment token and ends
/// the scan. Characters that are neither letters, literals nor comment
/// delimiters are skipped.
pub fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start_idx, ch)) = chars.next() {
        match ch {
            ' ' | '\t' | '\r' | '\n' => continue,

            ';' => {
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: &line[start_idx..],
                });
                break;
            }

            '(' => {
                let mut end_idx = line.len();
                for (idx, ch) in chars.by_ref() {
                    if ch == ')' {
                        end_idx = idx + 1;
                        break;
                    }
                }

                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: &line[start_idx..end_idx],
                });
            }

            c if c.is_ascii_alphabetic() => {
                let mut end_idx = start_idx + 1;

                while let Some(&(idx, next_ch)) = chars.peek() {
                    if is_literal_char(next_ch) {
                        end_idx = idx + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }

                tokens.push(Token {
                    kind: TokenKind::Word,
                    text: &line[start_idx..end_idx],
                });
            }

            _ => continue,
        }
    }

    tokens
}

fn is_literal_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+')
}
