//! GCode Parser
//!
//! Tokenization and line-level syntax, no interpretation.

pub mod ast;
pub mod lexer;

pub use ast::{Block, Comment, ParsedLine, Word};
pub use lexer::{tokenize_line, Token, TokenKind};

/// Parse a single line of GCode into structured data
pub fn parse_line(line: &str) -> ParsedLine {
    let tokens = lexer::tokenize_line(line);
    ast::tokens_to_parsed_line(tokens)
}
