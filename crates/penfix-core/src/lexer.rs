//! Tokenizer for PENMAN text.
//!
//! Produces a flat token list with byte offsets. Comment lines (first
//! non-blank character `#`) are skipped entirely. Symbols and roles stop at
//! whitespace, parentheses, `/`, `:` and `"`.

use std::fmt;

use crate::error::DecodeError;

/// Token categories of the PENMAN surface syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    Slash,
    /// Role including its leading colon, e.g. `:ARG0-of`.
    Role(String),
    /// Bare symbol: variable, concept or unquoted constant.
    Symbol(String),
    /// Contents of a double-quoted string, escapes resolved.
    Str(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Role(r) => write!(f, "role {}", r),
            TokenKind::Symbol(s) => write!(f, "symbol {}", s),
            TokenKind::Str(s) => write!(f, "string \"{}\"", s),
        }
    }
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '/' | ':' | '"')
}

/// Splits `text` into tokens.
pub fn tokenize(text: &str) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut at_line_start = true;

    while let Some(&(offset, ch)) = chars.peek() {
        if ch == '\n' {
            at_line_start = true;
            chars.next();
            continue;
        }
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch == '#' && at_line_start {
            while let Some(&(_, c)) = chars.peek() {
                if c == '\n' {
                    break;
                }
                chars.next();
            }
            continue;
        }
        at_line_start = false;

        match ch {
            '(' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::LParen, offset });
            }
            ')' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::RParen, offset });
            }
            '/' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::Slash, offset });
            }
            ':' => {
                chars.next();
                let mut role = String::from(":");
                while let Some(&(_, c)) = chars.peek() {
                    if is_delimiter(c) {
                        break;
                    }
                    role.push(c);
                    chars.next();
                }
                if role.len() == 1 {
                    return Err(DecodeError::EmptyRole { offset });
                }
                tokens.push(Token { kind: TokenKind::Role(role), offset });
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => value.push(c),
                    }
                }
                if !closed {
                    return Err(DecodeError::UnterminatedString { offset });
                }
                tokens.push(Token { kind: TokenKind::Str(value), offset });
            }
            _ => {
                let mut symbol = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if is_delimiter(c) {
                        break;
                    }
                    symbol.push(c);
                    chars.next();
                }
                tokens.push(Token { kind: TokenKind::Symbol(symbol), offset });
            }
        }
    }

    Ok(tokens)
}
