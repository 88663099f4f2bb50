//! POSIX-style word splitting with quote removal.

use super::pipeline::LineError;

/// One word of input. `quoted` records whether any part of the word came
/// from quoting or escaping, which makes operator characters literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub quoted: bool,
}

impl Token {
    /// True when this token is the unquoted operator `op`.
    pub fn is_operator(&self, op: &str) -> bool {
        !self.quoted && self.text == op
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, LineError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                quoted = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err(LineError::UnterminatedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                quoted = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        // Inside double quotes only `"` and `\` are escapable.
                        Some('\\') => match chars.next() {
                            Some(ch @ ('"' | '\\')) => current.push(ch),
                            Some(ch) => {
                                current.push('\\');
                                current.push(ch);
                            }
                            None => return Err(LineError::UnterminatedQuote('"')),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err(LineError::UnterminatedQuote('"')),
                    }
                }
            }
            '\\' => match chars.next() {
                Some(ch) => {
                    current.push(ch);
                    in_word = true;
                    quoted = true;
                }
                None => return Err(LineError::TrailingEscape),
            },
            c if c.is_ascii_whitespace() => {
                if in_word {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        quoted,
                    });
                    in_word = false;
                    quoted = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_word {
        tokens.push(Token {
            text: current,
            quoted,
        });
    }

    Ok(tokens)
}
