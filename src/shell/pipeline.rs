use std::path::PathBuf;

use super::tokenizer::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    UnterminatedQuote(char),
    TrailingEscape,
    MissingRedirectTarget(&'static str),
    MissingCommand,
    EmptyPipelineSide,
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedQuote('\'') => write!(f, "syntax error: unterminated single quote"),
            Self::UnterminatedQuote(_) => write!(f, "syntax error: unterminated double quote"),
            Self::TrailingEscape => write!(f, "syntax error: nothing to escape after \\"),
            Self::MissingRedirectTarget(op) => write!(f, "syntax error: no file after {}", op),
            Self::MissingCommand => write!(f, "syntax error: missing command"),
            Self::EmptyPipelineSide => write!(f, "syntax error near unexpected token `|'"),
        }
    }
}

impl std::error::Error for LineError {}

/// Files substituted for a command's standard input and output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Redirections {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }
}

/// One command of a line with its operators already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub args: Vec<String>,
    pub redirects: Redirections,
}

impl Stage {
    pub fn program(&self) -> &str {
        self.args.first().map_or("", String::as_str)
    }
}

/// A classified input line. `right` is present only when the line contained
/// a bare `|`; only the first one splits, later ones are plain arguments of
/// the right-hand command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub left: Stage,
    pub right: Option<Stage>,
    pub background: bool,
}

impl Pipeline {
    /// Classifies a token sequence. Returns `Ok(None)` for an empty line.
    ///
    /// Operators are resolved in a fixed order: trailing `&`, then the first
    /// `|`, then `<`/`>` on each side independently.
    pub fn parse(mut tokens: Vec<Token>) -> Result<Option<Self>, LineError> {
        if tokens.is_empty() {
            return Ok(None);
        }

        let background = split_background(&mut tokens);
        let (left, right) = split_pipe(tokens);

        let left = extract_redirections(left)?;
        let right = right.map(extract_redirections).transpose()?;

        match (&left, &right) {
            (_, Some(right)) if left.args.is_empty() || right.args.is_empty() => {
                return Err(LineError::EmptyPipelineSide);
            }
            (_, None) if left.args.is_empty() => return Err(LineError::MissingCommand),
            _ => {}
        }

        Ok(Some(Pipeline {
            left,
            right,
            background,
        }))
    }

    pub fn is_pipeline(&self) -> bool {
        self.right.is_some()
    }
}

// A `&` anywhere but last stays a literal argument.
fn split_background(tokens: &mut Vec<Token>) -> bool {
    if tokens.last().is_some_and(|t| t.is_operator("&")) {
        tokens.pop();
        true
    } else {
        false
    }
}

fn split_pipe(mut tokens: Vec<Token>) -> (Vec<Token>, Option<Vec<Token>>) {
    match tokens.iter().position(|t| t.is_operator("|")) {
        Some(idx) => {
            let right = tokens.split_off(idx + 1);
            tokens.pop();
            (tokens, Some(right))
        }
        None => (tokens, None),
    }
}

fn extract_redirections(tokens: Vec<Token>) -> Result<Stage, LineError> {
    let mut args = Vec::with_capacity(tokens.len());
    let mut redirects = Redirections::default();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        let (slot, op) = if token.is_operator("<") {
            (&mut redirects.input, "<")
        } else if token.is_operator(">") {
            (&mut redirects.output, ">")
        } else {
            args.push(token.text);
            continue;
        };

        let target = iter.next().ok_or(LineError::MissingRedirectTarget(op))?;
        *slot = Some(PathBuf::from(target.text));
    }

    Ok(Stage { args, redirects })
}
