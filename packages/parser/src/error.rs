use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A closing construct with no open construct to close
    #[error("Unbalanced '{found}' at {pos}: no enclosing construct to close")]
    Unbalanced { pos: usize, found: String },
}

impl ParseError {
    pub fn unbalanced(pos: usize, found: impl Into<String>) -> Self {
        Self::Unbalanced {
            pos,
            found: found.into(),
        }
    }

    pub fn pos(&self) -> usize {
        match self {
            Self::Unbalanced { pos, .. } => *pos,
        }
    }
}
