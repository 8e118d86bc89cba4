use thiserror::Error;

pub type ContextResult<T> = Result<T, ContextError>;
pub type DirectiveResult<T> = Result<T, DirectiveError>;
pub type RenderResult<T> = Result<T, RenderError>;

/// Failure reported by a [`crate::Context`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    #[error("Context does not support '{method}'")]
    Unsupported { method: String },

    #[error("{0}")]
    Evaluation(String),
}

impl ContextError {
    pub fn unsupported(method: &str) -> Self {
        ContextError::Unsupported {
            method: method.to_string(),
        }
    }
}

/// Failure while parsing or rendering a single directive
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectiveError {
    #[error("Syntax error in '{directive}' directive: {value}")]
    Syntax { directive: String, value: String },

    #[error("Empty '{directive}' directive")]
    Empty { directive: String },

    #[error("Required parameter '{name}' was not supplied")]
    RequiredParameter { name: String },

    #[error("Invalid {kind}: '{value}'")]
    InvalidValue { kind: String, value: String },

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Unable to resolve '{address}'")]
    Unresolved { address: String },
}

impl DirectiveError {
    pub fn syntax(directive: &str, value: &str) -> Self {
        DirectiveError::Syntax {
            directive: directive.to_string(),
            value: value.to_string(),
        }
    }

    pub fn empty(directive: &str) -> Self {
        DirectiveError::Empty {
            directive: directive.to_string(),
        }
    }

    pub fn invalid(kind: &str, value: &str) -> Self {
        DirectiveError::InvalidValue {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }

    /// The `data-error` flag text for this error, e.g. `required: x`
    pub fn flag(&self) -> String {
        let (kind, detail) = match self {
            DirectiveError::Syntax { value, .. } => ("syntax".to_string(), value.clone()),
            DirectiveError::Empty { directive } => (format!("{}-empty", directive), String::new()),
            DirectiveError::RequiredParameter { name } => ("required".to_string(), name.clone()),
            DirectiveError::InvalidValue { kind, value } => {
                (format!("{}-invalid", kind), value.clone())
            }
            DirectiveError::Context(error) => ("context".to_string(), error.to_string()),
            DirectiveError::Unresolved { address } => ("unresolved".to_string(), address.clone()),
        };
        if detail.is_empty() {
            kind
        } else {
            let detail = detail
                .replace('"', "'")
                .replace('@', " at ")
                .replace('\n', "\\n");
            format!("{}: {}", kind, detail)
        }
    }
}

/// Failure that aborts a whole render
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid {kind}: '{value}'")]
    InvalidValue { kind: String, value: String },
}

impl From<RenderError> for DirectiveError {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::InvalidValue { kind, value } => DirectiveError::InvalidValue { kind, value },
        }
    }
}
