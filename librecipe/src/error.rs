//! Error types for recipe parsing and encoding.

use thiserror::Error;

/// Result type for recipe parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => format!(" at {}:{}", line + 1, col + 1),
        }
    }

    /// Format a file-only suffix for errors without a position.
    pub fn file_suffix(&self) -> String {
        match &self.filename {
            Some(name) => format!(" in <{}>", name),
            None => String::new(),
        }
    }
}

/// Error type for recipe parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The YAML decoder rejected the input.
    #[error("YAML parse error: {message}{location}")]
    Yaml { message: String, location: String },

    /// The document decoded, but its root is not a mapping.
    #[error("Manifest root must be a mapping, found {0}{1}")]
    RootNotMapping(&'static str, String),

    /// A YAML mapping key that cannot become a string key.
    #[error("Unsupported mapping key type {0}{1}")]
    UnsupportedKey(&'static str, String),

    /// No parser accepts the given path.
    #[error("Unsupported manifest file: {0}")]
    UnsupportedFormat(String),
}

impl ParseError {
    /// Wrap a `serde_yaml` error, moving its position into the location
    /// suffix.
    pub fn from_yaml(err: &serde_yaml::Error, ctx: &ParseContext) -> Self {
        let mut message = err.to_string();
        let location = match err.location() {
            Some(loc) => {
                let own = format!(" at line {} column {}", loc.line(), loc.column());
                if let Some(stripped) = message.strip_suffix(&own) {
                    message = stripped.to_string();
                }
                ctx.loc_suffix(loc.line().saturating_sub(1), loc.column().saturating_sub(1))
            }
            None => ctx.file_suffix(),
        };
        ParseError::Yaml { message, location }
    }
}

/// Error type for encoding a manifest tree.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// A key that the bracket-path dialect cannot spell.
    #[error("Key {0:?} cannot be written as a bracket path")]
    InvalidKey(String),

    /// The make format needs a mapping at the root.
    #[error("Only a mapping can be written as a make file")]
    RootNotMapping,

    /// A value the make dialect has no spelling for, e.g. a string with a
    /// line break. Carries the bracket path.
    #[error("Value at {0} cannot be written on a single make line")]
    UnrepresentableValue(String),

    #[error("YAML encode error: {0}")]
    Yaml(String),
}
