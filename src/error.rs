use thiserror::Error;

pub type Result<T> = std::result::Result<T, RudderError>;

#[derive(Debug, Error)]
pub enum RudderError {
    #[error("invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to read a path while expanding glob pattern: {0}")]
    Glob(#[from] glob::GlobError),

    #[error(
        "no module registered for '{path}'; register it with register_module! or ModuleRegistry::register"
    )]
    ModuleNotRegistered { path: String },

    #[error("failed to load module '{path}': {message}")]
    ModuleLoad { path: String, message: String },

    #[error("unsupported discovery mode: {message}")]
    UnsupportedMode { message: String },

    #[error("filesystem error during discovery: {0}")]
    Io(#[from] std::io::Error),
}

impl RudderError {
    pub fn invariant(message: impl Into<String>) -> Self {
        RudderError::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn unsupported_mode(message: impl Into<String>) -> Self {
        RudderError::UnsupportedMode {
            message: message.into(),
        }
    }
}
