//! Error type shared by settings loading and controller initialization.

/// Everything that can stop the controller from starting or a settings file from applying.
#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
    #[error("unknown binding '{name}' for action '{action}'")]
    UnknownBinding { action: String, name: String },
    #[error("missing scene reference: {0}")]
    MissingReference(&'static str),
    #[error("expected exactly one {what}, found {found}")]
    Ambiguous { what: &'static str, found: usize },
    #[error("I/O while reading settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error in {path}: {message}")]
    Ron { path: String, message: String },
}

impl ControllerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ControllerError::InvalidSetting { field, reason: reason.into() }
    }
}
