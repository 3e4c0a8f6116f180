use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ControllerError>;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid controller meta '{meta}': {reason}")]
    InvalidMeta { meta: String, reason: String },

    #[error("Controller not found: {name}")]
    ControllerNotFound { name: String },

    #[error("Dependency not found: {name}")]
    DependencyNotFound { name: String },

    #[error("Dependency '{name}' is not of type {type_name}")]
    DowncastFailed { name: String, type_name: String },

    #[error("Controller {controller} completed action '{action}' without sending a response")]
    LifecycleIncomplete { controller: String, action: String },

    #[error("Controller {controller} attempted to send more than one response")]
    DoubleExit { controller: String },

    #[error("Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] axum::http::header::InvalidHeaderValue),

    /// The original failure of a request, with the error raised by `shutdown`
    /// while cleaning up after it.
    #[error("{error} (shutdown also failed: {suppressed})")]
    Suppressed {
        #[source]
        error: Box<ControllerError>,
        suppressed: Box<ControllerError>,
    },

    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl ControllerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_meta(meta: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMeta {
            meta: meta.into(),
            reason: reason.into(),
        }
    }

    /// Wrap any user error so it can leave a lifecycle method.
    pub fn handler<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Handler(anyhow::Error::new(error))
    }

    /// Attach a secondary failure to this error.
    pub fn with_suppressed(self, suppressed: ControllerError) -> Self {
        Self::Suppressed {
            error: Box::new(self),
            suppressed: Box::new(suppressed),
        }
    }

    /// The error that originally failed the request, looking through
    /// [`ControllerError::Suppressed`].
    pub fn original(&self) -> &ControllerError {
        match self {
            Self::Suppressed { error, .. } => error.original(),
            other => other,
        }
    }

    pub fn suppressed(&self) -> Option<&ControllerError> {
        match self {
            Self::Suppressed { suppressed, .. } => Some(suppressed),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.original() {
            Self::ControllerNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for ControllerError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
