use crate::error::ControllerError;
use axum::response::Response;

pub mod http;

pub use http::HttpExceptionFilter;

/// The ExceptionFilter trait
///
/// Filters turn a failed dispatch into the response sent to the client.
/// They must return a valid Response.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch a dispatch error and return a response
    fn catch(&self, error: ControllerError) -> Response;
}
