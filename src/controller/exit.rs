use crate::common::HttpResponse;
use crate::error::{ControllerError, Result};

/// The final response of a request, on its way out of the lifecycle.
///
/// Only [`ControllerContext::send_response`](super::ControllerContext::send_response)
/// creates one, so holding an `ExitSignal` proves a response was sent.
#[derive(Debug)]
pub struct ExitSignal {
    controller: &'static str,
    response: HttpResponse,
}

impl ExitSignal {
    pub(crate) fn new(controller: &'static str, response: HttpResponse) -> Self {
        Self {
            controller,
            response,
        }
    }

    /// Declared name of the controller that sent the response.
    pub fn controller(&self) -> &'static str {
        self.controller
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    pub fn into_response(self) -> HttpResponse {
        self.response
    }
}

/// What a lifecycle method tells the orchestrator to do next.
#[must_use = "an exit must be returned to the lifecycle to take effect"]
#[derive(Debug)]
pub enum Flow {
    /// Move on to the next phase.
    Continue,
    /// Stop here and deliver the response.
    Exit(ExitSignal),
}

impl Flow {
    pub fn is_exit(&self) -> bool {
        matches!(self, Flow::Exit(_))
    }
}

/// Return types accepted from lifecycle methods.
///
/// `()` and `Ok(())` mean "continue"; `Flow` and `Ok(Flow)` are passed through;
/// errors are converted into [`ControllerError`].
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<Flow>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<Flow> {
        Ok(Flow::Continue)
    }
}

impl IntoOutcome for Flow {
    fn into_outcome(self) -> Result<Flow> {
        Ok(self)
    }
}

impl<E: Into<ControllerError>> IntoOutcome for std::result::Result<Flow, E> {
    fn into_outcome(self) -> Result<Flow> {
        self.map_err(Into::into)
    }
}

impl<E: Into<ControllerError>> IntoOutcome for std::result::Result<(), E> {
    fn into_outcome(self) -> Result<Flow> {
        self.map(|()| Flow::Continue).map_err(Into::into)
    }
}
