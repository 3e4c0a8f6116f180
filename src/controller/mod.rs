//! Controllers and the building blocks of their lifecycle.
//!
//! A controller is a struct carrying a [`ControllerContext`] plus an impl block whose
//! method names say which lifecycle phase they serve:
//!
//! ```rust
//! use allo_controller::prelude::*;
//!
//! struct Greeter;
//!
//! #[controller]
//! pub struct HomepageController {
//!     ctx: ControllerContext,
//!     greeter: Option<Arc<Greeter>>,
//! }
//!
//! #[lifecycle]
//! impl HomepageController {
//!     fn inject_greeter(&mut self, greeter: Arc<Greeter>) {
//!         self.greeter = Some(greeter);
//!     }
//!
//!     async fn action_default(&mut self, params: &Params) {
//!         if params.contains_key("id") {
//!             self.set_view("detail");
//!         }
//!     }
//!
//!     fn render_default(&mut self) -> Result<Flow> {
//!         self.send_text("Default")
//!     }
//!
//!     fn render_detail(&mut self) -> Result<Flow> {
//!         self.send_json(&serde_json::json!({ "detail": true }), false)
//!     }
//! }
//! ```
//!
//! `#[controller]` implements [`Controller`]; `#[lifecycle]` implements
//! [`ControllerMethods`], which lists every method under its convention name
//! (`inject_greeter` becomes `injectGreeter`). Methods that do not follow the
//! convention are left alone.

mod context;
mod event;
mod exit;
mod loader;
pub mod method_set;

pub use context::{ControllerContext, HttpRequest, Params};
pub use event::{ControllerEvent, EventDetail};
pub use exit::{ExitSignal, Flow, IntoOutcome};
pub use loader::{ControllerInstance, ControllerLoader};
pub use method_set::{BoxFuture, ControllerMethods, Handler, MethodSet};

use crate::common::response::{
    download_response, file_response, json_response, redirect_response, text_response,
};
use crate::common::{HttpResponse, NamedFile};
use crate::error::Result;
use serde::Serialize;

/// A controller type.
///
/// Normally implemented by `#[controller]`. Everything except construction and
/// access to the [`ControllerContext`] is provided.
pub trait Controller: Send + Sized + 'static {
    /// Declared name, used to resolve the controller from routing meta.
    const NAME: &'static str;

    fn create(context: ControllerContext) -> Self;

    fn context(&self) -> &ControllerContext;

    fn context_mut(&mut self) -> &mut ControllerContext;

    /// Create an instance for one request.
    fn instantiate(request: HttpRequest, action: impl Into<String>, params: Params) -> Self {
        Self::create(ControllerContext::new(Self::NAME, request, action, params))
    }

    /// The action resolved by routing.
    fn action(&self) -> &str {
        self.context().action()
    }

    /// The view whose render method will run: the forced view or the action.
    fn view(&self) -> &str {
        self.context().view()
    }

    fn set_view(&mut self, view: impl Into<String>) {
        self.context_mut().set_view(view);
    }

    fn params(&self) -> &Params {
        self.context().params()
    }

    fn http_request(&self) -> &HttpRequest {
        self.context().request()
    }

    /// The response sent so far, if any.
    fn http_response(&self) -> Option<&HttpResponse> {
        self.context().response()
    }

    fn add_event_listener<F>(&mut self, event: ControllerEvent, listener: F)
    where
        F: FnMut(&EventDetail<'_>) + Send + 'static,
    {
        self.context_mut().add_event_listener(event, listener);
    }

    /// Finish the request with `response`. Return the result from the lifecycle
    /// method to stop the remaining phases.
    fn send_response(&mut self, response: HttpResponse) -> Result<Flow> {
        self.context_mut().send_response(response)
    }

    fn send_json<T: Serialize + ?Sized>(&mut self, data: &T, pretty: bool) -> Result<Flow> {
        let response = json_response(data, pretty)?;
        self.send_response(response)
    }

    fn send_text(&mut self, text: impl Into<String>) -> Result<Flow> {
        self.send_response(text_response(text))
    }

    fn send_file(&mut self, file: NamedFile) -> Result<Flow> {
        self.send_response(file_response(file))
    }

    fn send_download_file(&mut self, file: NamedFile, download_name: &str) -> Result<Flow> {
        let response = download_response(file, download_name)?;
        self.send_response(response)
    }

    fn redirect_url(&mut self, url: &str) -> Result<Flow> {
        let response = redirect_response(url)?;
        self.send_response(response)
    }
}
