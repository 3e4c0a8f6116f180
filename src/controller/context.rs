use super::event::{ControllerEvent, EventDetail, Listener};
use super::exit::{ExitSignal, Flow};
use crate::common::HttpResponse;
use crate::error::{ControllerError, Result};
use std::collections::HashMap;

/// The incoming request handed to a controller.
pub type HttpRequest = axum::extract::Request;

/// Route parameters of a request.
pub type Params = HashMap<String, String>;

/// Per-request state every controller carries.
///
/// Created by the loader for a single request and dropped with the controller once
/// the response is produced.
pub struct ControllerContext {
    controller: &'static str,
    request: HttpRequest,
    action: String,
    params: Params,
    forced_view: Option<String>,
    response: Option<HttpResponse>,
    sent_twice: bool,
    listeners: Vec<(ControllerEvent, Listener)>,
}

impl ControllerContext {
    pub fn new(
        controller: &'static str,
        request: HttpRequest,
        action: impl Into<String>,
        params: Params,
    ) -> Self {
        Self {
            controller,
            request,
            action: action.into(),
            params,
            forced_view: None,
            response: None,
            sent_twice: false,
            listeners: Vec::new(),
        }
    }

    /// Declared name of the owning controller.
    pub fn controller(&self) -> &'static str {
        self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Last response passed to [`send_response`](Self::send_response).
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Whether a second response was attempted, even if its error was discarded.
    pub fn sent_twice(&self) -> bool {
        self.sent_twice
    }

    /// Change which render method runs. No redirection occurs.
    pub fn set_view(&mut self, view: impl Into<String>) {
        self.forced_view = Some(view.into());
    }

    /// The forced view, or the action name if none was set.
    pub fn view(&self) -> &str {
        self.forced_view.as_deref().unwrap_or(&self.action)
    }

    /// Record `response` as the answer to this request and signal the exit.
    ///
    /// A request gets exactly one response; a second call fails with
    /// [`ControllerError::DoubleExit`].
    pub fn send_response(&mut self, response: HttpResponse) -> Result<Flow> {
        if self.response.is_some() {
            self.sent_twice = true;
            return Err(ControllerError::DoubleExit {
                controller: self.controller.to_string(),
            });
        }
        self.response = Some(response.clone());
        Ok(Flow::Exit(ExitSignal::new(self.controller, response)))
    }

    pub fn add_event_listener<F>(&mut self, event: ControllerEvent, listener: F)
    where
        F: FnMut(&EventDetail<'_>) + Send + 'static,
    {
        self.listeners.push((event, Box::new(listener)));
    }

    /// Notify the listeners registered for `event`, returning how many ran.
    pub fn dispatch_event(&mut self, event: ControllerEvent) -> usize {
        let detail = EventDetail {
            event,
            controller: self.controller,
            action: &self.action,
            view: self.forced_view.as_deref().unwrap_or(&self.action),
        };
        let mut notified = 0;
        for (_, listener) in self.listeners.iter_mut().filter(|(e, _)| *e == event) {
            listener(&detail);
            notified += 1;
        }
        notified
    }
}

impl std::fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerContext")
            .field("controller", &self.controller)
            .field("action", &self.action)
            .field("params", &self.params)
            .field("forced_view", &self.forced_view)
            .field("responded", &self.response.is_some())
            .field("sent_twice", &self.sent_twice)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::response::text_response;
    use axum::body::Body;
    use std::sync::{Arc, Mutex};

    fn context(action: &str) -> ControllerContext {
        let request = HttpRequest::new(Body::empty());
        ControllerContext::new("HomepageController", request, action, Params::new())
    }

    #[test]
    fn test_view_defaults_to_action() {
        let mut ctx = context("default");
        assert_eq!(ctx.view(), "default");

        ctx.set_view("fooBar");
        assert_eq!(ctx.view(), "fooBar");
        assert_eq!(ctx.action(), "default");
    }

    #[test]
    fn test_send_response_records_and_exits() {
        let mut ctx = context("default");
        assert!(ctx.response().is_none());

        let flow = ctx.send_response(text_response("hi")).unwrap();
        match flow {
            Flow::Exit(exit) => {
                assert_eq!(exit.controller(), "HomepageController");
                assert_eq!(exit.response().body_text(), Some("hi"));
            }
            Flow::Continue => panic!("expected an exit"),
        }
        assert_eq!(ctx.response().unwrap().body_text(), Some("hi"));
    }

    #[test]
    fn test_second_response_is_double_exit() {
        let mut ctx = context("default");
        let _ = ctx.send_response(text_response("first")).unwrap();
        assert!(!ctx.sent_twice());

        let err = ctx.send_response(text_response("second")).err().unwrap();
        assert!(matches!(err, ControllerError::DoubleExit { .. }));
        assert_eq!(ctx.response().unwrap().body_text(), Some("first"));
        assert!(ctx.sent_twice());
    }

    #[test]
    fn test_dispatch_event_only_reaches_matching_listeners() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut ctx = context("default");
        ctx.set_view("other");

        let log = Arc::clone(&seen);
        ctx.add_event_listener(ControllerEvent::Render, move |detail| {
            log.lock()
                .unwrap()
                .push(format!("{}:{}:{}", detail.event, detail.action, detail.view));
        });

        assert_eq!(ctx.dispatch_event(ControllerEvent::Startup), 0);
        assert_eq!(ctx.dispatch_event(ControllerEvent::Render), 1);
        assert_eq!(*seen.lock().unwrap(), vec!["render:default:other".to_string()]);
    }
}
