//! axum adapter.
//!
//! Maps URL masks to controller metas. Path parameters matched by axum become the
//! controller's parameter map; failed dispatches go through an
//! [`ExceptionFilter`].

use crate::controller::{HttpRequest, Params};
use crate::error::Result;
use crate::exception::{ExceptionFilter, HttpExceptionFilter};
use crate::manager::ControllerManager;
use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, MethodRouter};
use axum::Router;
use std::sync::Arc;

/// Routes collected before building the [`Router`].
pub struct RouterList {
    manager: Arc<ControllerManager>,
    filter: Arc<dyn ExceptionFilter>,
    routes: Vec<(String, MethodRouter)>,
    controllers: Vec<(String, String)>,
}

impl RouterList {
    pub fn new(manager: Arc<ControllerManager>) -> Self {
        Self {
            manager,
            filter: Arc::new(HttpExceptionFilter),
            routes: Vec::new(),
            controllers: Vec::new(),
        }
    }

    /// Replace the filter used for every controller route.
    pub fn with_exception_filter<F: ExceptionFilter>(mut self, filter: F) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Add a plain axum route.
    pub fn add(mut self, path: &str, route: MethodRouter) -> Self {
        self.routes.push((path.to_string(), route));
        self
    }

    /// Dispatch requests matching `mask` to the controller named by `meta`.
    ///
    /// `meta` is validated here so a typo fails at startup instead of on the
    /// first request.
    pub fn add_controller(mut self, mask: &str, meta: &str) -> Result<Self> {
        self.manager.parse_meta(meta)?;
        tracing::info!(mask, meta, "Registered controller route");
        self.controllers.push((mask.to_string(), meta.to_string()));
        Ok(self)
    }

    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        for (path, route) in self.routes {
            router = router.route(&path, route);
        }
        for (mask, meta) in self.controllers {
            let route = controller_route(
                Arc::clone(&self.manager),
                Arc::clone(&self.filter),
                Arc::from(meta),
            );
            router = router.route(&mask, route);
        }
        router
    }
}

fn controller_route(
    manager: Arc<ControllerManager>,
    filter: Arc<dyn ExceptionFilter>,
    meta: Arc<str>,
) -> MethodRouter {
    any(
        move |path: Option<Path<Params>>, request: HttpRequest| async move {
            let params = path.map(|Path(params)| params).unwrap_or_default();
            dispatch(&manager, filter.as_ref(), &meta, request, params).await
        },
    )
}

async fn dispatch(
    manager: &ControllerManager,
    filter: &dyn ExceptionFilter,
    meta: &str,
    request: HttpRequest,
    params: Params,
) -> Response {
    match manager.create_response(meta, request, params).await {
        Ok(response) => response.into_response(),
        Err(error) => filter.catch(error),
    }
}
