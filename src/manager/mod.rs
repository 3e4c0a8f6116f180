//! Controller Manager
//!
//! The entry point routers call: turns a routing meta plus request parameters into
//! a controller instance, runs its lifecycle and hands back the response.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut manager = ControllerManager::new();
//! manager.register::<HomepageController>()?;
//! manager.add_dependency("greeter", Greeter::default())?;
//!
//! let response = manager
//!     .create_response("Homepage:default", request, params)
//!     .await?;
//! ```

mod meta;

pub use meta::ControllerMeta;

use crate::common::case;
use crate::common::HttpResponse;
use crate::config::DispatchConfig;
use crate::controller::{Controller, ControllerLoader, ControllerMethods, HttpRequest, Params};
use crate::di::Container;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Owns the controller registry, the dependency container and the meta cache.
///
/// Configure it with `&mut self` methods, then share it behind an `Arc`.
pub struct ControllerManager {
    loader: ControllerLoader,
    container: Container,
    config: DispatchConfig,
    meta_cache: DashMap<String, ControllerMeta>,
}

impl Default for ControllerManager {
    fn default() -> Self {
        Self::with_config(DispatchConfig::default())
    }
}

impl ControllerManager {
    /// Create a manager whose override parameter names come from the environment.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::from_env())
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            loader: ControllerLoader::new(),
            container: Container::new(),
            config,
            meta_cache: DashMap::new(),
        }
    }

    /// Replace the dependency container, e.g. one made by
    /// [`ContainerBuilder`](crate::di::ContainerBuilder).
    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn register<C>(&mut self) -> Result<&mut Self>
    where
        C: Controller + ControllerMethods,
    {
        self.loader.register::<C>()?;
        Ok(self)
    }

    pub fn add_dependency<T: 'static + Send + Sync>(
        &mut self,
        name: &str,
        instance: T,
    ) -> Result<&mut Self> {
        self.container.register(name, instance)?;
        Ok(self)
    }

    pub fn add_shared_dependency<T: 'static + Send + Sync>(
        &mut self,
        name: &str,
        instance: Arc<T>,
    ) -> Result<&mut Self> {
        self.container.register_arc(name, instance)?;
        Ok(self)
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn loader(&self) -> &ControllerLoader {
        &self.loader
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Parse and validate a `"Controller:action"` meta, caching the result.
    pub fn parse_meta(&self, meta: &str) -> Result<ControllerMeta> {
        if let Some(parsed) = self.meta_cache.get(meta) {
            return Ok(parsed.clone());
        }
        let parsed: ControllerMeta = meta.parse()?;
        self.meta_cache.insert(meta.to_string(), parsed.clone());
        Ok(parsed)
    }

    /// The controller and action a request is dispatched to.
    ///
    /// Non-empty `controller` and `action` parameters (kebab-case) replace the
    /// values from `meta`. They come from the request, so only `meta` is cached.
    pub fn resolve_target(&self, meta: &str, params: &Params) -> Result<ControllerMeta> {
        let mut target = self.parse_meta(meta)?;

        if let Some(value) = non_empty(params, &self.config.controller_param) {
            target.controller = case::kebab_to_pascal(value);
        }
        if let Some(value) = non_empty(params, &self.config.action_param) {
            target.action = case::kebab_to_camel(value);
        }
        Ok(target)
    }

    /// Dispatch one request and return the response its controller sent.
    pub async fn create_response(
        &self,
        meta: &str,
        request: HttpRequest,
        params: Params,
    ) -> Result<HttpResponse> {
        let target = self.resolve_target(meta, &params)?;
        tracing::debug!(
            meta,
            controller = %target.controller,
            action = %target.action,
            "Dispatching request"
        );

        let instance =
            self.loader
                .create_instance(request, &target.controller, &target.action, params)?;
        instance.run(&self.container).await
    }
}

fn non_empty<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControllerError;
    use crate::prelude::*;
    use axum::body::Body;

    struct Greeter {
        greeting: String,
    }

    #[controller]
    struct HomepageController {
        ctx: ControllerContext,
        greeter: Option<Arc<Greeter>>,
    }

    #[lifecycle]
    impl HomepageController {
        fn inject_greeter(&mut self, greeter: Arc<Greeter>) {
            self.greeter = Some(greeter);
        }

        fn render_default(&mut self) -> Result<Flow> {
            let greeting = self
                .greeter
                .as_ref()
                .map(|g| g.greeting.clone())
                .unwrap_or_default();
            self.send_text(greeting)
        }
    }

    #[controller]
    struct ProductDetailController {
        ctx: ControllerContext,
    }

    #[lifecycle]
    impl ProductDetailController {
        async fn action_show_all(&mut self, params: &Params) -> Result<Flow> {
            let page = params.get("page").cloned().unwrap_or_else(|| "1".into());
            self.send_text(format!("products page {page}"))
        }
    }

    fn manager() -> ControllerManager {
        let mut manager = ControllerManager::default();
        manager
            .register::<HomepageController>()
            .unwrap()
            .register::<ProductDetailController>()
            .unwrap()
            .add_dependency(
                "greeter",
                Greeter {
                    greeting: "Hello".to_string(),
                },
            )
            .unwrap();
        manager
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn request() -> HttpRequest {
        HttpRequest::new(Body::empty())
    }

    #[tokio::test]
    async fn test_create_response() {
        let response = manager()
            .create_response("Homepage:default", request(), Params::new())
            .await
            .unwrap();
        assert_eq!(response.body_text(), Some("Hello"));
    }

    #[tokio::test]
    async fn test_params_override_meta() {
        let manager = manager();
        let overrides = params(&[
            ("controller", "product-detail"),
            ("action", "show-all"),
            ("page", "3"),
        ]);

        let target = manager.resolve_target("Homepage:default", &overrides).unwrap();
        assert_eq!(target.controller, "ProductDetail");
        assert_eq!(target.action, "showAll");

        let response = manager
            .create_response("Homepage:default", request(), overrides)
            .await
            .unwrap();
        assert_eq!(response.body_text(), Some("products page 3"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let target = manager()
            .resolve_target("Homepage:default", &params(&[("action", "")]))
            .unwrap();
        assert_eq!(target.action, "default");
    }

    #[test]
    fn test_custom_override_param_names() {
        let manager = ControllerManager::with_config(DispatchConfig {
            controller_param: "module".to_string(),
            action_param: "do".to_string(),
        });
        let target = manager
            .resolve_target(
                "Homepage:default",
                &params(&[("module", "product-detail"), ("action", "ignored")]),
            )
            .unwrap();
        assert_eq!(target.controller, "ProductDetail");
        assert_eq!(target.action, "default");
    }

    #[test]
    fn test_meta_is_cached() {
        let manager = manager();
        let first = manager.parse_meta("Homepage:default").unwrap();
        let second = manager.parse_meta("Homepage:default").unwrap();
        assert_eq!(first, second);
        assert_eq!(manager.meta_cache.len(), 1);
        assert!(manager.parse_meta("homepage").is_err());
        assert_eq!(manager.meta_cache.len(), 1);
    }

    #[test]
    fn test_override_values_are_not_retained() {
        let manager = manager();
        for i in 0..10_000 {
            let controller = format!("page-{i}");
            let action = format!("show-{i}");
            let target = manager
                .resolve_target(
                    "Homepage:default",
                    &params(&[("controller", controller.as_str()), ("action", action.as_str())]),
                )
                .unwrap();
            assert_eq!(target.controller, format!("Page{i}"));
            assert_eq!(target.action, format!("show{i}"));
        }
        assert_eq!(manager.meta_cache.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_meta_and_unknown_controller() {
        let manager = manager();

        let err = manager
            .create_response("Homepage", request(), Params::new())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ControllerError::InvalidMeta { .. }));

        let err = manager
            .create_response("Missing:default", request(), Params::new())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ControllerError::ControllerNotFound { ref name } if name == "Missing"));
    }

    #[test]
    fn test_invalid_dependency_names() {
        let mut manager = ControllerManager::default();
        manager.add_dependency("greeter", 1_u8).unwrap();

        for name in ["greeter", "Greeter", "my-greeter", ""] {
            let err = manager.add_dependency(name, 2_u8).err().unwrap();
            assert!(matches!(err, ControllerError::Configuration { .. }), "{name}");
        }
        assert_eq!(manager.container().len(), 1);
    }

    #[tokio::test]
    async fn test_with_container_from_builder() {
        let container = crate::di::ContainerBuilder::new()
            .register(
                "greeter",
                Greeter {
                    greeting: "Hi".to_string(),
                },
            )
            .build()
            .unwrap();
        let mut manager = ControllerManager::default().with_container(container);
        manager.register::<HomepageController>().unwrap();

        let response = manager
            .create_response("Homepage:default", request(), Params::new())
            .await
            .unwrap();
        assert_eq!(response.body_text(), Some("Hi"));
    }
}
