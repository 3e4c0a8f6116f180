use super::{Controller, ControllerMethods, HttpRequest, Params};
use crate::common::HttpResponse;
use crate::di::Container;
use crate::error::{ControllerError, Result};
use crate::lifecycle::Lifecycle;
use async_trait::async_trait;
use dashmap::DashMap;

/// A controller created for one request, with its concrete type erased.
#[async_trait]
pub trait ControllerInstance: Send {
    /// Declared name of the controller type.
    fn name(&self) -> &'static str;

    /// Run the whole lifecycle and produce the response.
    async fn run(self: Box<Self>, container: &Container) -> Result<HttpResponse>;
}

#[async_trait]
impl<C> ControllerInstance for C
where
    C: Controller + ControllerMethods,
{
    fn name(&self) -> &'static str {
        C::NAME
    }

    async fn run(self: Box<Self>, container: &Container) -> Result<HttpResponse> {
        let mut controller = self;
        Lifecycle::new(container).dispatch(&mut *controller).await
    }
}

type Factory = fn(HttpRequest, &str, Params) -> Box<dyn ControllerInstance>;

fn construct<C>(request: HttpRequest, action: &str, params: Params) -> Box<dyn ControllerInstance>
where
    C: Controller + ControllerMethods,
{
    Box::new(C::instantiate(request, action, params))
}

struct Registration {
    name: &'static str,
    factory: Factory,
}

/// Resolves controller names to controller types.
///
/// A request for controller `Homepage` looks for a type declared as
/// `HomepageController` first and `Homepage` second.
#[derive(Default)]
pub struct ControllerLoader {
    registrations: DashMap<String, Registration>,
}

impl ControllerLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C>(&mut self) -> Result<&mut Self>
    where
        C: Controller + ControllerMethods,
    {
        if self.registrations.contains_key(C::NAME) {
            return Err(ControllerError::configuration(format!(
                "Controller \"{}\" is already registered",
                C::NAME
            )));
        }
        self.registrations.insert(
            C::NAME.to_string(),
            Registration {
                name: C::NAME,
                factory: construct::<C>,
            },
        );
        tracing::info!(controller = C::NAME, "Registered controller");
        Ok(self)
    }

    pub fn contains(&self, controller: &str) -> bool {
        self.lookup(controller).is_some()
    }

    /// Registered controller names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.registrations.iter().map(|entry| entry.value().name).collect();
        names.sort_unstable();
        names
    }

    fn lookup(&self, controller: &str) -> Option<Factory> {
        self.registrations
            .get(&format!("{controller}Controller"))
            .or_else(|| self.registrations.get(controller))
            .map(|entry| entry.value().factory)
    }

    /// Create a fresh instance of `controller` for one request.
    pub fn create_instance(
        &self,
        request: HttpRequest,
        controller: &str,
        action: &str,
        params: Params,
    ) -> Result<Box<dyn ControllerInstance>> {
        let factory = self
            .lookup(controller)
            .ok_or_else(|| ControllerError::ControllerNotFound {
                name: controller.to_string(),
            })?;
        Ok(factory(request, action, params))
    }
}
