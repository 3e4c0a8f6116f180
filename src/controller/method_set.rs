//! Classification of controller methods into lifecycle roles.
//!
//! A controller lists its methods by convention name through [`ControllerMethods`]
//! (normally generated by `#[lifecycle]`). The names decide the role:
//!
//! | Name                                             | Role                         |
//! |--------------------------------------------------|------------------------------|
//! | `startup`, `beforeRender`, `afterRender`, `shutdown` | common hook              |
//! | `inject<Name>`                                   | injector for dependency `name` |
//! | `action<Name>`                                   | handler for action `name`    |
//! | `render<Name>`                                   | handler for view `name`      |
//!
//! `<Name>` must be PascalCase; the key is its camelCase form. Anything else is a
//! helper and is ignored.

use super::context::Params;
use super::exit::Flow;
use crate::common::case;
use crate::di::Dependency;
use crate::error::Result;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, LazyLock};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// `startup`, `beforeRender`, `afterRender` and `shutdown`.
pub type HookFn<C> = for<'a> fn(&'a mut C) -> BoxFuture<'a, Result<Flow>>;

/// `inject<Name>`: receives the dependency registered as `name`.
pub type InjectFn<C> = for<'a> fn(&'a mut C, Dependency) -> BoxFuture<'a, Result<Flow>>;

/// `action<Name>` and `render<Name>`: receive the route parameters.
pub type ViewFn<C> = for<'a> fn(&'a mut C, &'a Params) -> BoxFuture<'a, Result<Flow>>;

/// An invocation shim for one controller method.
pub enum Handler<C> {
    Hook(HookFn<C>),
    Inject(InjectFn<C>),
    View(ViewFn<C>),
}

impl<C> Clone for Handler<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Handler<C> {}

/// Enumerates a controller type's lifecycle methods under their convention names.
pub trait ControllerMethods: Sized + 'static {
    fn methods() -> Vec<(&'static str, Handler<Self>)>;
}

/// The role a method name maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MagicMethod {
    Startup,
    BeforeRender,
    AfterRender,
    Shutdown,
    Inject(String),
    Action(String),
    Render(String),
}

/// Classify a convention method name. Returns `None` for helper methods.
pub fn classify(name: &str) -> Option<MagicMethod> {
    match name {
        "startup" => return Some(MagicMethod::Startup),
        "beforeRender" => return Some(MagicMethod::BeforeRender),
        "afterRender" => return Some(MagicMethod::AfterRender),
        "shutdown" => return Some(MagicMethod::Shutdown),
        _ => {}
    }

    let (kind, suffix) = ["inject", "action", "render"]
        .into_iter()
        .find_map(|prefix| name.strip_prefix(prefix).map(|suffix| (prefix, suffix)))?;

    if !case::is_pascal(suffix) {
        return None;
    }

    let key = case::pascal_to_camel(suffix);
    Some(match kind {
        "inject" => MagicMethod::Inject(key),
        "action" => MagicMethod::Action(key),
        _ => MagicMethod::Render(key),
    })
}

/// The lifecycle methods of one controller type, grouped by role.
pub struct MethodSet<C> {
    startup: Option<HookFn<C>>,
    before_render: Option<HookFn<C>>,
    after_render: Option<HookFn<C>>,
    shutdown: Option<HookFn<C>>,
    inject: Vec<(String, InjectFn<C>)>,
    action: HashMap<String, ViewFn<C>>,
    render: HashMap<String, ViewFn<C>>,
}

/// Comparable summary of a [`MethodSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSetShape {
    pub hooks: Vec<&'static str>,
    pub inject: Vec<String>,
    pub action: BTreeSet<String>,
    pub render: BTreeSet<String>,
}

static METHOD_SETS: LazyLock<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> =
    LazyLock::new(DashMap::new);

impl<C: 'static> MethodSet<C> {
    /// Sort `methods` into buckets. Later entries replace earlier ones with the
    /// same key.
    pub fn build<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Handler<C>)>,
    {
        let mut set = Self {
            startup: None,
            before_render: None,
            after_render: None,
            shutdown: None,
            inject: Vec::new(),
            action: HashMap::new(),
            render: HashMap::new(),
        };

        for (name, handler) in methods {
            let Some(role) = classify(name) else {
                tracing::trace!(method = name, "Ignoring helper method");
                continue;
            };
            match (role, handler) {
                (MagicMethod::Startup, Handler::Hook(f)) => set.startup = Some(f),
                (MagicMethod::BeforeRender, Handler::Hook(f)) => set.before_render = Some(f),
                (MagicMethod::AfterRender, Handler::Hook(f)) => set.after_render = Some(f),
                (MagicMethod::Shutdown, Handler::Hook(f)) => set.shutdown = Some(f),
                (MagicMethod::Inject(key), Handler::Inject(f)) => {
                    match set.inject.iter_mut().find(|(existing, _)| *existing == key) {
                        Some(entry) => entry.1 = f,
                        None => set.inject.push((key, f)),
                    }
                }
                (MagicMethod::Action(key), Handler::View(f)) => {
                    set.action.insert(key, f);
                }
                (MagicMethod::Render(key), Handler::View(f)) => {
                    set.render.insert(key, f);
                }
                (role, _) => {
                    tracing::warn!(
                        method = name,
                        ?role,
                        controller = std::any::type_name::<C>(),
                        "Method signature does not fit its lifecycle role; ignoring it"
                    );
                }
            }
        }

        set
    }

    pub fn startup(&self) -> Option<HookFn<C>> {
        self.startup
    }

    pub fn before_render(&self) -> Option<HookFn<C>> {
        self.before_render
    }

    pub fn after_render(&self) -> Option<HookFn<C>> {
        self.after_render
    }

    pub fn shutdown(&self) -> Option<HookFn<C>> {
        self.shutdown
    }

    /// Injectors in declaration order.
    pub fn injectors(&self) -> &[(String, InjectFn<C>)] {
        &self.inject
    }

    pub fn action(&self, name: &str) -> Option<ViewFn<C>> {
        self.action.get(name).copied()
    }

    pub fn render(&self, name: &str) -> Option<ViewFn<C>> {
        self.render.get(name).copied()
    }

    pub fn shape(&self) -> MethodSetShape {
        let hooks = [
            ("startup", self.startup.is_some()),
            ("beforeRender", self.before_render.is_some()),
            ("afterRender", self.after_render.is_some()),
            ("shutdown", self.shutdown.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();

        MethodSetShape {
            hooks,
            inject: self.inject.iter().map(|(key, _)| key.clone()).collect(),
            action: self.action.keys().cloned().collect(),
            render: self.render.keys().cloned().collect(),
        }
    }
}

impl<C: ControllerMethods> MethodSet<C> {
    /// The method set of `C`, built on first use and shared afterwards.
    ///
    /// Keyed by `TypeId`, so two controller types never share an entry even if
    /// they declare the same name.
    pub fn shared() -> Arc<Self> {
        let erased = METHOD_SETS
            .entry(TypeId::of::<C>())
            .or_insert_with(|| {
                tracing::debug!(controller = std::any::type_name::<C>(), "Building method set");
                Arc::new(Self::build(C::methods())) as Arc<dyn Any + Send + Sync>
            })
            .value()
            .clone();

        erased
            .downcast::<Self>()
            .unwrap_or_else(|_| Arc::new(Self::build(C::methods())))
    }
}
