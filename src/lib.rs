//! # allo-controller
//!
//! Convention-driven controllers for axum, with built-in dependency injection.
//!
//! A controller is a struct plus an impl block whose method names declare what
//! they do. For each request the manager creates a fresh instance and runs it
//! through a fixed lifecycle: inject dependencies, `startup`, the routed action,
//! `before_render`, the render method for the current view, `after_render`, and
//! finally `shutdown`, which always runs. Sending a response ends the request.
//!
//! ## Features
//!
//! - **Naming conventions**: `inject_<name>`, `action_<name>` and `render_<name>`
//!   methods are discovered by `#[lifecycle]`, no registration per method
//! - **Dependency Injection**: named dependencies registered once at startup
//! - **axum adapter**: map URL masks to `"Controller:action"` metas
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use allo_controller::prelude::*;
//!
//! pub struct Greeter {
//!     greeting: String,
//! }
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
//!     async fn render_default(&mut self) -> Result<Flow> {
//!         let greeting = self.greeter.as_ref().map(|g| g.greeting.clone());
//!         self.send_text(greeting.unwrap_or_default())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut manager = ControllerManager::new();
//!     manager
//!         .register::<HomepageController>()?
//!         .add_dependency("greeter", Greeter { greeting: "Hello".into() })?;
//!
//!     let app = RouterList::new(Arc::new(manager))
//!         .add_controller("/", "Homepage:default")?
//!         .into_router();
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

extern crate self as allo_controller;

pub mod common;
pub mod config;
pub mod controller;
pub mod di;
pub mod error;
pub mod exception;
pub mod lifecycle;
pub mod manager;
pub mod router;

// Re-export core types
pub use common::{HttpResponse, NamedFile};
pub use config::{ConfigService, DispatchConfig};
pub use controller::{
    Controller, ControllerContext, ControllerEvent, ControllerMethods, Flow, HttpRequest,
    IntoOutcome, Params,
};
pub use di::{Container, ContainerBuilder};
pub use error::{ControllerError, Result};
pub use exception::{ExceptionFilter, HttpExceptionFilter};
pub use lifecycle::Lifecycle;
pub use manager::{ControllerManager, ControllerMeta};
pub use router::RouterList;

// Re-export macros
pub use allo_controller_macro::{controller, lifecycle};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use allo_controller::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::{HttpResponse, NamedFile};
    pub use crate::controller::{
        Controller, ControllerContext, ControllerEvent, ControllerMethods, EventDetail, Flow,
        HttpRequest, Params,
    };
    pub use crate::di::{Container, ContainerBuilder};
    pub use crate::error::{ControllerError, Result};
    pub use crate::exception::{ExceptionFilter, HttpExceptionFilter};
    pub use crate::manager::ControllerManager;
    pub use crate::router::RouterList;
    pub use crate::{controller, lifecycle};
    pub use std::sync::Arc;
}
