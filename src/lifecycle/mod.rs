//! Controller Lifecycle Module
//!
//! Runs one controller through the fixed sequence of phases for a single request.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Inject        inject<Name>(dependency)   for every injector, in declaration order
//!    ↓
//! 2. Startup       startup()                  if defined
//!    ↓
//! 3. Action        action<Action>(params)     if defined for the routed action
//!    ↓
//! 4. BeforeRender  beforeRender()             if defined
//!    ↓
//! 5. Render        render<View>(params)       if defined for the current view
//!    ↓
//! 6. AfterRender   afterRender()              if defined
//!    ↓
//! 7. Shutdown      shutdown()                 always, exactly once
//! ```
//!
//! Any phase may end the request by sending a response
//! ([`Flow::Exit`](crate::controller::Flow::Exit)); the remaining phases up to
//! Shutdown are skipped. A request that reaches the end without a response fails
//! with [`LifecycleIncomplete`](crate::ControllerError::LifecycleIncomplete).
//!
//! # Example
//!
//! ```rust,ignore
//! use allo_controller::lifecycle::Lifecycle;
//!
//! let mut controller = HomepageController::instantiate(request, "default", params);
//! let response = Lifecycle::new(&container).dispatch(&mut controller).await?;
//! ```

mod orchestrator;
mod phase;

pub use orchestrator::Lifecycle;
pub use phase::Phase;
