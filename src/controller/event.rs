use strum_macros::{Display, IntoStaticStr};

/// Events a controller broadcasts to its listeners during the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum ControllerEvent {
    /// Before the startup hook.
    Startup,
    /// Before the render method is looked up.
    Render,
    /// Before the shutdown hook.
    Shutdown,
}

/// What a listener gets to see when an event fires.
#[derive(Debug, Clone, Copy)]
pub struct EventDetail<'a> {
    pub event: ControllerEvent,
    pub controller: &'static str,
    pub action: &'a str,
    pub view: &'a str,
}

pub(crate) type Listener = Box<dyn FnMut(&EventDetail<'_>) + Send>;
