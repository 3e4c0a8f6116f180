use strum_macros::{Display, EnumIter, IntoStaticStr};

/// The phases of a controller lifecycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum Phase {
    Inject,
    Startup,
    Action,
    BeforeRender,
    Render,
    AfterRender,
    Shutdown,
}
