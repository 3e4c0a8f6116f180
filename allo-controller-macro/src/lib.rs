use proc_macro::TokenStream;

mod case;
mod controller;
mod lifecycle;

/// Attribute macro for defining a controller struct
///
/// The struct needs exactly one `ControllerContext` field; every other field
/// starts from its `Default` value. The declared name is the struct name unless
/// `name = "..."` is given.
///
/// # Example
/// ```ignore
/// use allo_controller::prelude::*;
///
/// #[controller]
/// pub struct HomepageController {
///     ctx: ControllerContext,
///     visits: u32,
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Attribute macro for the impl block holding a controller's lifecycle methods
///
/// Methods are picked up by name:
/// - `startup`, `before_render`, `after_render`, `shutdown`: no arguments
/// - `inject_<name>`: one `Arc<T>` argument, the dependency registered as `name`
/// - `action_<name>`, `render_<name>`: optionally the route parameters (`&Params`)
///
/// Any other method is left alone.
///
/// # Example
/// ```ignore
/// #[lifecycle]
/// impl HomepageController {
///     async fn action_show(&mut self, params: &Params) -> Result<Flow> {
///         let id = params.get("id").cloned().unwrap_or_default();
///         self.send_text(id)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn lifecycle(attr: TokenStream, item: TokenStream) -> TokenStream {
    lifecycle::lifecycle_attribute(attr, item)
}
