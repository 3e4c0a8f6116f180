use crate::di::Container;
use crate::error::{ControllerError, Result};
use std::sync::Arc;

/// Builder for constructing a dependency container
///
/// Registration errors are remembered and reported by [`ContainerBuilder::build`],
/// so a whole startup configuration can be written as one chain.
///
/// # Example
/// ```
/// use allo_controller::di::ContainerBuilder;
///
/// struct Database;
/// struct Mailer;
///
/// let container = ContainerBuilder::new()
///     .register("database", Database)
///     .register("mailer", Mailer)
///     .build()
///     .unwrap();
/// assert_eq!(container.len(), 2);
/// ```
pub struct ContainerBuilder {
    container: Container,
    error: Option<ControllerError>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            container: Container::new(),
            error: None,
        }
    }

    pub fn register<T: 'static + Send + Sync>(self, name: &str, instance: T) -> Self {
        self.register_arc(name, Arc::new(instance))
    }

    pub fn register_arc<T: 'static + Send + Sync>(mut self, name: &str, instance: Arc<T>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.container.register_arc(name, instance) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Build the container, failing with the first registration error.
    pub fn build(self) -> Result<Container> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.container),
        }
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
