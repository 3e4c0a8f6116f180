use crate::common::case;
use crate::error::{ControllerError, Result};
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

/// A type-erased shared dependency instance.
pub type Dependency = Arc<dyn Any + Send + Sync>;

/// Name-keyed dependency registry.
///
/// Every name is registered at most once, during startup. Once the container is
/// handed to a [`ControllerManager`](crate::manager::ControllerManager) it is only
/// read, so any number of concurrent dispatches may resolve from it.
pub struct Container {
    dependencies: DashMap<String, Dependency>,
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            dependencies: self.dependencies.clone(),
        }
    }
}

impl Container {
    pub fn new() -> Self {
        Self {
            dependencies: DashMap::new(),
        }
    }

    pub fn register<T: 'static + Send + Sync>(&mut self, name: &str, instance: T) -> Result<&mut Self> {
        self.register_arc(name, Arc::new(instance))
    }

    /// Register an instance that is also held elsewhere.
    pub fn register_arc<T: 'static + Send + Sync>(
        &mut self,
        name: &str,
        instance: Arc<T>,
    ) -> Result<&mut Self> {
        if !case::is_camel(name) {
            return Err(ControllerError::configuration(format!(
                "Invalid dependency name: {name}. Case must be camel"
            )));
        }
        if self.dependencies.contains_key(name) {
            return Err(ControllerError::configuration(format!(
                "Dependency \"{name}\" already exists"
            )));
        }

        tracing::debug!(
            dependency = name,
            type_name = std::any::type_name::<T>(),
            "Registered dependency"
        );
        self.dependencies.insert(name.to_string(), instance);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Result<Dependency> {
        self.dependencies
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ControllerError::DependencyNotFound {
                name: name.to_string(),
            })
    }

    pub fn resolve<T: 'static + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        downcast(name, self.get(name)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dependencies
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Recover the concrete type of a dependency resolved under `name`.
pub fn downcast<T: 'static + Send + Sync>(name: &str, dependency: Dependency) -> Result<Arc<T>> {
    dependency
        .downcast::<T>()
        .map_err(|_| ControllerError::DowncastFailed {
            name: name.to_string(),
            type_name: std::any::type_name::<T>().to_string(),
        })
}
