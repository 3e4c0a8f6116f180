use crate::common::case;
use crate::error::{ControllerError, Result};
use std::fmt;
use std::str::FromStr;

/// Routing target written as `"Controller:action"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerMeta {
    pub controller: String,
    pub action: String,
}

impl FromStr for ControllerMeta {
    type Err = ControllerError;

    fn from_str(meta: &str) -> Result<Self> {
        let Some((controller, action)) = meta.split_once(':') else {
            return Err(ControllerError::invalid_meta(
                meta,
                "expected \"Controller:action\"",
            ));
        };
        if !case::is_pascal(controller) {
            return Err(ControllerError::invalid_meta(
                meta,
                format!("controller name \"{controller}\" must be PascalCase"),
            ));
        }
        if !case::is_camel(action) {
            return Err(ControllerError::invalid_meta(
                meta,
                format!("action name \"{action}\" must be camelCase"),
            ));
        }

        Ok(Self {
            controller: controller.to_string(),
            action: action.to_string(),
        })
    }
}

impl ControllerMeta {
    /// URL path that routes back here through `/{controller}/{action}`.
    pub fn path(&self) -> String {
        format!(
            "/{}/{}",
            case::camel_to_kebab(&case::pascal_to_camel(&self.controller)),
            case::camel_to_kebab(&self.action)
        )
    }
}

impl fmt::Display for ControllerMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.controller, self.action)
    }
}
