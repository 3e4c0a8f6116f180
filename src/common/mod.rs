pub mod case;
pub mod response;

pub use response::{HttpResponse, NamedFile};
