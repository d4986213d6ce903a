mod form;
mod model;
mod service;

pub use form::*;
pub use model::*;
pub use service::*;
