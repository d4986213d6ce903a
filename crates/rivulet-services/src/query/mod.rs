mod service;
mod typing;

pub use service::*;
pub use typing::*;
