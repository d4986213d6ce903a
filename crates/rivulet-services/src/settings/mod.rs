mod filter;
mod tenant;

pub use filter::*;
pub use tenant::*;
