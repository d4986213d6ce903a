mod interface;
mod virtual_clock;

pub use interface::*;
pub use virtual_clock::*;
