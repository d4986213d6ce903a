mod combine_latest;
mod concat;
mod fork_join;
mod join;
mod map;
mod switch_map;
#[cfg(test)]
mod tests;

pub use combine_latest::*;
pub use concat::*;
pub use fork_join::*;
pub use map::*;
pub use switch_map::*;
