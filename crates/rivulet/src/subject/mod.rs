mod behavior;
#[cfg(test)]
mod tests;

pub use behavior::*;
