mod observable;
mod observer;
mod recorder;
mod source;
mod subscriber;
mod subscription;

pub use observable::*;
pub use observer::*;
pub use recorder::*;
pub use source::*;
pub use subscriber::*;
pub use subscription::*;
