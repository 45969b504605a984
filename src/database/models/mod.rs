pub mod event;
pub mod overview;
pub mod queue;

pub use event::*;
pub use overview::*;
pub use queue::*;
