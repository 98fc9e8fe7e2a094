//! Application state module

mod forms;
mod reference;
mod submission;

pub use forms::*;
pub use reference::*;
pub use submission::*;
