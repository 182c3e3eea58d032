pub mod document;
pub mod tag;
pub mod task;

pub use document::*;
pub use tag::*;
pub use task::*;
