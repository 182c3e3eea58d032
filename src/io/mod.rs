pub mod gpg;
pub mod paths;
pub mod store;

pub use paths::AppPaths;
pub use store::{Database, StoreError};
