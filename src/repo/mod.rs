pub mod kv;
pub mod snapshot;
pub mod history;

pub use kv::*;
pub use snapshot::*;
pub use history::*;
