// Core data models for Stint

pub mod state;
pub mod snapshot;
pub mod record;

pub use state::*;
pub use snapshot::*;
pub use record::*;
