pub mod capability;
pub mod clock;
pub mod schedule;
pub mod stopwatch;

pub use capability::*;
pub use clock::*;
pub use schedule::*;
pub use stopwatch::*;
