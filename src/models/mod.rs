pub mod segment;
pub mod funnel;
pub mod task;

pub use segment::*;
pub use funnel::*;
pub use task::*;
