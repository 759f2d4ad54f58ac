mod bounds;
mod counters;
mod mutex;
mod spin;
mod worker;

pub use bounds::*;
pub use counters::*;
pub(crate) use mutex::*;
pub use spin::*;
pub use worker::*;
