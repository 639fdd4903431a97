//! The new mail notification loop.
//!
//! Every clock tick advances a counter; every `delay` ticks the loop asks the
//! status provider for folder statuses, keeps the watched folders that report
//! recent mail, renders one line per folder and raises a single notification
//! with all the lines.

mod batch;
mod clock;
mod poll_loop;
mod template;

pub use batch::*;
pub use clock::*;
pub use poll_loop::*;
pub use template::*;
