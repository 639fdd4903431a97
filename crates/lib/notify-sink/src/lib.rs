//! Desktop notification delivery.

mod desktop;
mod notification;

pub use desktop::*;
pub use notification::*;
