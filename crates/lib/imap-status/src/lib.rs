//! IMAP-backed folder status provider.

mod fetch_status;
mod mailbox_name;
mod provider;

pub use fetch_status::*;
pub use mailbox_name::*;
pub use provider::*;
