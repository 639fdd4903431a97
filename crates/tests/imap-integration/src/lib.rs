//! Docker-backed IMAP test harness.

mod mail_server;

pub use mail_server::*;

/// Plaintext IMAP port exposed by the GreenMail container.
pub const IMAP_PORT: u16 = 3143;

/// Env var that opts into the Docker-backed tests.
pub const ENABLE_ENV: &str = "RUN_IMAP_INTEGRATION_TESTS";

/// Whether the Docker-backed tests should run; prints a hint when they are skipped.
pub fn integration_tests_enabled() -> bool {
    if std::env::var_os(ENABLE_ENV).is_some() {
        return true;
    }

    eprintln!("skipping IMAP integration tests; set {ENABLE_ENV}=true to run");

    false
}
