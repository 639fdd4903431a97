//! Docker-backed folder status tests.

use std::error::Error;

use imap_integration::MailServer;
use status_core::{StatusProvider as _, StatusRecord};

const IMAP_USER: &str = "test";
const IMAP_PASSWORD: &str = "secret";

fn inbox(records: &[StatusRecord]) -> Result<&StatusRecord, &'static str> {
    records
        .iter()
        .find(|record| record.directory == "INBOX")
        .ok_or("INBOX missing from status")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn status_reports_appended_mail() -> Result<(), Box<dyn Error + Send + Sync>> {
    if !imap_integration::integration_tests_enabled() {
        return Ok(());
    }

    let server = MailServer::start(IMAP_USER, IMAP_PASSWORD).await?;
    let mut provider = imap_status::ImapStatusProvider::new(server.login().await?);

    let before = provider.status().await?;
    let count_before: u32 = inbox(&before)?.count.parse()?;
    let unseen_before: u32 = inbox(&before)?.unseen.parse()?;

    let mut session = provider.into_inner();
    session
        .append(
            "INBOX",
            None,
            None,
            b"Subject: Integration Test\r\n\r\nHello from tests.\r\n",
        )
        .await?;
    session.noop().await?;
    let mut provider = imap_status::ImapStatusProvider::new(session);

    let after = provider.status().await?;
    let count_after: u32 = inbox(&after)?.count.parse()?;
    let unseen_after: u32 = inbox(&after)?.unseen.parse()?;

    assert_eq!(count_after, count_before + 1);
    assert!(unseen_after > unseen_before);

    provider.into_inner().logout().await?;

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn status_lists_every_selectable_folder() -> Result<(), Box<dyn Error + Send + Sync>> {
    if !imap_integration::integration_tests_enabled() {
        return Ok(());
    }

    let server = MailServer::start(IMAP_USER, IMAP_PASSWORD).await?;
    let mut session = server.login().await?;
    session.create("Work").await?;

    let mut provider = imap_status::ImapStatusProvider::new(session);
    let records = provider.status().await?;

    assert!(records.iter().any(|record| record.directory == "INBOX"));
    assert!(records.iter().any(|record| record.directory == "Work"));
    for record in &records {
        assert!(record.count.parse::<u32>().is_ok(), "{record:?}");
        assert!(record.recent.parse::<u32>().is_ok(), "{record:?}");
    }

    provider.into_inner().logout().await?;

    Ok(())
}
