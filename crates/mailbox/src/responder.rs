//! The polling loop: IMAP in, SMTP out.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_imap::types::Fetch;
use async_native_tls::TlsStream;
use futures::TryStreamExt;
use mediar_notify::Mailer;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use crate::config::MailboxConfig;
use crate::error::MailboxError;
use crate::ledger::{Disposition, ReplyLedger};
use crate::reply::{plan_reply, InboundMessage, ReplyDecision};

type ImapSession = async_imap::Session<TlsStream<TcpStream>>;

/// Peek so a message whose reply fails stays unseen for the next cycle.
const FETCH_QUERY: &str = "(UID BODY.PEEK[])";

/// What one polling cycle did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub replied: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Responder {
    config: MailboxConfig,
    mailer: Mailer,
    ledger: Mutex<ReplyLedger>,
}

impl Responder {
    pub fn new(config: MailboxConfig) -> Self {
        let mailer = Mailer::new(config.email.clone());
        let ledger = Mutex::new(ReplyLedger::new(config.max_send_attempts));
        Self {
            config,
            mailer,
            ledger,
        }
    }

    fn ledger(&self) -> MutexGuard<'_, ReplyLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Poll every `poll_interval` until `cancel` fires. A failed cycle is
    /// logged and the loop carries on.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Mailbox responder cancelled");
                    break;
                }
                _ = interval.tick() => {
                    match self.poll_once().await {
                        Ok(report) if report.fetched > 0 => tracing::info!(
                            fetched = report.fetched,
                            replied = report.replied,
                            skipped = report.skipped,
                            failed = report.failed,
                            "Mailbox cycle complete"
                        ),
                        Ok(_) => tracing::debug!("No unseen messages"),
                        Err(e) => tracing::error!(error = %e, "Mailbox cycle failed"),
                    }
                }
            }
        }
    }

    /// One cycle: connect, answer every unseen message, log out.
    pub async fn poll_once(&self) -> Result<CycleReport, MailboxError> {
        let mut session = self.connect().await?;
        let result = self.process_unseen(&mut session).await;
        if let Err(e) = session.logout().await {
            tracing::warn!(error = %e, "IMAP logout failed");
        }
        result
    }

    async fn connect(&self) -> Result<ImapSession, MailboxError> {
        let host = self.config.imap_host.as_str();
        let tcp = TcpStream::connect((host, self.config.imap_port)).await?;
        let tls = async_native_tls::TlsConnector::new()
            .connect(host, tcp)
            .await?;

        let client = async_imap::Client::new(tls);
        let mut session = client
            .login(&self.config.imap_user, &self.config.imap_password)
            .await
            .map_err(|(e, _client)| e)?;
        session.select(&self.config.mailbox).await?;
        tracing::debug!(host, mailbox = %self.config.mailbox, "IMAP session open");
        Ok(session)
    }

    async fn process_unseen(&self, session: &mut ImapSession) -> Result<CycleReport, MailboxError> {
        let mut uids: Vec<u32> = session.uid_search("UNSEEN").await?.into_iter().collect();
        if uids.is_empty() {
            return Ok(CycleReport::default());
        }
        uids.sort_unstable();

        let uid_set = uids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let fetches: Vec<Fetch> = session
            .uid_fetch(&uid_set, FETCH_QUERY)
            .await?
            .try_collect()
            .await?;

        let mut report = CycleReport {
            fetched: fetches.len(),
            ..CycleReport::default()
        };

        for fetch in &fetches {
            let Some(uid) = fetch.uid else {
                tracing::warn!("Fetched message without a UID, ignoring");
                report.failed += 1;
                continue;
            };

            let disposition = self.ledger().disposition(uid);
            let handled = match disposition {
                Disposition::AlreadyAnswered => {
                    tracing::debug!(uid, "Reply already sent, retrying the seen flag");
                    true
                }
                Disposition::GiveUp => {
                    tracing::error!(
                        uid,
                        attempts = self.config.max_send_attempts,
                        "Reply keeps failing, marking seen without reply"
                    );
                    report.failed += 1;
                    true
                }
                Disposition::Answer => match self.answer(uid, fetch.body()).await {
                    Ok(true) => {
                        self.ledger().record_answered(uid);
                        report.replied += 1;
                        true
                    }
                    Ok(false) => {
                        report.skipped += 1;
                        true
                    }
                    Err(e) => {
                        let attempts = self.ledger().record_send_failure(uid);
                        tracing::warn!(uid, attempts, error = %e, "Reply failed, message left unseen");
                        report.failed += 1;
                        false
                    }
                },
            };

            if handled {
                match mark_seen(session, uid).await {
                    Ok(()) => self.ledger().record_seen(uid),
                    Err(e) => tracing::warn!(
                        uid,
                        error = %e,
                        "Could not flag message as seen, will retry next cycle"
                    ),
                }
            }
        }

        Ok(report)
    }

    /// Plan and send the answer to one message. `Ok(false)` when skipped.
    async fn answer(&self, uid: u32, raw: Option<&[u8]>) -> Result<bool, MailboxError> {
        let Some(message) = raw.and_then(InboundMessage::parse) else {
            tracing::warn!(uid, "Unparseable message, marking seen without reply");
            return Ok(false);
        };

        match plan_reply(&message, self.mailer.from_address()) {
            ReplyDecision::Skip(reason) => {
                tracing::info!(uid, reason = reason.as_str(), "Not answering message");
                Ok(false)
            }
            ReplyDecision::Reply {
                email,
                classification,
            } => {
                self.mailer.send(&email).await?;
                tracing::info!(
                    uid,
                    to = %email.to,
                    categoria = classification.category.as_str(),
                    confianza = classification.confidence,
                    "Auto-reply sent"
                );
                Ok(true)
            }
        }
    }
}

async fn mark_seen(session: &mut ImapSession, uid: u32) -> Result<(), MailboxError> {
    let _: Vec<Fetch> = session
        .uid_store(uid.to_string(), "+FLAGS (\\Seen)")
        .await?
        .try_collect()
        .await?;
    Ok(())
}
