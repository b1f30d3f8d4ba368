//! Deciding whether and how to answer an inbound message.
//!
//! Everything here is pure; [`crate::responder`] does the I/O.

use mail_parser::MessageParser;
use mediar_core::contact::{classify, Classification};
use mediar_core::email::{looks_like_email, normalize_email};
use mediar_notify::{templates, OutgoingEmail};

/// Local parts that never get an answer.
const AUTOMATED_LOCAL_PARTS: &[&str] = &[
    "no-reply",
    "noreply",
    "do-not-reply",
    "mailer-daemon",
    "postmaster",
];

/// The parts of an inbound message the responder looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    pub from_address: Option<String>,
    pub from_name: Option<String>,
    pub subject: Option<String>,
    /// `Message-ID` without angle brackets.
    pub message_id: Option<String>,
    pub auto_submitted: Option<String>,
    pub body_text: String,
}

impl InboundMessage {
    /// Parse a raw RFC 822 message. `None` if it is not parseable at all.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        let message = MessageParser::default().parse(raw)?;
        let from = message.from().and_then(|a| a.first());

        let auto_submitted = message
            .headers()
            .iter()
            .find(|h| h.name().eq_ignore_ascii_case("Auto-Submitted"))
            .and_then(|h| h.value().as_text())
            .map(|v| v.trim().to_string());

        Some(Self {
            from_address: from.and_then(|a| a.address()).map(str::to_string),
            from_name: from.and_then(|a| a.name()).map(str::to_string),
            subject: message.subject().map(str::to_string),
            message_id: message.message_id().map(str::to_string),
            auto_submitted,
            body_text: message
                .body_text(0)
                .map(|b| b.into_owned())
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoSender,
    OwnAddress,
    AutomatedSender,
    AutoSubmitted,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::NoSender => "no sender",
            SkipReason::OwnAddress => "sent by this mailbox",
            SkipReason::AutomatedSender => "automated sender",
            SkipReason::AutoSubmitted => "auto-submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyDecision {
    Reply {
        email: OutgoingEmail,
        classification: Classification,
    },
    Skip(SkipReason),
}

fn is_automated(address: &str) -> bool {
    let local = address.split('@').next().unwrap_or_default();
    AUTOMATED_LOCAL_PARTS.contains(&local)
}

fn reply_subject(subject: Option<&str>, fallback: &str) -> String {
    let subject = subject.map(str::trim).filter(|s| !s.is_empty());
    match subject {
        Some(s) if s.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("re:")) => s.to_string(),
        Some(s) => format!("Re: {s}"),
        None => format!("Re: {fallback}"),
    }
}

/// Decide the answer to `message`. `own_address` is the responder's sender
/// address, so it never answers itself.
pub fn plan_reply(message: &InboundMessage, own_address: &str) -> ReplyDecision {
    let Some(sender) = message
        .from_address
        .as_deref()
        .map(normalize_email)
        .filter(|a| looks_like_email(a))
    else {
        return ReplyDecision::Skip(SkipReason::NoSender);
    };

    if sender == normalize_email(own_address) {
        return ReplyDecision::Skip(SkipReason::OwnAddress);
    }
    if is_automated(&sender) {
        return ReplyDecision::Skip(SkipReason::AutomatedSender);
    }
    if message
        .auto_submitted
        .as_deref()
        .is_some_and(|v| !v.eq_ignore_ascii_case("no"))
    {
        return ReplyDecision::Skip(SkipReason::AutoSubmitted);
    }

    let text = format!(
        "{}\n{}",
        message.subject.as_deref().unwrap_or_default(),
        message.body_text
    );
    let classification = classify(&text);
    let template = templates::contact_auto_reply(
        classification.category,
        message.from_name.as_deref().unwrap_or_default(),
    );

    let email = OutgoingEmail {
        to: sender,
        subject: reply_subject(message.subject.as_deref(), &template.subject),
        body: template.body,
        in_reply_to: message.message_id.as_ref().map(|id| format!("<{id}>")),
    };
    ReplyDecision::Reply {
        email,
        classification,
    }
}
