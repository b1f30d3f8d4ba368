//! Per-UID bookkeeping that survives between polling cycles.
//!
//! A reply and the `\Seen` flag are two separate round trips. The ledger
//! remembers UIDs whose reply already went out so a failed flag store never
//! turns into a second reply, and counts failed sends so a message that can
//! never be answered is eventually flagged and dropped.

use std::collections::{HashMap, HashSet};

/// What the responder should do with an unseen message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Plan and send a reply.
    Answer,
    /// A reply was sent in an earlier cycle; only the flag is missing.
    AlreadyAnswered,
    /// Sending failed too many times; flag it without replying.
    GiveUp,
}

#[derive(Debug)]
pub struct ReplyLedger {
    max_send_attempts: u32,
    answered: HashSet<u32>,
    failures: HashMap<u32, u32>,
}

impl ReplyLedger {
    pub fn new(max_send_attempts: u32) -> Self {
        Self {
            max_send_attempts,
            answered: HashSet::new(),
            failures: HashMap::new(),
        }
    }

    pub fn disposition(&self, uid: u32) -> Disposition {
        if self.answered.contains(&uid) {
            Disposition::AlreadyAnswered
        } else if self.failures.get(&uid).copied().unwrap_or(0) >= self.max_send_attempts {
            Disposition::GiveUp
        } else {
            Disposition::Answer
        }
    }

    pub fn record_answered(&mut self, uid: u32) {
        self.failures.remove(&uid);
        self.answered.insert(uid);
    }

    /// Count a failed send; returns the attempts made so far.
    pub fn record_send_failure(&mut self, uid: u32) -> u32 {
        let attempts = self.failures.entry(uid).or_insert(0);
        *attempts += 1;
        *attempts
    }

    /// The message carries `\Seen` now; nothing left to track.
    pub fn record_seen(&mut self, uid: u32) {
        self.answered.remove(&uid);
        self.failures.remove(&uid);
    }

    pub fn is_empty(&self) -> bool {
        self.answered.is_empty() && self.failures.is_empty()
    }
}
