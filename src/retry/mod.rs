//! Bounded retry around the SMTP probe.
//!
//! Only transient replies are retried; acceptance, permanent rejection,
//! and transport errors all stop the loop on the spot. The whole budget
//! applies per exchanger, with a fixed pause between attempts.

use std::time::Duration;

use tracing::warn;

use crate::control::CancelToken;
use crate::dns::MailExchanger;
use crate::smtp::{ProbeMailbox, ProbeOutcome, SmtpError};
use crate::syntax::EmailAddress;

/// Retry budget for transient replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total probe invocations allowed, first attempt included.
    pub max_attempts: u32,
    /// Fixed delay between invocations.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(5),
        }
    }
}

/// What the retry loop settled on, and how many attempts it spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    pub outcome: ProbeOutcome,
    pub attempts: u32,
}

/// Probes one exchanger under `policy`.
///
/// A transient reply on the last allowed attempt is returned as the final
/// outcome, still tagged transient so the caller can tell greylisting from
/// a hard rejection. Cancellation skips the remaining backoff and returns
/// whatever the last attempt produced.
pub(crate) fn probe_with_retry<P: ProbeMailbox>(
    prober: &P,
    exchanger: &MailExchanger,
    recipient: &EmailAddress,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<RetryReport, SmtpError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        let outcome = prober.probe(exchanger, recipient, cancel)?;
        match outcome {
            ProbeOutcome::Accepted { .. } | ProbeOutcome::Rejected { .. } => {
                return Ok(RetryReport { outcome, attempts });
            }
            ProbeOutcome::Transient { .. } => {
                if attempts >= max_attempts {
                    return Ok(RetryReport { outcome, attempts });
                }
                let code = outcome.reply().code;
                warn!(
                    host = %exchanger.host,
                    code,
                    attempt = attempts,
                    "transient reply, backing off"
                );
                if cancel.wait(policy.backoff) {
                    return Ok(RetryReport { outcome, attempts });
                }
            }
        }
    }
}
