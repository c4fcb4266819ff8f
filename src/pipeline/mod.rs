//! The ordered validation pipeline.
//!
//! Stages run in a fixed order for each address: syntax, blacklist, MX
//! resolution, then the retried SMTP probe. The first terminal stage wins,
//! later stages never run, and every input yields exactly one
//! [`ValidationResult`].

mod types;

pub use types::{ValidationResult, VerdictStatus};

use tracing::debug;

use crate::blacklist::Blacklist;
use crate::config::EngineConfig;
use crate::control::CancelToken;
use crate::dns::{self, DnsError, LookupMx, MailExchanger};
use crate::retry::probe_with_retry;
use crate::smtp::{ProbeMailbox, ProbeOutcome, SmtpError, SmtpProber, SmtpReply};
use crate::syntax::{self, EmailAddress, SyntaxError};

pub(crate) const REASON_VALID: &str = "Email is valid and domain is active.";
pub(crate) const REASON_BLACKLISTED: &str = "Domain is blacklisted.";
pub(crate) const REASON_CANCELLED: &str = "Validation cancelled.";

/// Validates one address with the system resolver and a live prober.
pub fn validate(raw: &str, blacklist: &Blacklist, config: &EngineConfig) -> ValidationResult {
    validate_with_cancel(raw, blacklist, config, &CancelToken::new())
}

/// Same as [`validate`], honoring `cancel` at stage boundaries.
pub fn validate_with_cancel(
    raw: &str,
    blacklist: &Blacklist,
    config: &EngineConfig,
    cancel: &CancelToken,
) -> ValidationResult {
    let resolver = match dns::system_resolver(config.dns_timeout) {
        Ok(resolver) => resolver,
        Err(err) => {
            return ValidationResult::new(raw.trim(), VerdictStatus::Invalid, reason_for_dns(&err));
        }
    };
    let prober = SmtpProber::from_config(config);
    validate_with_components(raw, blacklist, config, &resolver, &prober, cancel)
}

/// Pipeline core, generic over the two network seams.
pub(crate) fn validate_with_components<R, P>(
    raw: &str,
    blacklist: &Blacklist,
    config: &EngineConfig,
    resolver: &R,
    prober: &P,
    cancel: &CancelToken,
) -> ValidationResult
where
    R: LookupMx,
    P: ProbeMailbox,
{
    let submitted = raw.trim();

    let address = match syntax::validate(submitted, config.validation_mode) {
        Ok(address) => address,
        Err(err) => {
            debug!(address = submitted, "syntax check failed");
            return ValidationResult::new(
                submitted,
                VerdictStatus::Invalid,
                reason_for_syntax(&err),
            );
        }
    };

    if blacklist.contains(&address.domain) || blacklist.contains(&address.ascii_domain) {
        debug!(address = submitted, "domain is on the deny-set");
        return ValidationResult::new(submitted, VerdictStatus::Blacklisted, REASON_BLACKLISTED);
    }

    if cancel.is_cancelled() {
        return ValidationResult::new(submitted, VerdictStatus::Invalid, REASON_CANCELLED);
    }

    let exchangers = match dns::resolve_with(resolver, &address.ascii_domain) {
        Ok(exchangers) => exchangers,
        Err(err) => {
            debug!(domain = %address.ascii_domain, error = %err, "MX resolution failed");
            let reason = dns_failure_reason(&err, &address, resolver, config);
            return ValidationResult::new(submitted, VerdictStatus::Invalid, reason);
        }
    };

    probe_stage(&address, &exchangers, config, prober, cancel)
}

/// Walks the exchanger list in preference order. Transport errors move on
/// to the next exchanger; any decisive reply ends the walk.
fn probe_stage<P: ProbeMailbox>(
    address: &EmailAddress,
    exchangers: &[MailExchanger],
    config: &EngineConfig,
    prober: &P,
    cancel: &CancelToken,
) -> ValidationResult {
    let submitted = address.original.as_str();
    let policy = config.retry_policy();
    let mut last_error: Option<SmtpError> = None;

    for exchanger in exchangers.iter().take(config.max_exchangers.max(1)) {
        if cancel.is_cancelled() {
            return ValidationResult::new(submitted, VerdictStatus::Invalid, REASON_CANCELLED);
        }
        match probe_with_retry(prober, exchanger, address, &policy, cancel) {
            Ok(report) => {
                return match report.outcome {
                    ProbeOutcome::Accepted { .. } => {
                        ValidationResult::new(submitted, VerdictStatus::Valid, REASON_VALID)
                    }
                    ProbeOutcome::Rejected { reply } => ValidationResult::new(
                        submitted,
                        VerdictStatus::Invalid,
                        format!("Recipient rejected ({})", describe_reply(&reply)),
                    ),
                    ProbeOutcome::Transient { reply } => ValidationResult::new(
                        submitted,
                        VerdictStatus::Greylisted,
                        format!(
                            "Temporarily rejected after {} attempts ({})",
                            report.attempts,
                            describe_reply(&reply)
                        ),
                    ),
                };
            }
            Err(SmtpError::Cancelled) => {
                return ValidationResult::new(submitted, VerdictStatus::Invalid, REASON_CANCELLED);
            }
            Err(err) => {
                debug!(host = %exchanger.host, error = %err, "exchanger unreachable");
                last_error = Some(err);
            }
        }
    }

    let detail = last_error
        .map(|err| err.to_string())
        .unwrap_or_else(|| "no exchanger answered".to_string());
    ValidationResult::new(
        submitted,
        VerdictStatus::Invalid,
        format!("Mail server unreachable ({detail})"),
    )
}

fn reason_for_syntax(err: &SyntaxError) -> String {
    format!("Invalid syntax: {err}")
}

fn reason_for_dns(err: &DnsError) -> String {
    match err {
        DnsError::DomainNotFound => "Domain does not exist.".to_string(),
        DnsError::NoAnswerForType => "No MX records found for the domain.".to_string(),
        DnsError::Timeout => "DNS lookup timed out.".to_string(),
        DnsError::ResolverInit { source } => format!("Unexpected error: {source}"),
        DnsError::Other { source } => format!("Unexpected error: {source}"),
    }
}

/// Base DNS reason plus the optional enrichments: address-record fallback
/// for MX-less domains, and SPF/DMARC presence hints.
fn dns_failure_reason<R: LookupMx>(
    err: &DnsError,
    address: &EmailAddress,
    resolver: &R,
    config: &EngineConfig,
) -> String {
    let mut reason = reason_for_dns(err);
    if config.a_record_fallback
        && matches!(err, DnsError::NoAnswerForType)
        && matches!(resolver.lookup_host(&address.ascii_domain), Ok(true))
    {
        reason.push_str(" Host resolves but publishes no mail routing.");
    }
    append_auth_hints(&mut reason, &address.ascii_domain, config);
    reason
}

#[cfg(feature = "with-auth-records")]
fn append_auth_hints(reason: &mut String, ascii_domain: &str, config: &EngineConfig) {
    if !config.auth_hints {
        return;
    }
    let Ok(status) = crate::auth::check_sender_records(ascii_domain) else {
        return;
    };
    let mut hints = Vec::new();
    if status.spf.is_missing() {
        hints.push("no SPF record");
    }
    if status.dmarc.is_missing() {
        hints.push("no DMARC policy");
    }
    if !hints.is_empty() {
        reason.push_str(&format!(" Sender authentication: {}.", hints.join(", ")));
    }
}

#[cfg(not(feature = "with-auth-records"))]
fn append_auth_hints(_reason: &mut String, _ascii_domain: &str, _config: &EngineConfig) {}

fn describe_reply(reply: &SmtpReply) -> String {
    let text = reply.one_line();
    if text.is_empty() {
        reply.code.to_string()
    } else {
        format!("{} {}", reply.code, text)
    }
}
