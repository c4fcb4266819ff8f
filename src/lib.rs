#![forbid(unsafe_code)]
//! mailvet — email deliverability verdicts without sending mail.
//!
//! One address goes through four ordered stages: grammar, the caller's
//! domain deny-set, MX resolution, and a live SMTP handshake probe.
//! [`validate`] runs them for a single address; [`BatchRunner`] fans the
//! same pipeline out over many addresses under a bounded worker pool, with
//! progress reporting and cooperative cancellation.

pub mod batch;
pub mod blacklist;
pub mod config;
pub mod control;
pub mod dns;
pub mod pipeline;
pub mod retry;
pub mod smtp;
pub mod syntax;

pub use batch::{BatchJob, BatchRunner, VerdictCounts};
pub use blacklist::Blacklist;
pub use config::EngineConfig;
pub use control::{CancelToken, Progress};
pub use dns::{DnsError, MailExchanger};
pub use pipeline::{ValidationResult, VerdictStatus, validate, validate_with_cancel};
pub use retry::{RetryPolicy, RetryReport};
pub use smtp::{ProbeOutcome, SmtpError, SmtpProber, SmtpReply};
pub use syntax::{EmailAddress, SyntaxError, ValidationMode, validate as validate_syntax};

#[cfg(feature = "with-auth-records")]
pub mod auth;
#[cfg(feature = "with-auth-records")]
pub use auth::{AuthError, DmarcStatus, DomainAuthStatus, SpfStatus, check_sender_records};
