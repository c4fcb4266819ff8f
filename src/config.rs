use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::syntax::ValidationMode;

/// Engine-wide knobs shared by the pipeline, the prober, and the batch
/// runner. All fields are plain data; `Default` carries the documented
/// defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on simultaneous in-flight probes.
    pub max_concurrency: usize,
    /// When set, inputs are processed in sequential slices of this size.
    pub chunk_size: Option<usize>,
    /// Timeout for a single DNS query.
    pub dns_timeout: Duration,
    /// Timeout applied to the SMTP connect and to each command exchange.
    pub smtp_timeout: Duration,
    /// Port the probe connects to on each exchanger.
    pub smtp_port: u16,
    /// How many exchangers are tried before giving up on a domain.
    pub max_exchangers: usize,
    /// Probe invocations allowed while a server keeps answering 4xx.
    pub retry_attempts: u32,
    /// Fixed delay between those invocations.
    pub retry_backoff: Duration,
    /// Envelope sender announced in `MAIL FROM`; a non-deliverable
    /// placeholder by default.
    pub sender: String,
    /// Name announced in `EHLO`.
    pub helo_name: String,
    /// Local-part grammar applied by the syntax stage.
    pub validation_mode: ValidationMode,
    /// Look up address records when a domain has no MX data, to annotate
    /// the failure reason. Never changes the verdict.
    pub a_record_fallback: bool,
    /// Append SPF/DMARC presence hints to domain-level failures
    /// (feature `with-auth-records`).
    pub auth_hints: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 20,
            chunk_size: None,
            dns_timeout: Duration::from_secs(10),
            smtp_timeout: Duration::from_secs(10),
            smtp_port: 25,
            max_exchangers: 3,
            retry_attempts: 3,
            retry_backoff: Duration::from_secs(5),
            sender: "verify-probe@example.com".to_string(),
            helo_name: "mailvet.invalid".to_string(),
            validation_mode: ValidationMode::Strict,
            a_record_fallback: false,
            auth_hints: false,
        }
    }
}

impl EngineConfig {
    /// The retry budget handed to the probe stage.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            backoff: self.retry_backoff,
        }
    }
}
