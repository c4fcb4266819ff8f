//! Offline address grammar checks.
//!
//! [`validate`] is the only network-free stage of the pipeline: it collects
//! every grammar violation instead of stopping at the first one, and on
//! success returns the normalized [`EmailAddress`] the later stages work
//! with.

mod domain;
mod error;
mod local;
mod types;

pub use error::SyntaxError;
pub use types::{EmailAddress, ValidationMode};

use domain::{check_domain, normalize_domain};
use local::{is_local_relaxed, is_local_strict};

/// Checks `raw` against the address grammar and normalizes it.
///
/// Surrounding whitespace is ignored. The error carries every violation
/// found, in input order.
pub fn validate(raw: &str, mode: ValidationMode) -> Result<EmailAddress, SyntaxError> {
    let input = raw.trim();
    let mut reasons = Vec::new();

    if input.len() > 254 {
        reasons.push(format!("address length {} exceeds 254", input.len()));
    }

    let Some((local, domain)) = split_once_at(input) else {
        reasons.push("must contain exactly one '@'".to_string());
        return Err(SyntaxError::new(reasons));
    };

    if local.is_empty() || local.len() > 64 {
        reasons.push(format!("local part length {} outside 1..=64", local.len()));
    }

    let local_ok = match mode {
        ValidationMode::Strict => is_local_strict(local),
        ValidationMode::Relaxed => is_local_relaxed(local),
    };
    if !local_ok {
        reasons.push(match mode {
            ValidationMode::Strict => "invalid local part (strict rules)".to_string(),
            ValidationMode::Relaxed => "invalid local part (relaxed rules)".to_string(),
        });
    }

    check_domain(domain, &mut reasons);

    if !reasons.is_empty() {
        return Err(SyntaxError::new(reasons));
    }

    let (domain_lower, ascii_domain) = normalize_domain(domain);
    Ok(EmailAddress {
        original: input.to_string(),
        local: local.to_string(),
        domain: domain_lower,
        ascii_domain,
    })
}

/// Splits on a single `'@'`; `None` when the count is not exactly one.
fn split_once_at(input: &str) -> Option<(&str, &str)> {
    let mut parts = input.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => Some((local, domain)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_basic_address() {
        let address = validate("john.doe@example.com", ValidationMode::Strict)
            .expect("address should validate");
        assert_eq!(address.local, "john.doe");
        assert_eq!(address.domain, "example.com");
        assert_eq!(address.ascii_domain, "example.com");
    }

    #[test]
    fn trims_and_keeps_local_case() {
        let address = validate("  John.Doe@Example.COM \n", ValidationMode::Strict)
            .expect("address should validate");
        assert_eq!(address.original, "John.Doe@Example.COM");
        assert_eq!(address.local, "John.Doe");
        assert_eq!(address.domain, "example.com");
    }

    #[test]
    fn unicode_domain_gets_punycode_form() {
        let address = validate("post@bücher.example", ValidationMode::Strict)
            .expect("address should validate");
        assert_eq!(address.domain, "bücher.example");
        assert_eq!(address.ascii_domain, "xn--bcher-kva.example");
    }

    #[test]
    fn at_sign_count_must_be_one() {
        let err = validate("bad-syntax@@x", ValidationMode::Strict)
            .expect_err("double @ must fail");
        assert_eq!(err.reasons, vec!["must contain exactly one '@'".to_string()]);

        let err = validate("no-at-sign", ValidationMode::Strict).expect_err("missing @ must fail");
        assert_eq!(err.reasons, vec!["must contain exactly one '@'".to_string()]);
    }

    #[test]
    fn collects_every_violation() {
        let err = validate(".bad@-host", ValidationMode::Strict).expect_err("must fail");
        assert!(err.reasons.iter().any(|r| r.contains("strict rules")), "{:?}", err.reasons);
        assert!(err.reasons.iter().any(|r| r.contains("at least one dot")), "{:?}", err.reasons);
        assert!(err.reasons.len() >= 2);
    }

    #[test]
    fn empty_local_reports_length() {
        let err = validate("@example.com", ValidationMode::Strict).expect_err("must fail");
        assert!(
            err.reasons.iter().any(|r| r.contains("local part length 0")),
            "{:?}",
            err.reasons
        );
    }

    #[test]
    fn oversized_address_reports_total_length() {
        let address = format!("{}@{}.com", "a".repeat(64), "b".repeat(200));
        let err = validate(&address, ValidationMode::Strict).expect_err("must fail");
        assert!(err.reasons.iter().any(|r| r.contains("exceeds 254")), "{:?}", err.reasons);
    }

    #[test]
    fn quoted_local_depends_on_mode() {
        assert!(validate("\"john doe\"@example.com", ValidationMode::Strict).is_err());
        assert!(validate("\"john doe\"@example.com", ValidationMode::Relaxed).is_ok());
    }
}
