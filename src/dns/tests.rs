use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::{Query, ResponseCode};

use super::error::DnsError;
use super::resolver::{normalize_exchange, resolve_with};
use super::types::MailExchanger;

type LookupResult = Result<Vec<MailExchanger>, DnsError>;
type LookupFn = dyn Fn(&str) -> LookupResult;
type HostFn = dyn Fn(&str) -> Result<bool, DnsError>;

/// Scriptable stand-in for the system resolver.
pub(crate) struct StubResolver {
    pub on_lookup: Box<LookupFn>,
    pub on_lookup_host: Box<HostFn>,
}

impl StubResolver {
    pub(crate) fn new<F>(on_lookup: F) -> Self
    where
        F: Fn(&str) -> LookupResult + 'static,
    {
        Self {
            on_lookup: Box::new(on_lookup),
            on_lookup_host: Box::new(|_| Ok(false)),
        }
    }

    pub(crate) fn with_host_lookup<F>(mut self, on_lookup_host: F) -> Self
    where
        F: Fn(&str) -> Result<bool, DnsError> + 'static,
    {
        self.on_lookup_host = Box::new(on_lookup_host);
        self
    }
}

fn no_records_error(response_code: ResponseCode) -> ResolveError {
    ResolveError::from(ResolveErrorKind::NoRecordsFound {
        query: Box::new(Query::default()),
        soa: None,
        negative_ttl: None,
        response_code,
        trusted: false,
    })
}

#[test]
fn resolve_with_sorts_by_preference() {
    let resolver = StubResolver::new(|_| {
        Ok(vec![
            MailExchanger::new(20, "backup.example.com"),
            MailExchanger::new(5, "primary.example.com"),
            MailExchanger::new(10, "secondary.example.com"),
        ])
    });

    let exchangers = resolve_with(&resolver, "example.com").expect("lookup must succeed");
    let hosts: Vec<&str> = exchangers.iter().map(|mx| mx.host.as_str()).collect();
    assert_eq!(hosts, vec!["primary.example.com", "secondary.example.com", "backup.example.com"]);
}

#[test]
fn resolve_with_keeps_tie_order_stable() {
    let resolver = StubResolver::new(|_| {
        Ok(vec![
            MailExchanger::new(10, "first.example.com"),
            MailExchanger::new(10, "second.example.com"),
            MailExchanger::new(10, "third.example.com"),
        ])
    });

    let exchangers = resolve_with(&resolver, "example.com").expect("lookup must succeed");
    let hosts: Vec<&str> = exchangers.iter().map(|mx| mx.host.as_str()).collect();
    assert_eq!(hosts, vec!["first.example.com", "second.example.com", "third.example.com"]);
}

#[test]
fn empty_answer_is_no_answer_for_type() {
    let resolver = StubResolver::new(|_| Ok(Vec::new()));
    let err = resolve_with(&resolver, "example.com").expect_err("empty answer must fail");
    assert!(matches!(err, DnsError::NoAnswerForType));
}

#[test]
fn lookup_errors_pass_through() {
    let resolver = StubResolver::new(|_| Err(DnsError::DomainNotFound));
    let err = resolve_with(&resolver, "missing.example").expect_err("must fail");
    assert!(matches!(err, DnsError::DomainNotFound));
}

#[test]
fn classify_separates_nxdomain_from_nodata() {
    let err = DnsError::classify(no_records_error(ResponseCode::NXDomain));
    assert!(matches!(err, DnsError::DomainNotFound));

    let err = DnsError::classify(no_records_error(ResponseCode::NoError));
    assert!(matches!(err, DnsError::NoAnswerForType));
}

#[test]
fn classify_maps_timeout() {
    let err = DnsError::classify(ResolveError::from(ResolveErrorKind::Timeout));
    assert!(matches!(err, DnsError::Timeout));
}

#[test]
fn classify_keeps_unknown_errors_with_source() {
    let err = DnsError::classify(ResolveError::from("connection refused"));
    assert!(matches!(err, DnsError::Other { .. }));
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    assert_eq!(normalize_exchange("MX1.Example.COM."), "mx1.example.com");
    assert_eq!(normalize_exchange("plain.example.com"), "plain.example.com");
}
