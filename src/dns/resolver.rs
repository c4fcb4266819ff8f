use std::time::Duration;

use trust_dns_resolver::Resolver;
use trust_dns_resolver::system_conf::read_system_conf;

use super::error::DnsError;
use super::types::MailExchanger;

/// Builds a synchronous resolver from the system configuration.
///
/// The lookup timeout is overridden with `timeout` and retransmissions are
/// disabled; the pipeline owns retry behavior, the resolver must not add
/// its own.
pub fn system_resolver(timeout: Duration) -> Result<Resolver, DnsError> {
    let (config, mut opts) = read_system_conf().map_err(DnsError::resolver_init)?;
    opts.timeout = timeout;
    opts.attempts = 1;
    Resolver::new(config, opts).map_err(DnsError::resolver_init)
}

/// Resolves the mail exchangers for `ascii_domain`.
///
/// Records come back sorted by ascending preference; ties keep the order
/// the resolver returned. An answer with zero MX records is an error, so
/// callers never probe a domain without mail routing.
pub(crate) fn resolve_with<R: LookupMx>(
    resolver: &R,
    ascii_domain: &str,
) -> Result<Vec<MailExchanger>, DnsError> {
    let mut exchangers = resolver.lookup_mx(ascii_domain)?;
    if exchangers.is_empty() {
        return Err(DnsError::NoAnswerForType);
    }
    exchangers.sort_by_key(|mx| mx.preference);
    Ok(exchangers)
}

/// Convenience entry over [`system_resolver`] + [`resolve_with`].
pub fn resolve_mx(ascii_domain: &str, timeout: Duration) -> Result<Vec<MailExchanger>, DnsError> {
    let resolver = system_resolver(timeout)?;
    resolve_with(&resolver, ascii_domain)
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}

/// Lookup seam so the pipeline can be driven by a stub in tests.
pub(crate) trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MailExchanger>, DnsError>;

    /// Address-record presence check, used only to enrich failure reasons.
    fn lookup_host(&self, _domain: &str) -> Result<bool, DnsError> {
        Ok(false)
    }
}

impl LookupMx for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MailExchanger>, DnsError> {
        let lookup = Resolver::mx_lookup(self, domain).map_err(DnsError::classify)?;
        Ok(lookup
            .iter()
            .map(|mx| MailExchanger::new(mx.preference(), normalize_exchange(&mx.exchange().to_utf8())))
            .collect())
    }

    fn lookup_host(&self, domain: &str) -> Result<bool, DnsError> {
        match Resolver::ipv4_lookup(self, domain) {
            Ok(lookup) => Ok(lookup.iter().next().is_some()),
            Err(err) => match DnsError::classify(err) {
                DnsError::DomainNotFound | DnsError::NoAnswerForType => Ok(false),
                other => Err(other),
            },
        }
    }
}

#[cfg(test)]
impl LookupMx for super::tests::StubResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MailExchanger>, DnsError> {
        (self.on_lookup)(domain)
    }

    fn lookup_host(&self, domain: &str) -> Result<bool, DnsError> {
        (self.on_lookup_host)(domain)
    }
}
