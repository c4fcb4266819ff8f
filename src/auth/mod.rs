//! Sender-authentication record checks (SPF and DMARC).
//!
//! These are advisory lookups: the pipeline uses them to annotate failure
//! reasons, never to change a verdict. Both checks read TXT records only
//! and classify what the domain publishes.

mod dmarc;
mod error;
mod resolver;
mod spf;
mod types;

pub use dmarc::{DmarcIssue, DmarcPolicy, DmarcStatus, DmarcWeakness};
pub use error::AuthError;
pub use spf::{SpfIssue, SpfQualifier, SpfStatus};
pub use types::DomainAuthStatus;

use resolver::{LookupTxt, fqdn, normalize_domain};
use trust_dns_resolver::Resolver;

/// Looks up SPF and DMARC for `domain` with the system resolver.
pub fn check_sender_records(domain: &str) -> Result<DomainAuthStatus, AuthError> {
    let ascii = normalize_domain(domain)?;
    let resolver = Resolver::from_system_conf().map_err(AuthError::resolver_init)?;
    check_with_resolver(&resolver, &ascii)
}

pub(crate) fn check_with_resolver<R>(
    resolver: &R,
    ascii_domain: &str,
) -> Result<DomainAuthStatus, AuthError>
where
    R: LookupTxt,
{
    let spf_records = resolver.lookup_txt(ascii_domain)?;
    let spf_status = spf::evaluate(&spf_records);

    let dmarc_name = fqdn("_dmarc", ascii_domain);
    let dmarc_records = resolver.lookup_txt(&dmarc_name)?;
    let dmarc_status = dmarc::evaluate(&dmarc_records);

    Ok(DomainAuthStatus::new(
        ascii_domain.to_string(),
        spf_status,
        dmarc_status,
    ))
}
