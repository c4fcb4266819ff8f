use super::{dmarc::DmarcStatus, spf::SpfStatus};

/// SPF and DMARC findings for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAuthStatus {
    pub domain: String,
    pub spf: SpfStatus,
    pub dmarc: DmarcStatus,
}

impl DomainAuthStatus {
    pub(crate) fn new(domain: String, spf: SpfStatus, dmarc: DmarcStatus) -> Self {
        Self { domain, spf, dmarc }
    }
}
