use std::io;

use thiserror::Error;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;

/// Classified DNS failures. The pipeline maps each variant to a stable
/// user-facing reason, so the classification here is the contract.
#[derive(Debug, Error)]
pub enum DnsError {
    /// Authoritative answer that the name does not exist (NXDOMAIN).
    #[error("domain does not exist")]
    DomainNotFound,
    /// The name exists but publishes no records of the queried type.
    #[error("no records of the requested type")]
    NoAnswerForType,
    #[error("DNS lookup timed out")]
    Timeout,
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: io::Error,
    },
    #[error("DNS lookup failed: {source}")]
    Other {
        #[source]
        source: ResolveError,
    },
}

impl DnsError {
    pub(crate) fn resolver_init(source: io::Error) -> Self {
        Self::ResolverInit { source }
    }

    /// Buckets a resolver error into the stable taxonomy above.
    pub(crate) fn classify(source: ResolveError) -> Self {
        enum Bucket {
            NotFound,
            NoData,
            Timeout,
            Other,
        }

        let bucket = match source.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                if *response_code == ResponseCode::NXDomain {
                    Bucket::NotFound
                } else {
                    Bucket::NoData
                }
            }
            ResolveErrorKind::Timeout => Bucket::Timeout,
            _ => Bucket::Other,
        };

        match bucket {
            Bucket::NotFound => Self::DomainNotFound,
            Bucket::NoData => Self::NoAnswerForType,
            Bucket::Timeout => Self::Timeout,
            Bucket::Other => Self::Other { source },
        }
    }
}
