use std::io;

use thiserror::Error;
use trust_dns_resolver::error::ResolveError;

/// Failures while looking up sender-authentication records.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: io::Error,
    },
    #[error("TXT lookup failed for {name}: {source}")]
    TxtLookup {
        name: String,
        #[source]
        source: ResolveError,
    },
}

impl AuthError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn resolver_init(source: io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn txt_lookup(name: impl Into<String>, source: ResolveError) -> Self {
        Self::TxtLookup {
            name: name.into(),
            source,
        }
    }
}
