//! Mail-routing resolution.
//!
//! The pipeline only ever asks one question here: which hosts accept mail
//! for a domain, and in what order. [`resolve_mx`] answers it with the
//! system resolver; the [`LookupMx`] seam lets tests answer it with a
//! script.

mod error;
mod resolver;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use error::DnsError;
pub use resolver::{resolve_mx, system_resolver};
pub use types::MailExchanger;

pub(crate) use resolver::{LookupMx, resolve_with};
