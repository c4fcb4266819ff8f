/// How strictly the local part is checked.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// ASCII atext plus interior dots only.
    #[default]
    Strict,
    /// Additionally accepts a simple quoted local part.
    Relaxed,
}

/// A syntactically valid address, normalized for the network stages.
///
/// The local part keeps its original case; the domain is lowercased and
/// `ascii_domain` carries its IDNA (punycode) form, which is what DNS and
/// SMTP see.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    /// The input as submitted, surrounding whitespace removed.
    pub original: String,
    pub local: String,
    pub domain: String,
    pub ascii_domain: String,
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}
