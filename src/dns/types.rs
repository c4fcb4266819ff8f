/// One mail-exchange candidate for a domain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MailExchanger {
    /// MX preference; lower is tried first.
    pub preference: u16,
    /// Exchanger hostname, lowercased, without the trailing dot.
    pub host: String,
}

impl MailExchanger {
    pub fn new(preference: u16, host: impl Into<String>) -> Self {
        Self {
            preference,
            host: host.into(),
        }
    }
}
