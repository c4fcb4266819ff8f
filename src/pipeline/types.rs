use std::fmt;

/// Terminal classification for one validated address.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictStatus {
    /// A mail exchanger accepted the recipient.
    Valid,
    /// Syntax, DNS, or the probe ruled the address out.
    Invalid,
    /// The server kept answering with transient refusals.
    Greylisted,
    /// The domain is on the caller's deny-set.
    Blacklisted,
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
            Self::Greylisted => "Greylisted",
            Self::Blacklisted => "Blacklisted",
        };
        f.write_str(label)
    }
}

/// One verdict row: the address as submitted, its status, and a
/// human-readable reason.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub address: String,
    pub status: VerdictStatus,
    pub reason: String,
}

impl ValidationResult {
    pub(crate) fn new(
        address: impl Into<String>,
        status: VerdictStatus,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            status,
            reason: reason.into(),
        }
    }

    pub fn is_deliverable(&self) -> bool {
        self.status == VerdictStatus::Valid
    }
}
