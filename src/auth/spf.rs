use super::resolver::has_prefix_ignore_case;

/// Shape of a domain's SPF publication.
///
/// This is a presence-and-posture check, not an SPF evaluator: no DNS
/// mechanisms are expanded, only the record's own terms are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpfStatus {
    /// No `v=spf1` TXT record at the domain.
    Missing,
    /// More than one `v=spf1` record, which receivers treat as an error.
    MultipleRecords { records: Vec<String> },
    Invalid { record: String, issue: SpfIssue },
    /// The record hands off to another domain via `redirect=`.
    Delegated { record: String, target: String },
    /// A catch-all that lets unknown senders through.
    Weak { record: String, qualifier: SpfQualifier },
    /// A failing catch-all; unknown senders are refused or flagged.
    Compliant { record: String, qualifier: SpfQualifier },
}

impl SpfStatus {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpfIssue {
    InvalidVersion,
    MissingAllMechanism,
}

/// Qualifier on the final `all` mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpfQualifier {
    Fail,
    SoftFail,
    Neutral,
    Pass,
}

pub(crate) fn evaluate(records: &[String]) -> SpfStatus {
    let mut spf_records: Vec<&str> = records
        .iter()
        .map(|record| record.trim())
        .filter(|trimmed| has_prefix_ignore_case(trimmed, "v=spf1"))
        .collect();

    match spf_records.len() {
        0 => SpfStatus::Missing,
        1 => evaluate_record(spf_records.remove(0)),
        _ => {
            spf_records.sort_unstable();
            spf_records.dedup();
            SpfStatus::MultipleRecords {
                records: spf_records.iter().map(|r| r.to_string()).collect(),
            }
        }
    }
}

fn evaluate_record(record: &str) -> SpfStatus {
    let mut terms = record.split_whitespace();
    match terms.next() {
        Some(version) if version.eq_ignore_ascii_case("v=spf1") => {}
        _ => {
            return SpfStatus::Invalid {
                record: record.to_string(),
                issue: SpfIssue::InvalidVersion,
            };
        }
    }

    let mut qualifier = None;
    let mut redirect = None;
    for term in terms {
        let lower = term.to_ascii_lowercase();
        if qualifier.is_none() {
            qualifier = qualifier_from_term(&lower);
        }
        if redirect.is_none() {
            if let Some(target) = lower.strip_prefix("redirect=") {
                if !target.is_empty() {
                    redirect = Some(target.to_string());
                }
            }
        }
    }

    let record = record.to_string();
    match (qualifier, redirect) {
        (Some(qualifier @ (SpfQualifier::Fail | SpfQualifier::SoftFail)), _) => {
            SpfStatus::Compliant { record, qualifier }
        }
        (Some(qualifier), _) => SpfStatus::Weak { record, qualifier },
        (None, Some(target)) => SpfStatus::Delegated { record, target },
        (None, None) => SpfStatus::Invalid {
            record,
            issue: SpfIssue::MissingAllMechanism,
        },
    }
}

fn qualifier_from_term(term: &str) -> Option<SpfQualifier> {
    match term {
        "-all" => Some(SpfQualifier::Fail),
        "~all" => Some(SpfQualifier::SoftFail),
        "?all" => Some(SpfQualifier::Neutral),
        "all" | "+all" => Some(SpfQualifier::Pass),
        _ => None,
    }
}
