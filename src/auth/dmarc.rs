use std::collections::HashMap;

use super::resolver::has_prefix_ignore_case;

/// Shape of a domain's DMARC publication at `_dmarc.<domain>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DmarcStatus {
    Missing,
    MultipleRecords { records: Vec<String> },
    Invalid { record: String, issue: DmarcIssue },
    /// A policy that observes or quarantines instead of rejecting.
    Weak {
        record: String,
        policy: DmarcPolicy,
        weakness: DmarcWeakness,
    },
    Compliant { record: String, policy: DmarcPolicy },
}

impl DmarcStatus {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DmarcIssue {
    InvalidVersion,
    MissingPolicy,
    UnknownPolicy { policy: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmarcPolicy {
    None,
    Quarantine,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmarcWeakness {
    MonitoringPolicy,
    QuarantinePolicy,
}

pub(crate) fn evaluate(records: &[String]) -> DmarcStatus {
    let mut dmarc_records: Vec<&str> = records
        .iter()
        .map(|record| record.trim())
        .filter(|trimmed| has_prefix_ignore_case(trimmed, "v=dmarc1"))
        .collect();

    match dmarc_records.len() {
        0 => DmarcStatus::Missing,
        1 => evaluate_record(dmarc_records.remove(0)),
        _ => {
            dmarc_records.sort_unstable();
            dmarc_records.dedup();
            DmarcStatus::MultipleRecords {
                records: dmarc_records.iter().map(|r| r.to_string()).collect(),
            }
        }
    }
}

fn evaluate_record(raw: &str) -> DmarcStatus {
    let record = raw.to_string();
    let tags = parse_tags(raw);

    match tags.get("v") {
        Some(version) if version.eq_ignore_ascii_case("dmarc1") => {}
        _ => {
            return DmarcStatus::Invalid {
                record,
                issue: DmarcIssue::InvalidVersion,
            };
        }
    }

    let Some(policy) = tags.get("p") else {
        return DmarcStatus::Invalid {
            record,
            issue: DmarcIssue::MissingPolicy,
        };
    };

    match policy.to_ascii_lowercase().as_str() {
        "reject" => DmarcStatus::Compliant {
            record,
            policy: DmarcPolicy::Reject,
        },
        "quarantine" => DmarcStatus::Weak {
            record,
            policy: DmarcPolicy::Quarantine,
            weakness: DmarcWeakness::QuarantinePolicy,
        },
        "none" => DmarcStatus::Weak {
            record,
            policy: DmarcPolicy::None,
            weakness: DmarcWeakness::MonitoringPolicy,
        },
        other => DmarcStatus::Invalid {
            record,
            issue: DmarcIssue::UnknownPolicy {
                policy: other.to_string(),
            },
        },
    }
}

/// `tag=value` pairs separated by `';'`; keys are lowercased.
fn parse_tags(record: &str) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    for part in record.split(';') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (key, value) = match trimmed.split_once('=') {
            Some((key, value)) => (key, value),
            None => (trimmed, ""),
        };
        tags.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }
    tags
}
