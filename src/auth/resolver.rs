use trust_dns_resolver::{
    Resolver,
    error::{ResolveError, ResolveErrorKind},
    lookup::TxtLookup,
};

use super::AuthError;

pub(crate) fn normalize_domain(domain: &str) -> Result<String, AuthError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(AuthError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(AuthError::idna)
}

/// Prefixes `label` onto `domain` (for `_dmarc.<domain>` style names).
pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

/// TXT lookup seam; an absent name is an empty answer, not an error.
pub(crate) trait LookupTxt {
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, AuthError>;
}

impl LookupTxt for Resolver {
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, AuthError> {
        match Resolver::txt_lookup(self, name) {
            Ok(lookup) => Ok(collect_txt_records(&lookup)),
            Err(err) if is_empty_answer(&err) => Ok(Vec::new()),
            Err(err) => Err(AuthError::txt_lookup(name, err)),
        }
    }
}

/// Joins the character-string pieces of each TXT record. Records are
/// presence signals here, so non-UTF-8 bytes are replaced rather than
/// treated as failures.
fn collect_txt_records(lookup: &TxtLookup) -> Vec<String> {
    lookup
        .iter()
        .map(|txt| {
            txt.txt_data()
                .iter()
                .map(|piece| String::from_utf8_lossy(piece.as_ref()))
                .collect::<String>()
        })
        .collect()
}

fn is_empty_answer(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

/// Case-insensitive ASCII prefix test shared by the SPF and DMARC parsers.
pub(crate) fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_domain_rejects_empty() {
        assert!(matches!(normalize_domain("   "), Err(AuthError::EmptyDomain)));
    }

    #[test]
    fn normalize_domain_converts_unicode() {
        let ascii = normalize_domain("bücher.example").expect("conversion must succeed");
        assert_eq!(ascii, "xn--bcher-kva.example");
    }

    #[test]
    fn fqdn_prefixes_and_lowercases() {
        assert_eq!(fqdn("_DMARC", "example.com"), "_dmarc.example.com");
        assert_eq!(fqdn("  ", "example.com"), "example.com");
    }

    #[test]
    fn prefix_test_ignores_case_and_handles_short_input() {
        assert!(has_prefix_ignore_case("V=SPF1 -all", "v=spf1"));
        assert!(!has_prefix_ignore_case("v=", "v=spf1"));
        assert!(!has_prefix_ignore_case("v=dkim1", "v=spf1"));
    }
}
