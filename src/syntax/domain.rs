/// Validates the domain: IDNA conversion plus per-label checks. Pushes
/// every violation into `reasons`.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) {
    let ascii = match idna::domain_to_ascii(domain) {
        Ok(ascii) => ascii,
        Err(_) => {
            reasons.push("domain punycode conversion failed".to_string());
            return;
        }
    };

    if ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return;
    }

    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in ascii.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > 63 {
            reasons.push(format!("domain label '{}' length {} exceeds 63", label, label.len()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{label}' cannot start or end with '-'"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{label}' contains invalid characters"));
        }
    }
}

/// Lowercased display form plus the ASCII (punycode) form. Only called once
/// the checks above have passed, so conversion cannot fail here.
pub(crate) fn normalize_domain(domain: &str) -> (String, String) {
    let lower = domain.trim().to_lowercase();
    let ascii = idna::domain_to_ascii(&lower).unwrap_or_default();
    (lower, ascii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_domain_passes() {
        let mut reasons = Vec::new();
        check_domain("example.com", &mut reasons);
        assert!(reasons.is_empty(), "{reasons:?}");
    }

    #[test]
    fn missing_dot_is_flagged() {
        let mut reasons = Vec::new();
        check_domain("localhost", &mut reasons);
        assert_eq!(reasons, vec!["domain must contain at least one dot".to_string()]);
    }

    #[test]
    fn oversized_label_is_flagged() {
        let label = "a".repeat(64);
        let mut reasons = Vec::new();
        check_domain(&format!("{label}.com"), &mut reasons);
        assert!(reasons.iter().any(|r| r.contains("exceeds 63")), "{reasons:?}");
    }

    #[test]
    fn hyphen_edges_are_flagged() {
        let mut reasons = Vec::new();
        check_domain("-bad.com", &mut reasons);
        assert!(reasons.iter().any(|r| r.contains("start or end with '-'")), "{reasons:?}");
    }

    #[test]
    fn unicode_domain_normalizes_to_punycode() {
        let mut reasons = Vec::new();
        check_domain("bücher.example", &mut reasons);
        assert!(reasons.is_empty(), "{reasons:?}");
        let (lower, ascii) = normalize_domain("BÜCHER.example");
        assert_eq!(lower, "bücher.example");
        assert_eq!(ascii, "xn--bcher-kva.example");
    }
}
