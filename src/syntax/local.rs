/// Strict rules: ASCII atext plus interior dots, no leading/trailing dot,
/// no "..".
pub(crate) fn is_local_strict(local: &str) -> bool {
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local.chars().all(is_atext_or_dot)
}

pub(crate) fn is_local_relaxed(local: &str) -> bool {
    if local.len() >= 2 && local.starts_with('"') && local.ends_with('"') {
        return true;
    }
    is_local_strict(local)
}

fn is_atext_or_dot(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
                | '.'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_rejects_dot_misuse() {
        assert!(is_local_strict("john.doe"));
        assert!(!is_local_strict(".john"));
        assert!(!is_local_strict("john."));
        assert!(!is_local_strict("jo..hn"));
    }

    #[test]
    fn strict_rejects_non_atext() {
        assert!(is_local_strict("user+tag"));
        assert!(!is_local_strict("user name"));
        assert!(!is_local_strict("usér"));
    }

    #[test]
    fn relaxed_accepts_quoted_string() {
        assert!(is_local_relaxed("\"john doe\""));
        assert!(!is_local_strict("\"john doe\""));
        assert!(is_local_relaxed("plain"));
    }
}
