use thiserror::Error;

/// Grammar violations for one address, in the order they were found.
///
/// The `Display` form joins every violation with `"; "` so a single line
/// tells the whole story.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .reasons.join("; "))]
pub struct SyntaxError {
    pub reasons: Vec<String>,
}

impl SyntaxError {
    pub(crate) fn new(reasons: Vec<String>) -> Self {
        Self { reasons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_reasons() {
        let err = SyntaxError::new(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "first; second");
    }
}
