//! Collected input validation failures.

/// One or more human-readable validation failures, reported together.
///
/// Validation never fails fast: callers collect every violated rule so a
/// form can be corrected in a single pass.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .reasons.join("; "))]
pub struct ValidationError {
    /// Every violated rule, in the order the rules were checked.
    pub reasons: Vec<String>,
}

impl ValidationError {
    /// Wrap a non-empty list of violation reasons.
    #[must_use]
    pub const fn new(reasons: Vec<String>) -> Self {
        Self { reasons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_reasons() {
        let err = ValidationError::new(vec![
            "First name is required".to_owned(),
            "Password must be at least 8 characters".to_owned(),
        ]);
        assert_eq!(
            err.to_string(),
            "First name is required; Password must be at least 8 characters"
        );
    }
}
