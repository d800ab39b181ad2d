//! Shared test tooling: logging initialization and unique test markers.

pub mod logging;

use ulid::Ulid;

/// Generate a unique marker string with the given prefix, so concurrent test
/// runs never collide on data they write.
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

#[cfg(test)]
mod tests {
    use super::unique_str;

    #[test]
    fn test_unique_str_produces_different_results() {
        assert_ne!(unique_str("note"), unique_str("note"));
    }

    #[test]
    fn test_unique_str_keeps_prefix() {
        assert!(unique_str("note").starts_with("note-"));
    }
}
