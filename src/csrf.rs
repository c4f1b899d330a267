//! CSRF token comparison.
//!
//! Tokens are compared in constant time so response timing does not reveal
//! how many leading bytes of a guessed token were correct.

/// Compare a submitted CSRF token against the expected one.
///
/// Walks every byte of `provided` regardless of where the first mismatch
/// occurs; a length mismatch is folded into the accumulator rather than
/// short-circuiting. An empty expected token never matches.
pub fn tokens_match(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();

    if expected.is_empty() {
        return false;
    }

    let mut diff = expected.len() ^ provided.len();
    for (i, &byte) in provided.iter().enumerate() {
        diff |= usize::from(expected[i % expected.len()] ^ byte);
    }

    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_tokens_match() {
        assert!(tokens_match("a1b2c3d4e5f6", "a1b2c3d4e5f6"));
    }

    #[test]
    fn test_differing_tokens_do_not_match() {
        assert!(!tokens_match("a1b2c3d4e5f6", "a1b2c3d4e5f7"));
        assert!(!tokens_match("a1b2c3d4e5f6", "x1b2c3d4e5f6"));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!tokens_match("a1b2c3", "a1b2c3d4"));
        assert!(!tokens_match("a1b2c3d4", "a1b2c3"));
    }

    #[test]
    fn test_empty_tokens_rejected() {
        assert!(!tokens_match("", ""));
        assert!(!tokens_match("", "a1b2c3"));
        assert!(!tokens_match("a1b2c3", ""));
    }
}
