use std::fmt::Display;

/// Structured cache key
///
/// Keys carry their namespace as a variant instead of being interpolated at
/// call sites, so two callers can never collide on formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Merged, pre-filter video set for one user
    Feed(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Feed(owner) => write!(f, "feed:{}", owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_key_display() {
        let key = CacheKey::Feed("auth0|user1".to_string());
        assert_eq!(format!("{}", key), "feed:auth0|user1");
    }

    #[test]
    fn test_feed_keys_differ_per_owner() {
        let a = CacheKey::Feed("user-a".to_string());
        let b = CacheKey::Feed("user-b".to_string());
        assert_ne!(format!("{}", a), format!("{}", b));
    }
}
