//! Offset pagination helpers for directory listings.

/// Default page size for listings.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for listings.
pub const MAX_LIMIT: i64 = 100;

/// Sanitized limit/offset pair for an offset-paginated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    /// Clamps raw query values into a valid page window.
    ///
    /// A missing limit falls back to [`DEFAULT_LIMIT`]; limits are clamped
    /// to `1..=MAX_LIMIT` and negative offsets to zero.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageParams::clamped(None, None);
        assert_eq!(page.limit, DEFAULT_LIMIT);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_limit_clamped_high() {
        let page = PageParams::clamped(Some(10_000), None);
        assert_eq!(page.limit, MAX_LIMIT);
    }

    #[test]
    fn test_limit_clamped_low() {
        let page = PageParams::clamped(Some(0), None);
        assert_eq!(page.limit, 1);
        let page = PageParams::clamped(Some(-5), None);
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn test_negative_offset() {
        let page = PageParams::clamped(None, Some(-10));
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_passthrough() {
        let page = PageParams::clamped(Some(25), Some(50));
        assert_eq!(page.limit, 25);
        assert_eq!(page.offset, 50);
    }
}
