use serde::{Deserialize, Serialize};

/// Largest page, limit or skip a store accepts. Postgres takes `LIMIT` and
/// `OFFSET` as bigint.
pub const MAX_WINDOW: u64 = i64::MAX as u64;

/// What `limit=0` means for a given listing endpoint. Endpoints disagree on
/// this, so each one states its policy explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroLimit {
    /// `limit=0` returns the whole result set as one page.
    Unbounded,
    /// `limit=0` returns an empty page.
    EmptyPage,
}

/// Zero-based page window parsed from `page`/`limit` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub zero_limit: ZeroLimit,
}

impl Pagination {
    /// Absent `page` is 0 and absent `limit` is `default_limit`. Present but
    /// non-numeric values coerce to 0.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u64,
        zero_limit: ZeroLimit,
    ) -> Self {
        Self {
            page: page.map(parse_lenient).unwrap_or(0),
            limit: limit.map(parse_lenient).unwrap_or(default_limit),
            zero_limit,
        }
    }

    /// Documents to skip and the page size to request from the store.
    pub fn window(&self) -> (u64, Option<u64>) {
        match (self.limit, self.zero_limit) {
            (0, ZeroLimit::Unbounded) => (0, None),
            (0, ZeroLimit::EmptyPage) => (0, Some(0)),
            (limit, _) => (self.page.saturating_mul(limit).min(MAX_WINDOW), Some(limit)),
        }
    }

    pub fn total_pages(&self, total_count: u64) -> u64 {
        match (self.limit, self.zero_limit) {
            (0, ZeroLimit::Unbounded) => u64::from(total_count > 0),
            (0, ZeroLimit::EmptyPage) => 0,
            (limit, _) => total_count.div_ceil(limit),
        }
    }
}

/// Best-effort integer parse: optional leading whitespace and sign, then
/// leading digits. Anything else, and negatives, become 0. Values past
/// [`MAX_WINDOW`] clamp to it.
pub fn parse_lenient(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if negative || end == 0 {
        return 0;
    }
    digits[..end]
        .parse::<u64>()
        .map_or(MAX_WINDOW, |n| n.min(MAX_WINDOW))
}

/// Paginated listing envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total_count,
            total_pages: pagination.total_pages(total_count),
            current_page: pagination.page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_matches_loose_numeric_input() {
        assert_eq!(parse_lenient("3"), 3);
        assert_eq!(parse_lenient("  12"), 12);
        assert_eq!(parse_lenient("10abc"), 10);
        assert_eq!(parse_lenient("abc"), 0);
        assert_eq!(parse_lenient(""), 0);
        assert_eq!(parse_lenient("-5"), 0);
        assert_eq!(parse_lenient("+7"), 7);
    }

    #[test]
    fn defaults_apply_only_when_absent() {
        let p = Pagination::from_params(None, None, 10, ZeroLimit::Unbounded);
        assert_eq!((p.page, p.limit), (0, 10));

        let p = Pagination::from_params(Some("x"), Some("nope"), 10, ZeroLimit::Unbounded);
        assert_eq!((p.page, p.limit), (0, 0));
    }

    #[test]
    fn window_skips_whole_pages() {
        let p = Pagination::from_params(Some("2"), Some("5"), 10, ZeroLimit::Unbounded);
        assert_eq!(p.window(), (10, Some(5)));
    }

    #[test]
    fn oversized_values_clamp_to_bigint() {
        assert_eq!(parse_lenient("99999999999999999999999"), MAX_WINDOW);
        assert_eq!(parse_lenient("9223372036854775808"), MAX_WINDOW);
        assert_eq!(parse_lenient("9223372036854775807"), MAX_WINDOW);

        let p = Pagination::from_params(Some("99999999999999999999"), Some("10"), 10, ZeroLimit::Unbounded);
        assert_eq!(p.page, MAX_WINDOW);
        assert_eq!(p.window(), (MAX_WINDOW, Some(10)));
    }

    #[test]
    fn zero_limit_policies_differ() {
        let unbounded = Pagination::from_params(Some("3"), Some("0"), 10, ZeroLimit::Unbounded);
        assert_eq!(unbounded.window(), (0, None));
        assert_eq!(unbounded.total_pages(7), 1);
        assert_eq!(unbounded.total_pages(0), 0);

        let empty = Pagination::from_params(Some("3"), Some("0"), 10, ZeroLimit::EmptyPage);
        assert_eq!(empty.window(), (0, Some(0)));
        assert_eq!(empty.total_pages(7), 0);
    }

    #[test]
    fn total_pages_is_ceiling() {
        for (total, limit, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (25, 6, 5)] {
            let p = Pagination {
                page: 0,
                limit,
                zero_limit: ZeroLimit::Unbounded,
            };
            assert_eq!(p.total_pages(total), expected, "total={total} limit={limit}");
        }
    }

    #[test]
    fn page_envelope_uses_camel_case() {
        let p = Pagination::from_params(Some("1"), Some("2"), 10, ZeroLimit::Unbounded);
        let page = Page::new(vec![1, 2], 5, &p);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"items": [1, 2], "totalCount": 5, "totalPages": 3, "currentPage": 1})
        );
    }
}
