//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use tokengate_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};

/// Query parameters for paginated endpoints.
///
/// Values are kept as strings: anything missing, unparsable or below 1
/// falls back to the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    pub page: Option<String>,
    /// Items per page (default: 10, max: 100).
    #[serde(alias = "recordPerPage")]
    pub per_page: Option<String>,
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v >= 1)
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(
            parse_positive(self.page.as_deref()).unwrap_or(1),
            parse_positive(self.per_page.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, per_page: Option<&str>) -> PaginationParams {
        PaginationParams {
            page: page.map(String::from),
            per_page: per_page.map(String::from),
        }
    }

    #[test]
    fn test_defaults_and_fallbacks() {
        assert_eq!(params(None, None).into_page_request(), PageRequest::new(1, 10));
        assert_eq!(
            params(Some("0"), Some("abc")).into_page_request(),
            PageRequest::new(1, 10)
        );
        assert_eq!(
            params(Some("3"), Some("1000")).into_page_request(),
            PageRequest::new(3, 100)
        );
    }

    #[test]
    fn test_huge_page_number_is_accepted() {
        let page = params(Some("999999999999999999"), Some("100")).into_page_request();
        assert_eq!(page.page, 999_999_999_999_999_999);
        assert_eq!(page.offset(), u64::MAX);

        // Beyond u64 does not parse and falls back.
        let page = params(Some("99999999999999999999999"), None).into_page_request();
        assert_eq!(page, PageRequest::new(1, 10));
    }

    #[test]
    fn test_record_per_page_alias() {
        let parsed: PaginationParams =
            serde_json::from_str(r#"{"page":"2","recordPerPage":"5"}"#).unwrap();
        assert_eq!(parsed.into_page_request(), PageRequest::new(2, 5));
    }
}
