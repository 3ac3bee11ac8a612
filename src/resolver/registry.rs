//! Remote BIN service endpoints.
//!
//! Kept as a small static table; deployments override the base URLs and the
//! bintable key through [`RemoteEndpoints`].

/// Default base URL of the binlist-style service (tier 2)
pub const BINLIST_BASE_URL: &str = "https://lookup.binlist.net/";

/// Default base URL of the bintable-style service (tier 3)
pub const BINTABLE_BASE_URL: &str = "https://api.bintable.com/v1/";

/// Number of leading digits sent to the binlist-style service
pub const BINLIST_QUERY_DIGITS: usize = 6;

/// Where the remote tiers live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoints {
    pub binlist_base_url: String,
    pub bintable_base_url: String,
    /// Tier 3 is skipped when no key is configured
    pub bintable_api_key: Option<String>,
}

impl Default for RemoteEndpoints {
    fn default() -> Self {
        Self {
            binlist_base_url: BINLIST_BASE_URL.to_string(),
            bintable_base_url: BINTABLE_BASE_URL.to_string(),
            bintable_api_key: None,
        }
    }
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

/// Lookup URL for the binlist-style service; only the first six digits are sent.
pub fn binlist_url(base: &str, prefix: &str) -> String {
    let key = prefix.get(..BINLIST_QUERY_DIGITS).unwrap_or(prefix);
    format!("{}{key}", with_trailing_slash(base))
}

/// Lookup URL for the bintable-style service, without the key parameter.
pub fn bintable_url(base: &str, prefix: &str) -> String {
    format!("{}{prefix}", with_trailing_slash(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binlist_url_truncates() {
        assert_eq!(
            binlist_url(BINLIST_BASE_URL, "45717360123"),
            "https://lookup.binlist.net/457173"
        );
        assert_eq!(binlist_url("http://127.0.0.1:9000", "457173"), "http://127.0.0.1:9000/457173");
    }

    #[test]
    fn test_bintable_url_keeps_prefix() {
        assert_eq!(
            bintable_url(BINTABLE_BASE_URL, "45717360"),
            "https://api.bintable.com/v1/45717360"
        );
    }

    #[test]
    fn test_default_endpoints_have_no_key() {
        assert!(RemoteEndpoints::default().bintable_api_key.is_none());
    }
}
