/// URLs of the shortening service: API requests, short links and info pages
use regex::Regex;
use thiserror::Error;
use url::Url;

/// Base URL of the urly.fi service
pub const SERVICE_BASE: &str = "http://urly.fi/";

/// Paths under the base that the service itself serves and never redirects
const RESERVED_PATH_PATTERN: &str = r"^(info|static)(/|$)";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid service base url: {0}")]
    InvalidBase(#[from] url::ParseError),
    #[error("service base must end with '/': {0}")]
    MissingTrailingSlash(String),
    #[error("invalid reserved path pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The shortening service as seen by the extension
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    base: Url,
    api: Url,
    info: Url,
    reserved: Regex,
}

impl ServiceEndpoint {
    pub fn new(base: &str) -> Result<Self, EndpointError> {
        let base = Url::parse(base)?;
        if !base.as_str().ends_with('/') {
            return Err(EndpointError::MissingTrailingSlash(base.to_string()));
        }
        let api = base.join("api/shorten/")?;
        let info = base.join("info/")?;
        let reserved = Regex::new(RESERVED_PATH_PATTERN)?;

        Ok(ServiceEndpoint {
            base,
            api,
            info,
            reserved,
        })
    }

    /// The production urly.fi endpoint
    pub fn urly() -> Result<Self, EndpointError> {
        Self::new(SERVICE_BASE)
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    /// Prefix every info page URL starts with
    pub fn info_prefix(&self) -> &str {
        self.info.as_str()
    }

    /// API request URL with the long URL percent-encoded into `url=`
    pub fn shorten_url(&self, long_url: &str) -> Url {
        let mut request = self.api.clone();
        request.query_pairs_mut().append_pair("url", long_url);
        request
    }

    /// Short link for a code returned by the service
    pub fn short_link(&self, code: &str) -> String {
        format!("{}{}", self.base, code)
    }

    /// Everything after the base, or None if the target is not on the service
    pub fn path_suffix<'a>(&self, target: &'a str) -> Option<&'a str> {
        target.strip_prefix(self.base.as_str())
    }

    /// True for the bare service root, with or without the trailing slash
    pub fn is_root(&self, target: &str) -> bool {
        self.path_suffix(target).is_some_and(str::is_empty)
            || target == self.base.as_str().trim_end_matches('/')
    }

    /// True when the target's first path segment is `info` or `static`
    pub fn is_reserved(&self, target: &str) -> bool {
        self.path_suffix(target)
            .is_some_and(|suffix| self.reserved.is_match(suffix))
    }

    pub fn is_info_page(&self, url: &str) -> bool {
        url.starts_with(self.info.as_str())
    }

    /// Info page showing where a short link leads instead of following it
    pub fn info_url(&self, target: &str) -> Option<String> {
        self.path_suffix(target)
            .map(|suffix| format!("{}{}", self.info, suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urly() -> ServiceEndpoint {
        ServiceEndpoint::urly().unwrap()
    }

    #[test]
    fn test_shorten_url_encodes_long_url() {
        let url = urly().shorten_url("http://example.com/a b?x=1&y=2");

        assert_eq!(url.path(), "/api/shorten/");
        assert_eq!(
            url.as_str(),
            "http://urly.fi/api/shorten/?url=http%3A%2F%2Fexample.com%2Fa+b%3Fx%3D1%26y%3D2"
        );

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("url".to_string(), "http://example.com/a b?x=1&y=2".to_string())]
        );
    }

    #[test]
    fn test_short_link() {
        assert_eq!(urly().short_link("abc123"), "http://urly.fi/abc123");
    }

    #[test]
    fn test_info_url_keeps_double_slash() {
        assert_eq!(
            urly().info_url("http://urly.fi/abc123"),
            Some("http://urly.fi/info/abc123".to_string())
        );
        assert_eq!(urly().info_url("http://example.com/abc123"), None);
    }

    #[test]
    fn test_is_root() {
        let endpoint = urly();
        assert!(endpoint.is_root("http://urly.fi/"));
        assert!(endpoint.is_root("http://urly.fi"));
        assert!(!endpoint.is_root("http://urly.fi/abc"));
    }

    #[test]
    fn test_is_reserved() {
        let endpoint = urly();
        assert!(endpoint.is_reserved("http://urly.fi/info/abc"));
        assert!(endpoint.is_reserved("http://urly.fi/info"));
        assert!(endpoint.is_reserved("http://urly.fi/static/style.css"));
        assert!(!endpoint.is_reserved("http://urly.fi/xinfo"));
        assert!(!endpoint.is_reserved("http://urly.fi/abc"));
    }

    #[test]
    fn test_is_info_page() {
        let endpoint = urly();
        assert!(endpoint.is_info_page("http://urly.fi/info/abc"));
        assert!(!endpoint.is_info_page("http://urly.fi/abc"));
    }

    #[test]
    fn test_base_without_trailing_slash_is_rejected() {
        assert!(matches!(
            ServiceEndpoint::new("http://urly.fi/api"),
            Err(EndpointError::MissingTrailingSlash(_))
        ));
        assert!(matches!(
            ServiceEndpoint::new("not a url"),
            Err(EndpointError::InvalidBase(_))
        ));
    }
}
