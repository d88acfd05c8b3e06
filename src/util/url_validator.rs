use thiserror::Error;
use url::Url;

/// Reasons an article link cannot be opened.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinkError {
    /// The backend's placeholder for entries without a link.
    #[error("Article has no link")]
    Missing,
    #[error("Invalid link: {0}")]
    Invalid(String),
    #[error("Refusing to open {0} link (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validate an article link before handing it to the system opener.
///
/// Only absolute http(s) URLs pass. `""` and `"#"` mean the article had no
/// link at all.
///
/// ```
/// use newsdash::util::validate_link;
///
/// assert!(validate_link("https://example.com/story").is_ok());
/// assert!(validate_link("#").is_err());
/// assert!(validate_link("javascript:alert(1)").is_err());
/// ```
pub fn validate_link(link: &str) -> Result<Url, LinkError> {
    let link = link.trim();
    if link.is_empty() || link == "#" {
        return Err(LinkError::Missing);
    }

    let url = Url::parse(link).map_err(|e| LinkError::Invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(LinkError::UnsupportedScheme(scheme.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_links_accepted() {
        assert!(validate_link("https://www.bbc.co.uk/news/world-1").is_ok());
        assert!(validate_link(" http://rss.cnn.com/x ").is_ok());
    }

    #[test]
    fn test_missing_link() {
        assert_eq!(validate_link("#"), Err(LinkError::Missing));
        assert_eq!(validate_link(""), Err(LinkError::Missing));
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(matches!(
            validate_link("file:///etc/passwd"),
            Err(LinkError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_link("javascript:alert(1)"),
            Err(LinkError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_relative_link_invalid() {
        assert!(matches!(
            validate_link("/news/story"),
            Err(LinkError::Invalid(_))
        ));
    }
}
