use crate::UrlError;
use url::Url;

/// Parses and validates the crawl origin
///
/// The origin must be an absolute `http` or `https` URL with a host.
/// Its fragment is removed so the origin compares equal to links that
/// point at it.
///
/// # Examples
///
/// ```
/// use sumi_linkcheck::url::parse_origin;
///
/// let url = parse_origin("https://EXAMPLE.com/docs#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// assert!(parse_origin("ftp://example.com/").is_err());
/// ```
pub fn parse_origin(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_web_url(&url)?;
    Ok(normalize_address(url))
}

/// Normalizes an internal address
///
/// `Url` parsing already lowercases the host, drops default ports and removes
/// dot segments; the only step left is dropping the fragment.
pub fn normalize_address(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Returns the scheme prefix of an href, if it has one
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`,
/// terminated by `:`. Anything else (including `/a:b` or `page?t=10:00`) has
/// no scheme and is treated as relative.
pub fn scheme_prefix(href: &str) -> Option<&str> {
    let colon = href.find(':')?;
    let candidate = &href[..colon];
    let mut chars = candidate.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return None,
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}

/// Returns true if the scheme is `http` or `https`
pub fn is_web_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

/// Resolves a raw href against the page it was found on
///
/// # Resolution Rules
///
/// 1. `//host/path` takes the base page's scheme
/// 2. An href carrying its own `http:`/`https:` scheme is parsed as absolute
/// 3. Anything else is joined onto the base address
///
/// The result must be an `http`/`https` URL with a host.
pub fn resolve_href(href: &str, base: &Url) -> Result<Url, UrlError> {
    let resolved = if href.starts_with("//") {
        Url::parse(&format!("{}:{}", base.scheme(), href))
    } else if scheme_prefix(href).is_some() {
        Url::parse(href)
    } else {
        base.join(href)
    };

    let url = resolved.map_err(|e| UrlError::Malformed(format!("'{}': {}", href, e)))?;
    check_web_url(&url)?;
    Ok(url)
}

fn check_web_url(url: &Url) -> Result<(), UrlError> {
    if !is_web_scheme(url.scheme()) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlError::MissingHost),
    }
}
