//! URL handling module for Sumi-Linkcheck
//!
//! This module provides origin parsing, href resolution and the
//! internal/external link classification used by the crawler.

mod domain;
mod normalize;

use crate::UrlError;
use std::collections::HashSet;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, same_document, same_host};
pub use normalize::{is_web_scheme, normalize_address, parse_origin, resolve_href, scheme_prefix};

/// An off-host link awaiting validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    /// The href as written, with the base scheme prefixed for `//` hrefs.
    /// This is the deduplication key for validation.
    pub href: String,

    /// The resolved address
    pub url: Url,
}

/// Why an href was dropped without being classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// Empty or whitespace-only href
    Empty,
    /// `#section` reference into the same page
    FragmentOnly,
    /// `mailto:`, `tel:`, `javascript:` and other non-web schemes
    NonWebScheme,
    /// Points back at the page it was found on
    SelfLink,
}

/// Classification of a single href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// Same hostname as the base page; normalized absolute address
    Internal(Url),
    /// Different hostname
    External(ExternalLink),
    /// Dropped silently
    Ignored(IgnoreReason),
}

/// Options that change how hrefs are classified
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyPolicy {
    /// Drop hrefs whose host and path equal the base page's
    pub skip_self_links: bool,
}

/// An href that could not be resolved to an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedHref {
    pub href: String,
    pub error: UrlError,
}

/// Result of classifying every href of a page
#[derive(Debug, Clone, Default)]
pub struct ClassifiedLinks {
    /// Distinct internal addresses, in document order
    pub internal: Vec<Url>,

    /// Distinct external links, in document order
    pub external: Vec<ExternalLink>,

    /// Number of hrefs dropped silently
    pub ignored: usize,

    /// Hrefs that failed to resolve
    pub rejected: Vec<RejectedHref>,
}

/// Classifies a single href found on `base`
///
/// # Classification Rules
///
/// **Ignored:**
/// - empty hrefs
/// - fragment-only references (`#top`)
/// - schemes other than `http:`/`https:`
/// - self-links, when `policy.skip_self_links` is set
///
/// **Internal:** resolved hostname equals the base hostname
///
/// **External:** any other hostname
///
/// # Returns
///
/// * `Ok(LinkKind)` - The classification
/// * `Err(UrlError)` - The href could not be resolved to an address
///
/// # Example
///
/// ```
/// use sumi_linkcheck::url::{classify_href, ClassifyPolicy, LinkKind};
/// use url::Url;
///
/// let base = Url::parse("http://a.test/").unwrap();
/// let kind = classify_href("/p1", &base, ClassifyPolicy::default()).unwrap();
/// assert_eq!(kind, LinkKind::Internal(Url::parse("http://a.test/p1").unwrap()));
/// ```
pub fn classify_href(href: &str, base: &Url, policy: ClassifyPolicy) -> Result<LinkKind, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Ok(LinkKind::Ignored(IgnoreReason::Empty));
    }

    if href.starts_with('#') {
        return Ok(LinkKind::Ignored(IgnoreReason::FragmentOnly));
    }

    if let Some(scheme) = scheme_prefix(href) {
        if !is_web_scheme(scheme) {
            return Ok(LinkKind::Ignored(IgnoreReason::NonWebScheme));
        }
    }

    let resolved = resolve_href(href, base)?;

    if policy.skip_self_links && same_document(&resolved, base) {
        return Ok(LinkKind::Ignored(IgnoreReason::SelfLink));
    }

    if same_host(&resolved, base) {
        Ok(LinkKind::Internal(normalize_address(resolved)))
    } else {
        let href = if href.starts_with("//") {
            format!("{}:{}", base.scheme(), href)
        } else {
            href.to_string()
        };
        Ok(LinkKind::External(ExternalLink {
            href,
            url: resolved,
        }))
    }
}

/// Partitions the hrefs of a page into internal and external links
///
/// Each list is deduplicated (first occurrence wins) and keeps document
/// order. Hrefs that fail to resolve are collected in `rejected` instead
/// of being classified.
pub fn classify_hrefs<'a, I>(hrefs: I, base: &Url, policy: ClassifyPolicy) -> ClassifiedLinks
where
    I: IntoIterator<Item = &'a str>,
{
    let mut links = ClassifiedLinks::default();
    let mut seen_internal = HashSet::new();
    let mut seen_external = HashSet::new();

    for href in hrefs {
        match classify_href(href, base, policy) {
            Ok(LinkKind::Internal(url)) => {
                if seen_internal.insert(url.as_str().to_string()) {
                    links.internal.push(url);
                }
            }
            Ok(LinkKind::External(link)) => {
                if seen_external.insert(link.href.clone()) {
                    links.external.push(link);
                }
            }
            Ok(LinkKind::Ignored(_)) => links.ignored += 1,
            Err(error) => links.rejected.push(RejectedHref {
                href: href.to_string(),
                error,
            }),
        }
    }

    links
}
