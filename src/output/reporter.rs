//! Reporter trait and the tracing-backed implementation
//!
//! The crawler never prints directly. Progress, broken links and failures go
//! through a [`Reporter`], so the binary can route them to the log while tests
//! can record them.

/// Sink for everything the crawler tells the user
pub trait Reporter: Send + Sync {
    /// Progress and summary lines
    fn info(&self, message: &str);

    /// An external link found on `page` failed validation
    fn warn(&self, href: &str, page: &str, reason: &str);

    /// A page could not be fetched, or an href on `page` could not be resolved
    fn error(&self, page: &str, href: &str, reason: &str);

    /// Diagnostic detail, only shown when debug output is enabled
    fn debug(&self, message: &str);
}

/// Reporter writing through `tracing`
///
/// Debug lines are subject to the subscriber's filter, so they only show
/// with `-v` or a matching `RUST_LOG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, href: &str, page: &str, reason: &str) {
        tracing::warn!(
            "Bad response for '{}' contained in '{}'. Message: {}.",
            href,
            page,
            reason
        );
    }

    fn error(&self, page: &str, href: &str, reason: &str) {
        tracing::error!("At page '{}' for href '{}'. Message: {}.", page, href, reason);
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }
}
