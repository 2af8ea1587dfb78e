//! Navigator port over the host's location and history.
//!
//! `redirect` leaves the application; `navigate` stays inside it;
//! `replace_url` rewrites the address bar without loading anything.

use url::Url;

/// Browser location and history operations.
///
/// Synchronous because every browser primitive behind it is.
pub trait Navigator: Send + Sync {
    /// The URL the page was loaded with, as last rewritten.
    fn current_url(&self) -> Url;

    /// Full-page navigation to an external URL.
    fn redirect(&self, url: &Url);

    /// In-app navigation to a path on the current origin.
    fn navigate(&self, path: &str);

    /// Replaces the current history entry without navigating.
    fn replace_url(&self, url: &Url);
}
