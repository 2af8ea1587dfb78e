//! In-memory navigator with recorded history.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use url::Url;

use crate::ports::Navigator;

/// One call made through the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Redirect(Url),
    Navigate(String),
    Replace(Url),
}

/// `Navigator` over an in-memory location.
///
/// Redirects and navigations move the current URL so a following page load
/// can be simulated by reading `current_url()`.
#[derive(Clone)]
pub struct MemoryNavigator {
    inner: Arc<Mutex<NavigatorState>>,
}

struct NavigatorState {
    current: Url,
    history: Vec<NavigationEvent>,
}

impl MemoryNavigator {
    pub fn new(start: Url) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NavigatorState {
                current: start,
                history: Vec::new(),
            })),
        }
    }

    pub fn parse(start: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(start)?))
    }

    fn state(&self) -> MutexGuard<'_, NavigatorState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn history(&self) -> Vec<NavigationEvent> {
        self.state().history.clone()
    }

    pub fn redirects(&self) -> Vec<Url> {
        self.history()
            .into_iter()
            .filter_map(|event| match event {
                NavigationEvent::Redirect(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.history()
            .into_iter()
            .filter_map(|event| match event {
                NavigationEvent::Navigate(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn replacements(&self) -> Vec<Url> {
        self.history()
            .into_iter()
            .filter_map(|event| match event {
                NavigationEvent::Replace(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Moves to `url` as a fresh page load, without recording history.
    pub fn load(&self, url: Url) {
        self.state().current = url;
    }
}

impl Navigator for MemoryNavigator {
    fn current_url(&self) -> Url {
        self.state().current.clone()
    }

    fn redirect(&self, url: &Url) {
        debug!(target_url = %url, "redirect");
        let mut state = self.state();
        state.current = url.clone();
        state.history.push(NavigationEvent::Redirect(url.clone()));
    }

    fn navigate(&self, path: &str) {
        debug!(path, "navigate");
        let mut state = self.state();
        if let Ok(next) = state.current.join(path) {
            state.current = next;
        }
        state.history.push(NavigationEvent::Navigate(path.to_string()));
    }

    fn replace_url(&self, url: &Url) {
        let mut state = self.state();
        state.current = url.clone();
        state.history.push(NavigationEvent::Replace(url.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_resolves_against_current_origin() {
        let nav = MemoryNavigator::parse("https://app.example.com/choose-plan?x=1").unwrap();
        nav.navigate("/dashboard");
        assert_eq!(
            nav.current_url().as_str(),
            "https://app.example.com/dashboard"
        );
        assert_eq!(nav.navigations(), vec!["/dashboard".to_string()]);
    }

    #[test]
    fn redirect_and_replace_are_recorded_separately() {
        let nav = MemoryNavigator::parse("https://app.example.com/dashboard?success=true").unwrap();
        let clean = Url::parse("https://app.example.com/dashboard").unwrap();
        nav.replace_url(&clean);
        let pay = Url::parse("https://pay.example.com/s/1").unwrap();
        nav.redirect(&pay);

        assert_eq!(nav.replacements(), vec![clean]);
        assert_eq!(nav.redirects(), vec![pay.clone()]);
        assert_eq!(nav.current_url(), pay);
    }

    #[test]
    fn load_does_not_touch_history() {
        let nav = MemoryNavigator::parse("https://app.example.com/").unwrap();
        nav.load(Url::parse("https://app.example.com/dashboard?success=true").unwrap());
        assert!(nav.history().is_empty());
        assert_eq!(nav.current_url().query(), Some("success=true"));
    }
}
