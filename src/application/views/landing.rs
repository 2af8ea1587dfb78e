//! Landing page view.

use std::sync::Arc;

use url::Url;

use crate::application::handlers::{CatalogState, EntryDecision, PlanEntry, TierCatalogLoader};
use crate::application::{ClientError, SessionContext, ViewState};
use crate::domain::foundation::PlanName;

use super::plan_selection::cards_for;
use super::PlanCard;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandingState {
    pub catalog: CatalogState,
}

/// Public pricing page; works signed in or out.
pub struct LandingView {
    session: Arc<SessionContext>,
    loader: Arc<TierCatalogLoader>,
    entry: Arc<PlanEntry>,
    state: ViewState<LandingState>,
}

impl LandingView {
    pub fn new(
        session: Arc<SessionContext>,
        loader: Arc<TierCatalogLoader>,
        entry: Arc<PlanEntry>,
    ) -> Self {
        Self {
            session,
            loader,
            entry,
            state: ViewState::new("landing", LandingState::default()),
        }
    }

    /// Loads the catalog; does not wait for the session.
    pub async fn load(&self) {
        let load = self.loader.list_tiers().await;
        self.state
            .update(|s| s.catalog = CatalogState::from_load(load));
    }

    pub fn state(&self) -> LandingState {
        self.state.get()
    }

    pub fn unmount(&self) {
        self.state.unmount();
    }

    pub fn cards(&self) -> Vec<PlanCard> {
        let state = self.state.get();
        let session = self.session.current_state();
        let current = if session.is_signed_in() {
            session.current_plan()
        } else {
            // Nothing is "current" for a visitor.
            PlanName::free()
        };
        let mut cards = cards_for(&state.catalog.tiers, &current, None);
        if !session.is_signed_in() {
            for card in &mut cards {
                card.is_current = false;
                card.disabled = false;
            }
        }
        cards
    }

    pub fn get_started(&self, tier: Option<&PlanName>) -> Result<EntryDecision, ClientError> {
        self.entry.get_started(tier)
    }

    pub fn sign_in_url(&self) -> Result<Url, ClientError> {
        self.entry.sign_in_url()
    }

    pub fn sign_up_url(&self) -> Result<Url, ClientError> {
        self.entry.sign_up_url()
    }
}
