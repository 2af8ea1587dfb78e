//! Plan picker view.
//!
//! Runs the per-selection checkout state machine. While one selection is in
//! flight every card is disabled and further selections are rejected
//! without contacting the provider.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::handlers::{CatalogState, CheckoutCoordinator, CheckoutStep, TierCatalogLoader};
use crate::application::{ClientError, SessionContext, ViewState};
use crate::domain::catalog::{Tier, TierCatalog};
use crate::domain::checkout::return_marker::scrub;
use crate::domain::checkout::{CheckoutStatus, ReturnMarker};
use crate::domain::foundation::PlanName;
use crate::ports::Navigator;

/// One tier as rendered by a picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCard {
    pub tier: Tier,
    pub popular: bool,
    pub is_current: bool,
    /// This card's selection is in flight.
    pub upgrading: bool,
    pub disabled: bool,
}

impl PlanCard {
    fn new(tier: &Tier, popular: bool, current: &PlanName, in_flight: Option<&PlanName>) -> Self {
        let is_current = &tier.name == current;
        Self {
            tier: tier.clone(),
            popular,
            is_current,
            upgrading: in_flight == Some(&tier.name),
            disabled: is_current || in_flight.is_some(),
        }
    }
}

/// Cards for a catalog, in catalog order.
pub(super) fn cards_for(
    catalog: &TierCatalog,
    current: &PlanName,
    in_flight: Option<&PlanName>,
) -> Vec<PlanCard> {
    catalog
        .tiers()
        .iter()
        .enumerate()
        .map(|(index, tier)| PlanCard::new(tier, catalog.is_popular(index), current, in_flight))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanSelectionState {
    pub catalog: CatalogState,
    pub checkout: CheckoutStatus,
    /// The page was reached by backing out of checkout.
    pub checkout_canceled: bool,
}

/// Result of a card selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Started(CheckoutStep),
    /// Another selection is in flight.
    Busy,
    /// The tier is the user's current plan.
    CurrentPlan,
    UnknownTier,
    /// The view was unmounted before the selection began.
    Unmounted,
    /// The attempt failed; the view shows a dismissible error.
    Failed(ClientError),
}

pub struct PlanSelectionView {
    session: Arc<SessionContext>,
    loader: Arc<TierCatalogLoader>,
    coordinator: Arc<CheckoutCoordinator>,
    navigator: Arc<dyn Navigator>,
    state: ViewState<PlanSelectionState>,
}

impl PlanSelectionView {
    pub fn new(
        session: Arc<SessionContext>,
        loader: Arc<TierCatalogLoader>,
        coordinator: Arc<CheckoutCoordinator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            loader,
            coordinator,
            navigator,
            state: ViewState::new("plan_selection", PlanSelectionState::default()),
        }
    }

    /// Page load: notes a cancel marker, then loads the catalog.
    pub async fn load(&self) {
        let url = self.navigator.current_url();
        if ReturnMarker::detect(&url) == Some(ReturnMarker::Canceled) {
            info!("Returned from a canceled checkout");
            self.navigator.replace_url(&scrub(&url));
            self.state.update(|s| s.checkout_canceled = true);
        }

        let load = self.loader.list_tiers().await;
        self.state
            .update(|s| s.catalog = CatalogState::from_load(load));
    }

    pub fn state(&self) -> PlanSelectionState {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<PlanSelectionState> {
        self.state.subscribe()
    }

    pub fn unmount(&self) {
        self.state.unmount();
    }

    pub fn current_plan(&self) -> PlanName {
        self.session.current_state().current_plan()
    }

    pub fn cards(&self) -> Vec<PlanCard> {
        let state = self.state.get();
        cards_for(
            &state.catalog.tiers,
            &self.current_plan(),
            state.checkout.in_flight_tier(),
        )
    }

    /// Selects the tier named `name`.
    pub async fn select(&self, name: &PlanName) -> Selection {
        let tier = match self.state.get().catalog.tiers.get(name) {
            Some(tier) => tier.clone(),
            None => return Selection::UnknownTier,
        };
        if &self.current_plan() == name {
            return Selection::CurrentPlan;
        }

        // Check-and-set in one update so two clicks cannot both begin.
        let begun = self.state.update(|s| match s.checkout.begin(tier.name.clone()) {
            Ok(next) => {
                s.checkout = next;
                true
            }
            Err(_) => false,
        });
        match begun {
            Some(true) => {}
            Some(false) => {
                debug!(tier = %name, "Selection ignored, another is in flight");
                return Selection::Busy;
            }
            None => return Selection::Unmounted,
        }

        let result = self.coordinator.start_checkout(&tier).await;

        self.state.update(|s| {
            let next = match &result {
                Ok(CheckoutStep::Redirected(_)) => s.checkout.redirecting(),
                Ok(CheckoutStep::LocalNavigation(_)) => s.checkout.settle(),
                Err(e) => s.checkout.failed(e.user_message()),
            };
            if let Ok(next) = next {
                s.checkout = next;
            }
        });

        match result {
            Ok(step) => Selection::Started(step),
            Err(e) => Selection::Failed(e),
        }
    }

    /// Dismisses a failed selection's error.
    pub fn dismiss_error(&self) {
        self.state.update(|s| {
            if let Ok(next) = s.checkout.settle() {
                s.checkout = next;
            }
        });
    }
}
