//! Session context - the single writer of `SessionState`.
//!
//! Every other component reads the state through `current_state`,
//! `subscribe` or `wait_ready`. Readiness is set once, by the first
//! initialization attempt, and never reverts.

use std::sync::Arc;

use tokio::sync::{watch, OnceCell};
use tracing::{info, warn};

use super::ClientError;
use crate::domain::session::{RouteDecision, SessionState, UserSnapshot};
use crate::ports::AuthProvider;

/// Owns provider readiness and the sign-in state.
pub struct SessionContext {
    auth: Arc<dyn AuthProvider>,
    state: watch::Sender<SessionState>,
    init: OnceCell<()>,
}

impl SessionContext {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        let (state, _rx) = watch::channel(SessionState::pending());
        Self {
            auth,
            state,
            init: OnceCell::new(),
        }
    }

    /// Initializes the provider client.
    ///
    /// Concurrent and repeated calls share the first attempt. A failed
    /// attempt still marks the session ready, signed out.
    pub async fn initialize(&self) {
        self.init
            .get_or_init(|| async {
                let next = match self.auth.init().await {
                    Ok(status) => {
                        info!(signed_in = status.signed_in, "Provider client initialized");
                        match status.user {
                            Some(user) if status.signed_in => SessionState::signed_in(user),
                            _ => SessionState::signed_out(),
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to init auth");
                        SessionState::signed_out()
                    }
                };
                self.state.send_replace(next);
            })
            .await;
    }

    pub fn current_state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    /// Suspends until initialization has settled.
    pub async fn wait_ready(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let ready = rx.wait_for(|state| state.is_ready()).await;
        match ready {
            Ok(state) => state.clone(),
            // The sender lives as long as `self`.
            Err(_) => self.current_state(),
        }
    }

    /// State if ready, `NotReady` otherwise.
    pub fn require_ready(&self) -> Result<SessionState, ClientError> {
        let state = self.current_state();
        if state.is_ready() {
            Ok(state)
        } else {
            Err(ClientError::NotReady)
        }
    }

    /// Signs out at the provider and always clears the local user.
    pub async fn sign_out(&self) {
        if let Err(e) = self.auth.sign_out().await {
            warn!(error = %e, "Provider sign-out failed, clearing local session anyway");
        }
        self.state.send_modify(|state| *state = state.cleared());
        info!("Signed out");
    }

    /// Re-reads the user from the provider and replaces the snapshot.
    pub async fn refresh(&self) -> Result<UserSnapshot, ClientError> {
        self.require_ready()?;

        let user = self.auth.refresh_user().await.map_err(|e| {
            warn!(error = %e, "Failed to refresh user");
            ClientError::from(e)
        })?;

        info!(user_id = %user.id, plan = %user.plan, "User refreshed");
        self.state
            .send_replace(SessionState::signed_in(user.clone()));
        Ok(user)
    }

    /// Access decision for a protected page.
    pub fn route_decision(&self, landing_path: &str) -> RouteDecision {
        RouteDecision::for_protected(&self.current_state(), landing_path)
    }
}
