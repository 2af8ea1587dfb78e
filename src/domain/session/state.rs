//! Session state published by the session context.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanName, UserId};

/// Identity and entitlement of the signed-in user.
///
/// Replaced wholesale on refresh, never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub plan: PlanName,
}

impl UserSnapshot {
    pub fn new(id: UserId, email: impl Into<String>, plan: PlanName) -> Self {
        Self {
            id,
            email: email.into(),
            plan,
        }
    }
}

/// Readiness and sign-in state of the provider client.
///
/// `ready` flips to true once, after the first initialization attempt
/// settles (successfully or not). `signed_in` and `user` mean nothing
/// before that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    ready: bool,
    signed_in: bool,
    user: Option<UserSnapshot>,
}

impl SessionState {
    /// Initialization has not settled yet.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Initialization settled with a signed-in user.
    pub fn signed_in(user: UserSnapshot) -> Self {
        Self {
            ready: true,
            signed_in: true,
            user: Some(user),
        }
    }

    /// Initialization settled without a user (including failed attempts).
    pub fn signed_out() -> Self {
        Self {
            ready: true,
            signed_in: false,
            user: None,
        }
    }

    /// Same readiness, no user.
    pub fn cleared(&self) -> Self {
        Self {
            ready: self.ready,
            signed_in: false,
            user: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_signed_in(&self) -> bool {
        self.ready && self.signed_in
    }

    pub fn user(&self) -> Option<&UserSnapshot> {
        if self.ready {
            self.user.as_ref()
        } else {
            None
        }
    }

    /// Whether auth-dependent actions may run.
    pub fn can_act(&self) -> bool {
        self.is_signed_in()
    }

    /// The user's plan, or the free plan when nobody is signed in.
    pub fn current_plan(&self) -> PlanName {
        self.user()
            .map(|u| u.plan.clone())
            .unwrap_or_else(PlanName::free)
    }
}
