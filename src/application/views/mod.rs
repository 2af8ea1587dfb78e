//! Page view models.
//!
//! Each view owns request-scoped state in a `ViewState`, drives the
//! handlers, and turns their results into flags and notices. Results that
//! arrive after `unmount()` are dropped.

mod dashboard;
mod landing;
mod plan_selection;

pub use dashboard::{DashboardState, DashboardView, Notice};
pub use landing::{LandingState, LandingView};
pub use plan_selection::{PlanCard, PlanSelectionState, PlanSelectionView, Selection};
