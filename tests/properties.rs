//! Property tests for session readiness, quota rejection and URL scrubbing.

use std::sync::Arc;

use proptest::prelude::*;
use url::Url;

use plan_gate::adapters::MockProvider;
use plan_gate::application::{SessionContext, UsageTracker};
use plan_gate::domain::checkout::return_marker::{
    scrub, CANCELED_PARAM, SUCCESS_PARAM, UPGRADED_TO_PARAM,
};
use plan_gate::domain::checkout::ReturnMarker;
use plan_gate::domain::foundation::{Allowance, PlanName, UserId};
use plan_gate::domain::session::UserSnapshot;
use plan_gate::domain::usage::{TrackOutcome, UsageSnapshot};
use plan_gate::ports::ProviderError;

#[derive(Debug, Clone)]
enum SessionOp {
    Initialize,
    SignOut,
    Refresh,
    SignInAtProvider,
    FailNextCall,
}

fn session_op() -> impl Strategy<Value = SessionOp> {
    prop_oneof![
        Just(SessionOp::Initialize),
        Just(SessionOp::SignOut),
        Just(SessionOp::Refresh),
        Just(SessionOp::SignInAtProvider),
        Just(SessionOp::FailNextCall),
    ]
}

fn user() -> UserSnapshot {
    UserSnapshot::new(UserId::new("user_1").unwrap(), "ada@example.com", PlanName::free())
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ready_flips_once_and_never_reverts(
        signed_in in any::<bool>(),
        ops in prop::collection::vec(session_op(), 0..24),
    ) {
        let readiness = runtime().block_on(async {
            let mock = if signed_in {
                MockProvider::signed_in_as(user())
            } else {
                MockProvider::new()
            };
            let session = SessionContext::new(Arc::new(mock.clone()));

            let mut readiness = vec![session.is_ready()];
            for op in &ops {
                match op {
                    SessionOp::Initialize => session.initialize().await,
                    SessionOp::SignOut => session.sign_out().await,
                    SessionOp::Refresh => {
                        let _ = session.refresh().await;
                    }
                    SessionOp::SignInAtProvider => mock.sign_in(user()),
                    SessionOp::FailNextCall => mock.set_error(ProviderError::network("flaky")),
                }
                readiness.push(session.is_ready());
            }
            readiness
        });

        prop_assert!(!readiness[0]);
        let flips = readiness.windows(2).filter(|w| !w[0] && w[1]).count();
        let reverts = readiness.windows(2).filter(|w| w[0] && !w[1]).count();
        prop_assert!(flips <= 1);
        prop_assert_eq!(reverts, 0);

        let initialized = ops.iter().any(|op| matches!(op, SessionOp::Initialize));
        prop_assert_eq!(readiness.last().copied(), Some(initialized));
    }

    #[test]
    fn rejected_events_leave_usage_alone(
        count in 0u64..10_000,
        limit in 0u64..10_000,
        attempts in 1usize..8,
    ) {
        let (reports, before, after) = runtime().block_on(async {
            let mock = MockProvider::signed_in_as(user());
            let snapshot = UsageSnapshot::new(
                count,
                Allowance::Limited(limit),
                Allowance::Limited(limit.saturating_sub(count)),
                PlanName::free(),
            );
            mock.set_usage(snapshot.clone());
            mock.set_track_accepts(false);

            let session = Arc::new(SessionContext::new(Arc::new(mock.clone())));
            session.initialize().await;
            let tracker = UsageTracker::new(session, Arc::new(mock.clone()));

            let mut reports = Vec::new();
            for _ in 0..attempts {
                reports.push(tracker.track_event().await.unwrap());
            }
            (reports, snapshot, mock.usage())
        });

        for report in &reports {
            prop_assert_eq!(report.outcome, TrackOutcome::QuotaExhausted);
            prop_assert!(report.usage.is_none());
        }
        prop_assert_eq!(after, before);
    }

    #[test]
    fn scrubbing_keeps_every_other_parameter(
        params in prop::collection::vec(("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,8}"), 0..6),
        success in any::<bool>(),
        canceled in any::<bool>(),
        upgraded_to in prop::option::of("[a-z]{1,8}"),
        fragment in prop::option::of("[a-z]{1,8}"),
    ) {
        let params: Vec<(String, String)> = params
            .into_iter()
            .filter(|(key, _)| {
                ![SUCCESS_PARAM, CANCELED_PARAM, UPGRADED_TO_PARAM].contains(&key.as_str())
            })
            .collect();

        let mut url = Url::parse("https://app.example.com/dashboard").unwrap();
        {
            let mut query = url.query_pairs_mut();
            for (i, (key, value)) in params.iter().enumerate() {
                query.append_pair(key, value);
                if i == 0 && success {
                    query.append_pair(SUCCESS_PARAM, "true");
                }
            }
            if params.is_empty() && success {
                query.append_pair(SUCCESS_PARAM, "true");
            }
            if canceled {
                query.append_pair(CANCELED_PARAM, "true");
            }
            if let Some(plan) = &upgraded_to {
                query.append_pair(UPGRADED_TO_PARAM, plan);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url.set_fragment(fragment.as_deref());

        let scrubbed = scrub(&url);

        let kept: Vec<(String, String)> = scrubbed.query_pairs().into_owned().collect();
        prop_assert_eq!(kept, params);
        prop_assert_eq!(ReturnMarker::detect(&scrubbed), None);
        prop_assert_eq!(scrubbed.fragment(), fragment.as_deref());
        prop_assert_eq!(scrubbed.path(), "/dashboard");
    }
}
