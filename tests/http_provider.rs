//! Integration tests for the HTTP provider adapter against a mock server.

use httpmock::prelude::*;
use serde_json::json;
use url::Url;

use plan_gate::adapters::{HttpProvider, HttpProviderConfig};
use plan_gate::domain::foundation::{Allowance, PlanName};
use plan_gate::ports::{
    AuthProvider, BillingProvider, CheckoutRequest, ProductCatalog, ProviderErrorCode, UsageMeter,
};

const KEY: &str = "pk_test_integration";

fn provider(server: &MockServer) -> HttpProvider {
    let base = Url::parse(&server.base_url()).unwrap();
    HttpProvider::new(HttpProviderConfig::new(base, KEY)).unwrap()
}

fn user_json(plan: &str) -> serde_json::Value {
    json!({ "id": "user_1", "email": "ada@example.com", "plan": plan })
}

#[tokio::test]
async fn init_stores_token_and_sends_it_afterwards() {
    let server = MockServer::start_async().await;
    let session = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/auth/session")
                .header("X-Publishable-Key", KEY);
            then.status(200).json_body(json!({
                "signedIn": true,
                "user": user_json("free"),
                "token": "tok_abc"
            }));
        })
        .await;
    let usage = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/usage")
                .header("authorization", "Bearer tok_abc");
            then.status(200).json_body(json!({
                "usageCount": 3,
                "limit": 100,
                "remaining": 97,
                "plan": "free"
            }));
        })
        .await;

    let provider = provider(&server);
    let status = provider.init().await.unwrap();
    assert!(status.signed_in);
    assert_eq!(status.user.unwrap().plan, PlanName::free());
    assert!(provider.has_session_token());

    let snapshot = provider.check().await.unwrap();
    assert_eq!(snapshot.count, 3);
    assert_eq!(snapshot.remaining, Allowance::Limited(97));

    session.assert_async().await;
    usage.assert_async().await;
}

#[tokio::test]
async fn unauthorized_init_means_signed_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/auth/session");
            then.status(401);
        })
        .await;

    let provider = provider(&server);
    let status = provider.init().await.unwrap();

    assert!(!status.signed_in);
    assert!(status.user.is_none());
    assert!(!provider.has_session_token());
}

#[tokio::test]
async fn tiers_accept_unlimited_sentinel() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/products/tiers");
            then.status(200).json_body(json!({
                "tiers": [
                    { "name": "free", "price": 0, "limit": 100, "features": ["100 events"] },
                    { "name": "pro", "displayName": "Pro", "price": 20, "limit": -1, "priceId": "price_pro" }
                ]
            }));
        })
        .await;

    let tiers = provider(&server).list_tiers().await.unwrap();

    assert_eq!(tiers.len(), 2);
    assert_eq!(tiers[1].limit, Allowance::Unlimited);
    assert_eq!(tiers[1].price_ref, "price_pro");
    assert_eq!(tiers[1].label(), "Pro");
}

#[tokio::test]
async fn malformed_tiers_are_invalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/products/tiers");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = provider(&server).list_tiers().await.unwrap_err();

    assert_eq!(err.code, ProviderErrorCode::InvalidResponse);
    assert!(!err.retryable);
}

#[tokio::test]
async fn over_quota_track_is_a_rejection_not_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/usage/track");
            then.status(402).json_body(json!({ "error": "quota exceeded" }));
        })
        .await;

    let receipt = provider(&server).track().await.unwrap();

    assert!(!receipt.accepted);
}

#[tokio::test]
async fn throttled_track_is_a_rate_limit_error() {
    let server = MockServer::start_async().await;
    let track = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/usage/track");
            then.status(429);
        })
        .await;

    let err = provider(&server).track().await.unwrap_err();

    track.assert_async().await;
    assert_eq!(err.code, ProviderErrorCode::RateLimited);
    assert_eq!(err.status, Some(429));
}

#[tokio::test]
async fn server_errors_map_to_provider_codes() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/usage/track");
            then.status(503);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/usage");
            then.status(429);
        })
        .await;

    let provider = provider(&server);

    let track_err = provider.track().await.unwrap_err();
    assert_eq!(track_err.code, ProviderErrorCode::Provider);
    assert_eq!(track_err.status, Some(503));
    assert!(track_err.retryable);

    let check_err = provider.check().await.unwrap_err();
    assert_eq!(check_err.code, ProviderErrorCode::RateLimited);
}

#[tokio::test]
async fn checkout_posts_camel_case_body() {
    let server = MockServer::start_async().await;
    let checkout = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/billing/checkout")
                .header("X-Publishable-Key", KEY)
                .json_body(json!({
                    "tier": "pro",
                    "priceId": "price_pro",
                    "successUrl": "https://app.example.com/dashboard?success=true&upgraded_to=pro",
                    "cancelUrl": "https://app.example.com/choose-plan?canceled=true"
                }));
            then.status(200).json_body(json!({
                "id": "cs_1",
                "url": "https://checkout.provider.example/cs_1"
            }));
        })
        .await;

    let session = provider(&server)
        .create_checkout(CheckoutRequest {
            tier: PlanName::new("pro").unwrap(),
            price_ref: "price_pro".to_string(),
            success_url: Url::parse(
                "https://app.example.com/dashboard?success=true&upgraded_to=pro",
            )
            .unwrap(),
            cancel_url: Url::parse("https://app.example.com/choose-plan?canceled=true").unwrap(),
        })
        .await
        .unwrap();

    checkout.assert_async().await;
    assert_eq!(session.id.as_deref(), Some("cs_1"));
    assert_eq!(
        session.url.as_deref(),
        Some("https://checkout.provider.example/cs_1")
    );
}

#[tokio::test]
async fn portal_without_url_yields_empty_session() {
    let server = MockServer::start_async().await;
    let portal = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/billing/portal")
                .json_body(json!({ "returnUrl": "https://app.example.com/dashboard" }));
            then.status(200).json_body(json!({ "url": "" }));
        })
        .await;

    let session = provider(&server)
        .open_portal(&Url::parse("https://app.example.com/dashboard").unwrap())
        .await
        .unwrap();

    portal.assert_async().await;
    assert!(session.url.is_none());
}

#[tokio::test]
async fn sign_out_clears_token_even_on_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/auth/session");
            then.status(200).json_body(json!({
                "signedIn": true,
                "user": user_json("pro"),
                "token": "tok_abc"
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/auth/sign-out");
            then.status(500);
        })
        .await;

    let provider = provider(&server);
    provider.init().await.unwrap();
    assert!(provider.has_session_token());

    assert!(provider.sign_out().await.is_err());
    assert!(!provider.has_session_token());
}

#[tokio::test]
async fn unreachable_provider_is_a_retryable_network_error() {
    let base = Url::parse("http://127.0.0.1:9/").unwrap();
    let provider = HttpProvider::new(HttpProviderConfig::new(base, KEY)).unwrap();

    let err = provider.list_tiers().await.unwrap_err();

    assert_eq!(err.code, ProviderErrorCode::Network);
    assert!(err.retryable);
}
