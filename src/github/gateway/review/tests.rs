//! Wiremock-backed tests for the Octocrab review gateway.

use rstest::{fixture, rstest};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::OctocrabReviewGateway;
use crate::github::error::IntakeError;
use crate::github::gateway::ReviewGateway;
use crate::github::locator::{PersonalAccessToken, PullRequestNumber, RepositoryLocator};

const PULLS_PATH: &str = "/api/v3/repos/owner/repo/pulls";

struct Harness {
    server: MockServer,
    locator: RepositoryLocator,
    gateway: OctocrabReviewGateway,
}

#[fixture]
async fn harness() -> Harness {
    let server = MockServer::start().await;
    let locator =
        RepositoryLocator::with_api_base("owner", "repo", &format!("{}/api/v3", server.uri()))
            .expect("should create repository locator");
    let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
    let gateway =
        OctocrabReviewGateway::for_token(&token, &locator).expect("should create gateway");
    Harness {
        server,
        locator,
        gateway,
    }
}

fn number(value: u64) -> PullRequestNumber {
    PullRequestNumber::new(value).expect("pull request number should be positive")
}

#[rstest]
#[tokio::test]
async fn list_open_pull_requests_requests_open_state(#[future] harness: Harness) {
    let harness = harness.await;
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("state", "open"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "number": 42, "title": "Fix scheduler", "state": "open" },
            { "number": 7, "title": "Docs", "state": "open" }
        ])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let numbers = harness
        .gateway
        .list_open_pull_requests(&harness.locator)
        .await
        .expect("listing should succeed");

    assert_eq!(numbers, vec![number(42), number(7)]);
}

#[rstest]
#[tokio::test]
async fn list_open_pull_requests_maps_bad_credentials_to_authentication(
    #[future] harness: Harness,
) {
    let harness = harness.await;
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials"
            })),
        )
        .mount(&harness.server)
        .await;

    let error = harness
        .gateway
        .list_open_pull_requests(&harness.locator)
        .await
        .expect_err("listing should fail");

    assert!(
        matches!(error, IntakeError::Authentication { ref message } if message.contains("Bad credentials")),
        "expected Authentication, got {error:?}"
    );
}

#[rstest]
#[tokio::test]
async fn list_open_pull_requests_maps_missing_repository_to_not_found(
    #[future] harness: Harness,
) {
    let harness = harness.await;
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found"
        })))
        .mount(&harness.server)
        .await;

    let error = harness
        .gateway
        .list_open_pull_requests(&harness.locator)
        .await
        .expect_err("listing should fail");

    assert!(
        matches!(error, IntakeError::NotFound { .. }),
        "expected NotFound, got {error:?}"
    );
}

#[rstest]
#[tokio::test]
async fn list_open_pull_requests_maps_rate_limit_errors(#[future] harness: Harness) {
    let harness = harness.await;
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "message": "API rate limit exceeded for user",
            "documentation_url": "https://docs.github.com/rest/rate-limit"
        })))
        .mount(&harness.server)
        .await;

    let error = harness
        .gateway
        .list_open_pull_requests(&harness.locator)
        .await
        .expect_err("listing should fail");

    assert!(
        matches!(error, IntakeError::RateLimitExceeded { .. }),
        "expected RateLimitExceeded, got {error:?}"
    );
}

#[rstest]
#[tokio::test]
async fn list_reviewers_returns_user_logins(#[future] harness: Harness) {
    let harness = harness.await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/owner/repo/pulls/42/requested_reviewers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": [ { "login": "alice" }, { "login": "carol" } ],
            "teams": []
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let reviewers = harness
        .gateway
        .list_reviewers(&harness.locator, number(42))
        .await
        .expect("reviewer listing should succeed");

    assert_eq!(reviewers, vec!["alice".to_owned(), "carol".to_owned()]);
}

#[rstest]
#[tokio::test]
async fn list_reviewers_includes_pull_request_number_in_error(#[future] harness: Harness) {
    let harness = harness.await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/owner/repo/pulls/9/requested_reviewers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "Server Error"
        })))
        .mount(&harness.server)
        .await;

    let error = harness
        .gateway
        .list_reviewers(&harness.locator, number(9))
        .await
        .expect_err("reviewer listing should fail");

    assert!(
        error.to_string().contains("#9"),
        "expected pull request number in `{error}`"
    );
}
