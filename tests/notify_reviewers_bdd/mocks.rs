//! Wiremock seeding for GitHub and Discord endpoints.
//!
//! Both APIs are served from one mock server: GitHub under `/api/v3` and
//! Discord under `/discord`.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::state::RequestedReviewers;

pub(crate) const GUILD_ID: &str = "1000";
pub(crate) const DISCORD_PREFIX: &str = "/discord";
const PULLS_PATH: &str = "/api/v3/repos/owner/repo/pulls";

/// Mounts the pull request listing and one reviewer listing per pull
/// request.
pub(crate) async fn mount_github(server: &MockServer, pull_requests: &[RequestedReviewers]) {
    let listing: Vec<_> = pull_requests
        .iter()
        .map(|(number, _)| json!({ "number": number, "state": "open" }))
        .collect();
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("state", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(server)
        .await;

    for (number, reviewers) in pull_requests {
        let users: Vec<_> = reviewers
            .iter()
            .map(|login| json!({ "login": login }))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("{PULLS_PATH}/{number}/requested_reviewers")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "users": users, "teams": [] })),
            )
            .mount(server)
            .await;
    }
}

/// Mounts a 401 response for the pull request listing.
pub(crate) async fn mount_rejecting_github(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(server)
        .await;
}

/// Mounts member search, channel, and message endpoints for `chat_username`.
pub(crate) async fn mount_discord_member(
    server: &MockServer,
    chat_username: &str,
    channel_fails: bool,
) {
    let (name, discriminator) = chat_username
        .split_once('#')
        .unwrap_or((chat_username, "0"));
    let padded_discriminator = format!("{discriminator:0>4}");
    let user_id = format!("id-{name}");
    let channel_id = format!("dm-{name}");

    Mock::given(method("GET"))
        .and(path(format!(
            "{DISCORD_PREFIX}/guilds/{GUILD_ID}/members/search"
        )))
        .and(query_param("query", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "user": {
                "id": user_id.as_str(),
                "username": name,
                "global_name": null,
                "discriminator": padded_discriminator.as_str()
            },
            "nick": null
        }])))
        .mount(server)
        .await;

    let channel_response = if channel_fails {
        ResponseTemplate::new(500).set_body_json(json!({ "message": "Internal Server Error" }))
    } else {
        ResponseTemplate::new(200).set_body_json(json!({ "id": channel_id.as_str(), "type": 1 }))
    };
    Mock::given(method("POST"))
        .and(path(format!("{DISCORD_PREFIX}/users/@me/channels")))
        .and(body_json(json!({ "recipient_id": user_id.as_str() })))
        .respond_with(channel_response)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{DISCORD_PREFIX}/channels/{channel_id}/messages")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg" })))
        .mount(server)
        .await;
}
