mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use common::{five_ideas, ScriptedProvider};
use ideagen::favorites::{FavoriteStore, MemoryFavorites};
use ideagen::server::{build_router, AppState};
use ideagen::IdeaGenerator;

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

fn app(provider: Arc<ScriptedProvider>, favorites: Arc<MemoryFavorites>) -> axum::Router {
    build_router(Arc::new(AppState { generator: IdeaGenerator::new(provider), favorites }))
}

async fn post(app: axum::Router, uri: &str, body: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1_048_576).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_returns_ideas_with_favorites_merged() {
    let provider = ScriptedProvider::replying(five_ideas().to_string());
    let favorites = Arc::new(MemoryFavorites::with_ids(["2"]));
    let resp = post(
        app(provider, favorites),
        "/api/generate",
        r#"{"prompt":"bakery carousel ideas","options":{"categorized":false}}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    let ideas = body["data"]["ideas"].as_array().unwrap();
    assert_eq!(ideas.len(), 5);
    assert_eq!(ideas[0]["isFavorite"], false);
    assert_eq!(ideas[1]["id"], "2");
    assert_eq!(ideas[1]["isFavorite"], true);
}

#[tokio::test]
async fn categorized_response_uses_category_name() {
    let reply = json!({"categories":[{"name":"Tips","ideas":[{"id":"1","title":"T","description":"D"}]}]});
    let provider = ScriptedProvider::replying(reply.to_string());
    let resp = post(
        app(provider, Arc::new(MemoryFavorites::new())),
        "/api/generate",
        r#"{"prompt":"x","options":{"categorized":true,"count":3}}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["categories"][0]["categoryName"], "Tips");
    assert!(body["data"].get("extraIdeas").is_none());
}

#[tokio::test]
async fn prefs_with_unlisted_fields_and_numbers_is_accepted() {
    let reply = json!({"categories":[{"categoryName":"Tips","ideas":[{"id":"1","title":"T","description":"D"}]}]});
    let provider = ScriptedProvider::replying(reply.to_string());
    let resp = post(
        app(provider.clone(), Arc::new(MemoryFavorites::new())),
        "/api/generate",
        r#"{"prefs":{"audience":{"ageRange":30},"enabledPlatforms":["tiktok"]}}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user = provider.last_call().user;
    assert!(user.ends_with(r#"{"audience":{"ageRange":30},"enabledPlatforms":["tiktok"]}"#));
}

#[tokio::test]
async fn malformed_body_is_400_with_issues() {
    let provider = ScriptedProvider::replying(five_ideas().to_string());
    let resp = post(app(provider.clone(), Arc::new(MemoryFavorites::new())), "/api/generate", "{oops").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"][0]["path"], "$");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn both_branches_is_400() {
    let provider = ScriptedProvider::replying(five_ideas().to_string());
    let resp = post(
        app(provider.clone(), Arc::new(MemoryFavorites::new())),
        "/api/generate",
        r#"{"prompt":"x","prefs":{}}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["actual"], "both");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn empty_body_object_is_400() {
    let provider = ScriptedProvider::replying(five_ideas().to_string());
    let resp = post(app(provider, Arc::new(MemoryFavorites::new())), "/api/generate", "{}").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_failure_is_500_with_message() {
    let provider = ScriptedProvider::failing("invalid api key");
    let resp = post(app(provider, Arc::new(MemoryFavorites::new())), "/api/generate", r#"{"prompt":"x"}"#).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("invalid api key"));
}

#[tokio::test]
async fn schema_failure_is_500_and_names_field() {
    let provider = ScriptedProvider::replying(r#"{"ideas":[{"id":"1","description":"D"}]}"#);
    let resp = post(app(provider, Arc::new(MemoryFavorites::new())), "/api/generate", r#"{"prompt":"x"}"#).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("ideas[0].title"));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn toggle_round_trip_restores_store() {
    let favorites = Arc::new(MemoryFavorites::new());
    let provider = ScriptedProvider::replying("{}");
    let idea = json!({"id":"42","title":"T","description":"D","isFavorite":false});

    let resp = post(
        app(provider.clone(), favorites.clone()),
        "/api/favorites/toggle",
        &json!({ "idea": idea }).to_string(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let on = body_json(resp).await;
    assert_eq!(on["data"]["isFavorite"], true);
    assert!(favorites.contains("42").unwrap());

    let resp = post(
        app(provider, favorites.clone()),
        "/api/favorites/toggle",
        &json!({ "idea": on["data"] }).to_string(),
    )
    .await;
    let off = body_json(resp).await;
    assert_eq!(off["data"], idea);
    assert!(!favorites.contains("42").unwrap());
}

#[tokio::test]
async fn list_favorites() {
    let favorites = Arc::new(MemoryFavorites::with_ids(["b", "a"]));
    let resp = app(ScriptedProvider::replying("{}"), favorites)
        .oneshot(Request::builder().uri("/api/favorites").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"success": true, "data": ["a", "b"]}));
}
