//! HTTP surface tests for airfryer-server
//!
//! Each test builds the router over a temporary recipe document and drives it
//! with `oneshot` requests.

use std::path::{Path, PathBuf};

use airfryer_common::{
    Category, Collection, Controller, FileGateway, HttpGateway, Recipe, StorageGateway,
};
use airfryer_server::{build_router, AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const SEED: &str = r#"{
  "recipes": [
    {
      "category": "Gemüse",
      "items": [
        {
          "name": "Pommes",
          "menge": "500 g",
          "vorbereitung": "waschen",
          "in_oel_schwenken": "ja",
          "temperatur": "200°C",
          "garzeit": "20 min"
        },
        {
          "name": "Brokkoli",
          "menge": "",
          "vorbereitung": "",
          "in_oel_schwenken": "",
          "temperatur": "180°C",
          "garzeit": "8 min"
        }
      ]
    }
  ]
}"#;

/// Seed a document in `dir` and build the router over it
async fn test_app(dir: &TempDir) -> (Router, PathBuf) {
    let path = dir.path().join("data.json");
    std::fs::write(&path, SEED).unwrap();

    let mut controller = Controller::new(FileGateway::new(&path));
    controller.reload().await.unwrap();

    (build_router(AppState::new(controller)), path)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_action(app: &Router, action: Value) -> Value {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/actions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(action.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

async fn put_document(app: &Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/data/data.json")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn on_disk(path: &Path) -> Collection {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_health_and_buildinfo() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let (status, health) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["module"], "airfryer-server");

    let (status, info) = get_json(&app, "/api/buildinfo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
    assert!(info["git_hash"].is_string());
    assert_eq!(info["data_file"], path.display().to_string());
}

#[tokio::test]
async fn test_page_and_script_are_served() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.contains("text/html"));

    let request = Request::get("/static/app.js").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let script = String::from_utf8(body).unwrap();
    assert!(script.contains("/api/actions"));
    // Out-of-order responses are discarded by sequence number
    assert!(script.contains("seq >= state.renderedSeq"));
}

#[tokio::test]
async fn test_document_is_served_from_disk() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;

    let (status, document) = get_json(&app, "/data/data.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(document["recipes"][0]["category"], "Gemüse");
    assert_eq!(document["recipes"][0]["items"][0]["garzeit"], "20 min");
}

#[tokio::test]
async fn test_put_document_replaces_state_and_file() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let replacement = r#"{"recipes":[{"category":"Fleisch","items":[{"name":"Hähnchen","menge":"","vorbereitung":"","in_oel_schwenken":"","temperatur":"180°C","garzeit":"25 min"}]}]}"#;
    let (status, body) = put_document(&app, replacement).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));

    let stored = on_disk(&path);
    assert_eq!(stored.categories[0].name, "Fleisch");
    assert_eq!(stored.categories[0].items[0].name, "Hähnchen");

    // Pretty printed with 2-space indentation
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \"recipes\""));

    // In-memory state follows the document
    let (_, view) = get_json(&app, "/api/view").await;
    assert_eq!(view["categories"], json!(["Fleisch"]));
    assert!(view["html"].as_str().unwrap().contains("Hähnchen"));
}

#[tokio::test]
async fn test_put_document_drops_empty_categories() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let body = r#"{"recipes":[{"category":"Leer","items":[]},{"category":"Fleisch","items":[{"name":"Steak","temperatur":"200°C","garzeit":"10 min"}]}]}"#;
    let (status, _) = put_document(&app, body).await;
    assert_eq!(status, StatusCode::OK);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("Leer"));
    let stored = on_disk(&path);
    assert_eq!(stored.categories.len(), 1);
    assert_eq!(stored.categories[0].name, "Fleisch");
}

#[tokio::test]
async fn test_put_document_rejects_malformed_body() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let (status, body) = put_document(&app, "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "error"}));

    // Untouched
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SEED);
}

#[tokio::test]
async fn test_view_renders_and_filters() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;

    let (status, view) = get_json(&app, "/api/view").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["view"]["kind"], "tables");
    let html = view["html"].as_str().unwrap();
    assert!(html.contains("Pommes"));
    assert!(html.contains("Brokkoli"));

    let (_, filtered) = get_json(&app, "/api/view?q=brok").await;
    let html = filtered["html"].as_str().unwrap();
    assert!(html.contains("Brokkoli"));
    assert!(!html.contains("Pommes"));
    // Rows keep their place in the full collection
    assert!(html.contains(r#"data-category="0" data-item="1""#));

    let (_, none) = get_json(&app, "/api/view?q=zzz").await;
    assert_eq!(none["view"]["kind"], "empty");
    assert!(none["html"].as_str().unwrap().contains("No recipes found"));
}

#[tokio::test]
async fn test_submit_new_recipe_into_new_category() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let response = post_action(
        &app,
        json!({
            "action": "submit",
            "category": "Fisch",
            "recipe": {"name": "Lachs", "temperatur": "160°C", "garzeit": "12 min"}
        }),
    )
    .await;

    assert_eq!(response["close_editor"], true);
    assert!(response["notice"].is_null());
    assert_eq!(response["categories"], json!(["Gemüse", "Fisch"]));
    assert!(response["html"].as_str().unwrap().contains("Lachs"));

    let stored = on_disk(&path);
    assert_eq!(stored.categories[1].name, "Fisch");
    assert_eq!(stored.categories[1].items[0].temperature, "160°C");
    assert_eq!(stored.categories[1].items[0].amount, "");
}

#[tokio::test]
async fn test_submit_without_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let response = post_action(
        &app,
        json!({"action": "submit", "category": "Fisch", "recipe": {"name": "  "}}),
    )
    .await;

    assert_eq!(response["notice"]["level"], "error");
    assert_eq!(response["notice"]["code"], "INVALID_INPUT");
    assert_eq!(response["close_editor"], false);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SEED);
}

#[tokio::test]
async fn test_edit_field_persists_trimmed_value() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let response = post_action(
        &app,
        json!({
            "action": "edit_field",
            "address": {"category": 0, "item": 1},
            "field": "vorbereitung",
            "value": "  in Röschen teilen "
        }),
    )
    .await;

    assert_eq!(on_disk(&path).categories[0].items[1].preparation, "in Röschen teilen");
    // No fresh markup, so the page keeps the open detail row
    assert!(response["html"].is_null());
    assert!(response["notice"].is_null());
}

#[tokio::test]
async fn test_duplicate_then_delete() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let address = json!({"category": 0, "item": 0});
    post_action(&app, json!({"action": "duplicate", "address": address})).await;

    let stored = on_disk(&path);
    assert_eq!(stored.categories[0].items.len(), 3);
    assert_eq!(stored.categories[0].items[2].name, "Pommes (copy)");

    // Declined confirmation leaves everything alone
    let declined = post_action(&app, json!({"action": "delete", "address": address})).await;
    assert!(declined["html"].is_null());
    assert_eq!(on_disk(&path).categories[0].items.len(), 3);

    post_action(
        &app,
        json!({"action": "delete", "address": address, "confirmed": true}),
    )
    .await;
    let stored = on_disk(&path);
    assert_eq!(stored.categories[0].items.len(), 2);
    assert_eq!(stored.categories[0].items[0].name, "Brokkoli");
    assert_eq!(stored.categories[0].items[1].name, "Pommes (copy)");
}

#[tokio::test]
async fn test_import_replaces_collection() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let payload = r#"{"recipes":[{"category":"Snacks","items":[{"name":"Nachos","temperatur":"170°C","garzeit":"5 min"}]}]}"#;
    let response = post_action(&app, json!({"action": "import", "payload": payload})).await;

    assert_eq!(response["notice"]["level"], "info");
    assert_eq!(response["categories"], json!(["Snacks"]));
    assert_eq!(on_disk(&path).categories[0].items[0].name, "Nachos");
}

#[tokio::test]
async fn test_import_errors_leave_state_alone() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let bad_json = post_action(&app, json!({"action": "import", "payload": "{oops"})).await;
    assert_eq!(bad_json["notice"]["code"], "IMPORT_PARSE_ERROR");

    let no_recipes = post_action(&app, json!({"action": "import", "payload": "{\"foo\": 1}"})).await;
    assert_eq!(no_recipes["notice"]["code"], "IMPORT_FORMAT_ERROR");

    assert_eq!(std::fs::read_to_string(&path).unwrap(), SEED);
    let (_, view) = get_json(&app, "/api/view").await;
    assert!(view["html"].as_str().unwrap().contains("Pommes"));
}

#[tokio::test]
async fn test_unknown_action_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/actions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"action":"explode"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_get_recipe_omits_keys_missing_from_document() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;
    let sparse = r#"{"recipes":[{"category":"Fisch","items":[{"name":"Lachs","temperatur":"180°C","notiz":"Hautseite unten"}]}]}"#;
    put_document(&app, sparse).await;

    let (status, recipe) = get_json(&app, "/api/recipes/0/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        recipe,
        json!({"name": "Lachs", "temperatur": "180°C", "notiz": "Hautseite unten"})
    );

    let stored: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored, serde_json::from_str::<Value>(sparse).unwrap());
}

#[tokio::test]
async fn test_get_recipe() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;

    let (status, recipe) = get_json(&app, "/api/recipes/0/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recipe["name"], "Brokkoli");
    assert_eq!(recipe["temperatur"], "180°C");

    let (status, missing) = get_json(&app, "/api/recipes/3/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_export_download() {
    let dir = TempDir::new().unwrap();
    let (app, _) = test_app(&dir).await;

    let response = app
        .clone()
        .oneshot(Request::get("/api/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"airfryer_recipes.json\""
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let exported: Collection = serde_json::from_slice(&body).unwrap();
    assert_eq!(exported.recipe_count(), 2);
}

#[tokio::test]
async fn test_http_gateway_against_running_server() {
    let dir = TempDir::new().unwrap();
    let (app, path) = test_app(&dir).await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let gateway = HttpGateway::new(format!("http://{}/data/data.json", addr));

    let loaded = gateway.load().await.unwrap();
    assert_eq!(loaded.categories[0].items[0].name, "Pommes");

    let replacement = Collection::new(vec![Category::new(
        "Dessert",
        vec![Recipe::new("Apfelringe", "180°C", "10 min")],
    )]);
    gateway.save(&replacement).await.unwrap();

    assert_eq!(on_disk(&path), replacement);
    assert_eq!(gateway.load().await.unwrap(), replacement);
}
