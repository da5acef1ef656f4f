//! End-to-end integration tests for the solcanvas HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! EditorService -> core/storage/sandbox -> HTTP response.
//!
//! Each test creates a fresh AppState backed by an in-memory store and a
//! unique temp sandbox directory. Tests use `tower::ServiceExt::oneshot` to
//! send requests directly to the router without starting a network server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use solcanvas_server::router::build_router;
use solcanvas_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Creates a fresh router backed by an in-memory store.
fn test_app() -> Router {
    let state = AppState::in_memory().expect("failed to create in-memory AppState");
    build_router(state)
}

/// Sends a request with a JSON body and returns (status, json).
async fn send_json(
    app: &Router,
    method: &str,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", path, body).await
}

/// Sends a GET request and returns (status, json).
async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

/// Creates a project with one empty contract and opens it.
async fn open_contract(app: &Router) -> i64 {
    let (status, created) = post_json(app, "/projects", json!({"name": "Tokens"})).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_i64().unwrap();

    let (status, _) = post_json(
        app,
        &format!("/projects/{}/contracts", id),
        json!({"name": "Token"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, summary) = post_json(
        app,
        &format!("/projects/{}/contracts/Token/open", id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["contract"], "Token");
    id
}

/// Drops a palette template at `(x, y)` and returns the new node id.
async fn drop_template(app: &Router, kind: &str, x: f64, y: f64) -> String {
    let (status, _) = post_json(
        app,
        "/editor/drag/start",
        json!({
            "payload": {"type": "template", "kind": kind},
            "pointer": {"x": x, "y": y}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, outcome) =
        post_json(app, "/editor/drag/end", json!({"drop": {"x": x, "y": y}})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], "inserted");
    outcome["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_lifecycle() {
    let app = test_app();
    let id = open_contract(&app).await;

    let (status, list) = get_json(&app, "/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["projects"][0]["name"], "Tokens");
    assert_eq!(list["projects"][0]["contracts"], json!(["Token"]));

    let (status, err) = post_json(
        &app,
        &format!("/projects/{}/contracts", id),
        json!({"name": "Token"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["success"], false);

    let (status, _) = send_json(&app, "DELETE", &format!("/projects/{}", id), json!(null)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, summary) = get_json(&app, "/editor").await;
    assert_eq!(summary["contract"], json!(null));

    let (status, err) = send_json(&app, "DELETE", &format!("/projects/{}", id), json!(null)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn add_contract_accepts_full_description() {
    let app = test_app();
    let (_, created) = post_json(&app, "/projects", json!({"name": "Vaults"})).await;
    let id = created["id"].as_i64().unwrap();

    let (status, added) = post_json(
        &app,
        &format!("/projects/{}/contracts", id),
        json!({"contract": {
            "name": "Vault",
            "variables": [{"id": "variable-1", "name": "owner", "data_type": "address"}],
            "events": [{"id": "event-1", "name": "Deposited"}],
            "component_layout": {"connections": [{"from": "event-1", "to": "variable-1"}]}
        }}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["name"], "Vault");
    assert_eq!(added["components"], 2);

    let (_, summary) = post_json(
        &app,
        &format!("/projects/{}/contracts/Vault/open", id),
        json!({}),
    )
    .await;
    assert_eq!(summary["components"], 2);
    assert_eq!(summary["connections"], 1);
    assert_eq!(summary["dirty"], false);
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

#[tokio::test]
async fn palette_and_forms() {
    let app = test_app();
    let (status, body) = get_json(&app, "/templates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["templates"].as_array().unwrap().len(), 14);

    let (status, form) = get_json(&app, "/forms/function").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["kind"], "function");
    assert!(form["fields"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["name"] == "name"));

    let (status, _) = get_json(&app, "/forms/widget").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Drag protocol
// ---------------------------------------------------------------------------

#[tokio::test]
async fn drag_inserts_snapped_node_and_save_clears_dirty() {
    let app = test_app();
    open_contract(&app).await;

    let (status, _) = post_json(
        &app,
        "/editor/drag/start",
        json!({"payload": {"type": "template", "kind": "function"}, "pointer": {"x": 5.0, "y": 5.0}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, moved) =
        post_json(&app, "/editor/drag/move", json!({"pointer": {"x": 131.0, "y": 89.0}})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["preview"], json!({"x": 140.0, "y": 80.0}));

    let (_, outcome) = post_json(
        &app,
        "/editor/drag/end",
        json!({"drop": {"x": 131.0, "y": 89.0}}),
    )
    .await;
    assert_eq!(outcome["outcome"], "inserted");
    assert_eq!(outcome["position"], json!({"x": 140.0, "y": 80.0}));

    let (_, summary) = get_json(&app, "/editor").await;
    assert_eq!(summary["dirty"], true);
    assert_eq!(summary["components"], 1);
    assert_eq!(summary["nodes"][0]["data"]["name"], "newFunction");

    let (status, saved) = post_json(&app, "/editor/save", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["changed"], true);
    let (_, summary) = get_json(&app, "/editor").await;
    assert_eq!(summary["dirty"], false);
}

#[tokio::test]
async fn dragging_existing_node_moves_by_delta() {
    let app = test_app();
    open_contract(&app).await;
    let id = drop_template(&app, "event", 40.0, 40.0).await;

    post_json(
        &app,
        "/editor/drag/start",
        json!({"payload": {"type": "existing", "id": id}, "pointer": {"x": 100.0, "y": 100.0}}),
    )
    .await;
    let (_, outcome) = post_json(
        &app,
        "/editor/drag/end",
        json!({"drop": {"x": 162.0, "y": 139.0}}),
    )
    .await;
    assert_eq!(outcome["outcome"], "moved");
    assert_eq!(outcome["from"], json!({"x": 40.0, "y": 40.0}));
    assert_eq!(outcome["to"], json!({"x": 100.0, "y": 80.0}));
}

#[tokio::test]
async fn out_of_order_drag_events_conflict() {
    let app = test_app();
    open_contract(&app).await;

    let (status, err) =
        post_json(&app, "/editor/drag/move", json!({"pointer": {"x": 1.0, "y": 1.0}})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"]["code"], "CONFLICT");

    let (status, _) = post_json(&app, "/editor/drag/end", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let start = json!({"payload": {"type": "template", "kind": "enum"}, "pointer": {"x": 1.0, "y": 1.0}});
    post_json(&app, "/editor/drag/start", start.clone()).await;
    let (status, _) = post_json(&app, "/editor/drag/start", start).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, outcome) = post_json(&app, "/editor/drag/cancel", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["outcome"], "cancelled");
    let (_, summary) = get_json(&app, "/editor").await;
    assert_eq!(summary["components"], 0);
    assert_eq!(summary["dragging"], false);
}

#[tokio::test]
async fn release_outside_canvas_cancels() {
    let app = test_app();
    open_contract(&app).await;
    post_json(
        &app,
        "/editor/drag/start",
        json!({"payload": {"type": "template", "kind": "mapping"}, "pointer": {"x": 1.0, "y": 1.0}}),
    )
    .await;
    let (_, outcome) = post_json(&app, "/editor/drag/end", json!({"drop": null})).await;
    assert_eq!(outcome["outcome"], "cancelled");
    let (_, summary) = get_json(&app, "/editor").await;
    assert_eq!(summary["dirty"], false);
}

// ---------------------------------------------------------------------------
// Node edits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_node_update_is_rejected_with_field_errors() {
    let app = test_app();
    open_contract(&app).await;
    let id = drop_template(&app, "event", 40.0, 40.0).await;

    let (status, err) = send_json(
        &app,
        "PUT",
        &format!("/editor/nodes/{}", id),
        json!({"data": {"type": "event", "name": "1bad"}}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(err["error"]["details"][0]["field"], "name");

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/editor/nodes/{}", id),
        json!({"data": {"type": "function", "name": "transfer"}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, ok) = send_json(
        &app,
        "PUT",
        &format!("/editor/nodes/{}", id),
        json!({"data": {"type": "event", "name": "Transfer"}, "width": 300.0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ok["node"]["data"]["name"], "Transfer");
    assert_eq!(ok["node"]["width"], 300.0);
}

#[tokio::test]
async fn deleting_node_prunes_connections() {
    let app = test_app();
    open_contract(&app).await;
    let a = drop_template(&app, "function", 40.0, 40.0).await;
    let b = drop_template(&app, "variable", 340.0, 40.0).await;
    let c = drop_template(&app, "event", 640.0, 40.0).await;

    for (from, to) in [(&a, &b), (&c, &b), (&a, &c)] {
        let (status, body) =
            post_json(&app, "/editor/connections", json!({"from": from, "to": to})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["changed"], true);
    }
    let (_, again) = post_json(&app, "/editor/connections", json!({"from": a, "to": b})).await;
    assert_eq!(again["changed"], false);

    let (status, _) = post_json(&app, "/editor/connections", json!({"from": a, "to": a})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send_json(&app, "DELETE", &format!("/editor/nodes/{}", b), json!(null)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, summary) = get_json(&app, "/editor").await;
    assert_eq!(summary["components"], 2);
    assert_eq!(summary["connections"], 1);
    for node in summary["nodes"].as_array().unwrap() {
        assert!(!node["connections"]
            .as_array()
            .unwrap()
            .iter()
            .any(|target| target == &json!(b)));
    }

    let (_, removed) =
        send_json(&app, "DELETE", "/editor/connections", json!({"from": a, "to": c})).await;
    assert_eq!(removed["changed"], true);
}

// ---------------------------------------------------------------------------
// Rendering, layout, export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn render_culls_outside_viewport() {
    let app = test_app();
    open_contract(&app).await;
    drop_template(&app, "function", 40.0, 40.0).await;
    drop_template(&app, "variable", 4000.0, 4000.0).await;

    let (status, body) = post_json(
        &app,
        "/editor/render",
        json!({"viewport": {"x": 0.0, "y": 0.0, "width": 800.0, "height": 600.0}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    let nodes = body["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["kind"], "function");
}

#[tokio::test]
async fn layout_places_unpositioned_members() {
    let app = test_app();
    let (_, created) = post_json(&app, "/projects", json!({"name": "Layout"})).await;
    let id = created["id"].as_i64().unwrap();
    post_json(
        &app,
        &format!("/projects/{}/contracts", id),
        json!({"contract": {
            "name": "Plain",
            "functions": [{"id": "function-1", "name": "run"}]
        }}),
    )
    .await;
    post_json(&app, &format!("/projects/{}/contracts/Plain/open", id), json!({})).await;

    // Loading already placed everything.
    let (status, body) = post_json(&app, "/editor/layout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["placed"], 0);

    let (_, summary) = get_json(&app, "/editor").await;
    let position = &summary["nodes"][0]["position"];
    assert_ne!(position, &json!({"x": 0.0, "y": 0.0}));
}

#[tokio::test]
async fn export_writes_contract_into_sandbox() {
    let app = test_app();
    open_contract(&app).await;
    drop_template(&app, "variable", 40.0, 40.0).await;

    let (status, body) = post_json(&app, "/editor/export", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["file"], "contracts/Token.json");

    let directory = std::path::PathBuf::from(body["directory"].as_str().unwrap());
    assert!(directory.join("package.json").exists());
    let exported = std::fs::read_to_string(directory.join("contracts/Token.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(json["name"], "Token");
    assert_eq!(json["variables"][0]["name"], "newVariable");

    std::fs::remove_dir_all(directory.parent().unwrap()).ok();
}

#[tokio::test]
async fn editor_endpoints_need_an_open_contract() {
    let app = test_app();
    let (status, _) = post_json(&app, "/editor/save", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = post_json(&app, "/editor/export", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, summary) = get_json(&app, "/editor").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["components"], 0);
}
