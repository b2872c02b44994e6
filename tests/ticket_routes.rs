use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{DateTime, FixedOffset};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

use helpdesk::{
    routes::API_PREFIX,
    state::AppState,
    test_helpers::{test_router, test_state},
};

fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

async fn json_response(
    state: &Arc<AppState>,
    request: Request<Body>,
) -> (StatusCode, HeaderMap, Value) {
    let response = test_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, headers, json)
}

async fn get_json(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let (status, _, body) = json_response(
        state,
        Request::builder()
            .uri(api_path(path))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    (status, body)
}

async fn send_json(
    state: &Arc<AppState>,
    method: &str,
    path: &str,
    payload: Value,
) -> (StatusCode, HeaderMap, Value) {
    json_response(
        state,
        Request::builder()
            .method(method)
            .uri(api_path(path))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await
}

async fn create_ticket(state: &Arc<AppState>, payload: Value) -> Value {
    let (status, _, ticket) = send_json(state, "POST", "/tickets", payload).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {ticket}");
    ticket
}

async fn user_id(state: &Arc<AppState>, name: &str) -> i64 {
    let (_, users) = get_json(state, "/users").await;
    users
        .as_array()
        .unwrap()
        .iter()
        .find(|user| user["name"] == name)
        .and_then(|user| user["id"].as_i64())
        .unwrap_or_else(|| panic!("seeded user {name} should exist"))
}

async fn ticket_titles(state: &Arc<AppState>, query: &str) -> Vec<String> {
    let (status, tickets) = get_json(state, &format!("/tickets{query}")).await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {tickets}");
    tickets
        .as_array()
        .unwrap()
        .iter()
        .map(|ticket| ticket["title"].as_str().unwrap().to_string())
        .collect()
}

fn timestamp(ticket: &Value, field: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(ticket[field].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn create_applies_defaults_and_stamps_timestamps() {
    let state = test_state().await;

    let (status, headers, ticket) =
        send_json(&state, "POST", "/tickets", json!({ "title": "Printer jam" })).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = ticket["id"].as_i64().unwrap();
    assert_eq!(
        headers[header::LOCATION].to_str().unwrap(),
        format!("/api/tickets/{id}")
    );
    assert_eq!(ticket["title"], "Printer jam");
    assert_eq!(ticket["status"], "Open");
    assert!(ticket["description"].is_null());
    assert!(ticket["assignedUserId"].is_null());
    assert!(ticket["assignedUser"].is_null());
    assert_eq!(ticket["createdAt"], ticket["updatedAt"]);
}

#[tokio::test]
async fn create_embeds_the_assignee() {
    let state = test_state().await;
    let carol = user_id(&state, "Carol Support").await;

    let ticket = create_ticket(
        &state,
        json!({
            "title": "Monitor flickers",
            "description": "Second screen only",
            "status": "inprogress",
            "assignedUserId": carol,
        }),
    )
    .await;

    assert_eq!(ticket["status"], "InProgress");
    assert_eq!(ticket["description"], "Second screen only");
    assert_eq!(ticket["assignedUserId"], carol);
    assert_eq!(ticket["assignedUser"]["name"], "Carol Support");
    assert_eq!(ticket["assignedUser"]["email"], "carol@example.com");
}

#[tokio::test]
async fn create_ignores_client_ids_and_inline_users() {
    let state = test_state().await;

    let ticket = create_ticket(
        &state,
        json!({
            "id": 4242,
            "title": "Badge reader offline",
            "assignedUser": { "id": 77, "name": "Mallory", "email": "mallory@example.com" },
        }),
    )
    .await;

    assert_ne!(ticket["id"], 4242);
    assert!(ticket["assignedUser"].is_null());
    let (_, users) = get_json(&state, "/users").await;
    assert_eq!(users.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn create_with_unknown_assignee_writes_nothing() {
    let state = test_state().await;

    let (status, _, body) = send_json(
        &state,
        "POST",
        "/tickets",
        json!({ "title": "Ghost ticket", "assignedUserId": 999_999 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["message"], "Assigned user does not exist");
    assert!(!ticket_titles(&state, "").await.contains(&"Ghost ticket".to_string()));
}

#[tokio::test]
async fn create_reports_field_errors() {
    let state = test_state().await;

    let (status, _, body) = send_json(
        &state,
        "POST",
        "/tickets",
        json!({ "title": "   ", "description": "x".repeat(2001) }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "One or more validation errors occurred.");
    assert_eq!(body["data"]["title"][0], "Title is required.");
    assert_eq!(
        body["data"]["description"][0],
        "Description must be at most 2000 characters."
    );

    let (status, _, body) = send_json(
        &state,
        "POST",
        "/tickets",
        json!({ "title": "a".repeat(201) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["title"][0], "Title must be at most 200 characters.");
}

#[tokio::test]
async fn create_keeps_text_exactly_as_sent() {
    let state = test_state().await;

    let (status, _, body) = send_json(
        &state,
        "POST",
        "/tickets",
        json!({ "title": format!("{}   ", "a".repeat(200)) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["title"][0], "Title must be at most 200 characters.");

    let ticket = create_ticket(
        &state,
        json!({ "title": "  Printer  ", "description": "   " }),
    )
    .await;
    assert_eq!(ticket["title"], "  Printer  ");
    assert_eq!(ticket["description"], "   ");

    let (_, stored) = get_json(&state, &format!("/tickets/{}", ticket["id"])).await;
    assert_eq!(stored["title"], "  Printer  ");
    assert_eq!(stored["description"], "   ");
}

#[tokio::test]
async fn malformed_bodies_use_the_error_envelope() {
    let state = test_state().await;

    let (status, _, body) = json_response(
        &state,
        Request::builder()
            .method("POST")
            .uri(api_path("/tickets"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _, body) =
        send_json(&state, "POST", "/tickets", json!({ "title": "T", "status": "Paused" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = get_json(&state, "/tickets/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn get_returns_ticket_or_not_found() {
    let state = test_state().await;
    let created = create_ticket(&state, json!({ "title": "Keyboard sticky" })).await;
    let id = created["id"].as_i64().unwrap();

    let (status, ticket) = get_json(&state, &format!("/tickets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket, created);

    let (status, body) = get_json(&state, "/tickets/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ticket not found");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn update_replaces_fields_and_bumps_updated_at() {
    let state = test_state().await;
    let bob = user_id(&state, "Bob Builder").await;
    let created = create_ticket(
        &state,
        json!({ "title": "Wifi drops", "description": "Floor 3", "assignedUserId": bob }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _, updated) = send_json(
        &state,
        "PUT",
        &format!("/tickets/{id}"),
        json!({ "id": id, "title": "Wifi drops on floor 3", "status": "Closed" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {updated}");
    assert_eq!(updated["title"], "Wifi drops on floor 3");
    assert_eq!(updated["status"], "Closed");
    assert!(updated["description"].is_null());
    assert!(updated["assignedUserId"].is_null());
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(timestamp(&updated, "updatedAt") > timestamp(&created, "updatedAt"));
}

#[tokio::test]
async fn update_without_status_resets_it_to_open() {
    let state = test_state().await;
    let created = create_ticket(&state, json!({ "title": "Laptop slow", "status": 2 })).await;
    assert_eq!(created["status"], "Closed");
    let id = created["id"].as_i64().unwrap();

    let (status, _, updated) = send_json(
        &state,
        "PUT",
        &format!("/tickets/{id}"),
        json!({ "id": id, "title": "Laptop slow" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Open");
}

#[tokio::test]
async fn update_rejects_mismatched_ids_without_writing() {
    let state = test_state().await;
    let created = create_ticket(&state, json!({ "title": "Phone dead" })).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _, body) = send_json(
        &state,
        "PUT",
        &format!("/tickets/{id}"),
        json!({ "id": id + 1, "title": "Changed" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ID mismatch");

    let (status, _, body) = send_json(
        &state,
        "PUT",
        &format!("/tickets/{id}"),
        json!({ "title": "Changed" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ID mismatch");

    let (_, ticket) = get_json(&state, &format!("/tickets/{id}")).await;
    assert_eq!(ticket, created);
}

#[tokio::test]
async fn update_reports_missing_ticket_and_unknown_assignee() {
    let state = test_state().await;

    let (status, _, _) = send_json(
        &state,
        "PUT",
        "/tickets/999999",
        json!({ "id": 999_999, "title": "Nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let created = create_ticket(&state, json!({ "title": "Mouse lag" })).await;
    let id = created["id"].as_i64().unwrap();
    let (status, _, body) = send_json(
        &state,
        "PUT",
        &format!("/tickets/{id}"),
        json!({ "id": id, "title": "Mouse lag", "assignedUserId": 999_999 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Assigned user does not exist");
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let state = test_state().await;
    let created = create_ticket(&state, json!({ "title": "Old ticket" })).await;
    let path = format!("/tickets/{}", created["id"]);

    let delete = |state: Arc<AppState>, path: String| async move {
        json_response(
            &state,
            Request::builder()
                .method("DELETE")
                .uri(api_path(&path))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    };

    let (status, _, body) = delete(state.clone(), path.clone()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _, body) = delete(state.clone(), path.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _) = get_json(&state, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assign_sets_and_clears_the_assignee() {
    let state = test_state().await;
    let alice = user_id(&state, "Alice Admin").await;
    let created = create_ticket(&state, json!({ "title": "Needs an owner" })).await;
    let path = format!("/tickets/{}/assign", created["id"]);

    let (status, _, assigned) =
        send_json(&state, "POST", &path, json!({ "assignedUserId": alice })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["assignedUserId"], alice);
    assert_eq!(assigned["assignedUser"]["name"], "Alice Admin");
    assert_eq!(assigned["title"], "Needs an owner");
    assert!(timestamp(&assigned, "updatedAt") > timestamp(&created, "updatedAt"));

    let (status, _, cleared) =
        send_json(&state, "POST", &path, json!({ "assignedUserId": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["assignedUserId"].is_null());
    assert!(cleared["assignedUser"].is_null());
    assert!(timestamp(&cleared, "updatedAt") > timestamp(&assigned, "updatedAt"));
}

#[tokio::test]
async fn assign_unknown_user_keeps_the_current_assignee() {
    let state = test_state().await;
    let bob = user_id(&state, "Bob Builder").await;
    let created =
        create_ticket(&state, json!({ "title": "Server room hot", "assignedUserId": bob })).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _, body) = send_json(
        &state,
        "POST",
        &format!("/tickets/{id}/assign"),
        json!({ "assignedUserId": 999_999 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Assigned user does not exist");

    let (_, ticket) = get_json(&state, &format!("/tickets/{id}")).await;
    assert_eq!(ticket["assignedUserId"], bob);
    assert_eq!(ticket["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn assign_checks_the_ticket_first() {
    let state = test_state().await;

    let (status, _, body) = send_json(
        &state,
        "POST",
        "/tickets/999999/assign",
        json!({ "assignedUserId": 999_999 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ticket not found");
}

#[tokio::test]
async fn list_filters_by_status_and_assignee() {
    let state = test_state().await;
    let alice = user_id(&state, "Alice Admin").await;
    let bob = user_id(&state, "Bob Builder").await;
    create_ticket(
        &state,
        json!({ "title": "Closed for Alice", "status": "Closed", "assignedUserId": alice }),
    )
    .await;
    create_ticket(
        &state,
        json!({ "title": "Closed for Bob", "status": "Closed", "assignedUserId": bob }),
    )
    .await;

    let closed = ticket_titles(&state, "?status=Closed").await;
    assert_eq!(closed.len(), 2);
    assert!(closed.contains(&"Closed for Alice".to_string()));
    assert!(closed.contains(&"Closed for Bob".to_string()));

    assert_eq!(ticket_titles(&state, "?status=2").await.len(), 2);
    assert_eq!(ticket_titles(&state, "?status=closed").await.len(), 2);

    let for_alice = ticket_titles(&state, &format!("?assignedUserId={alice}")).await;
    assert!(for_alice.contains(&"Cannot connect to VPN".to_string()));
    assert!(for_alice.contains(&"Closed for Alice".to_string()));
    assert!(!for_alice.contains(&"Closed for Bob".to_string()));

    assert_eq!(
        ticket_titles(&state, &format!("?status=Closed&assignedUserId={alice}")).await,
        ["Closed for Alice"]
    );
    assert_eq!(ticket_titles(&state, "?status=&assignedUserId=").await.len(), 4);
    assert!(ticket_titles(&state, "?assignedUserId=999999").await.is_empty());

    let (status, body) = get_json(&state, "/tickets?status=Paused").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn list_orders_by_most_recent_update() {
    let state = test_state().await;
    let first = create_ticket(&state, json!({ "title": "First" })).await;
    create_ticket(&state, json!({ "title": "Second" })).await;

    let titles = ticket_titles(&state, "").await;
    assert_eq!(&titles[..2], ["Second", "First"]);

    let (status, _, _) = send_json(
        &state,
        "POST",
        &format!("/tickets/{}/assign", first["id"]),
        json!({ "assignedUserId": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let titles = ticket_titles(&state, "").await;
    assert_eq!(&titles[..2], ["First", "Second"]);
}
