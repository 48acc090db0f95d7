use std::sync::Arc;
use std::time::Duration;

use agora_api::{AppStateInner, router};
use agora_auth::{TokenKey, TokenService};
use agora_db::{JsonMessageStore, SocialDb};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

const AUTH_REQUIRED: &str =
    "Authentication required: log in via POST /auth/login or register via POST /auth/register";

struct TestApp {
    router: Router,
    db: Arc<SocialDb>,
    _docs: tempfile::TempDir,
}

fn app() -> TestApp {
    let db = Arc::new(SocialDb::open_in_memory().unwrap());
    let docs_dir = tempfile::tempdir().unwrap();
    let docs = Arc::new(JsonMessageStore::open(docs_dir.path()).unwrap());
    let tokens = TokenService::new(&TokenKey::generate(), Duration::from_secs(3600));
    let state = AppStateInner::new(db.clone(), docs, tokens);
    TestApp {
        router: router(state),
        db,
        _docs: docs_dir,
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

async fn register(app: &TestApp, username: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "password123",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["user_id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_owned(),
    )
}

async fn create_post(app: &TestApp, owner: i64, token: &str) -> i64 {
    let (status, body) = send(
        app,
        request(
            "POST",
            &format!("/users/{owner}/posts"),
            Some(token),
            Some(json!({"title": "hello", "body": "first post"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn register_login_and_self_lookup() {
    let app = app();
    let (alice_id, token) = register(&app, "alice").await;

    let (status, body) = send(&app, request("GET", &format!("/users/{alice_id}"), Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "USER");

    for identity in ["alice", "alice@example.com"] {
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/auth/login",
                None,
                Some(json!({"identity": identity, "password": "password123"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"].as_i64().unwrap(), alice_id);
        assert!(body["token"].as_str().unwrap().len() >= 16);
    }

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"identity": "alice", "password": "wrong-password"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"identity": "nobody", "password": "password123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = app();
    register(&app, "alice").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "password123",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "username is already taken");

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "alice2",
                "email": "alice@example.com",
                "password": "password123",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email is already registered");
}

#[tokio::test]
async fn registration_validates_input() {
    let app = app();
    let cases = [
        json!({"username": "ab", "email": "a@b.c", "password": "password123"}),
        json!({"username": "alice", "email": "a@b.c", "password": "short"}),
        json!({"username": "alice", "email": "not-an-email", "password": "password123"}),
    ];
    for body in cases {
        let (status, _) = send(&app, request("POST", "/auth/register", None, Some(body))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    // Unknown fields are rejected at deserialization.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "username": "alice",
                "email": "a@b.c",
                "password": "password123",
                "role": "ADMIN",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn anonymous_and_bad_tokens_get_the_fixed_401() {
    let app = app();
    let (alice_id, token) = register(&app, "alice").await;
    let uri = format!("/users/{alice_id}");

    let (status, body) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], AUTH_REQUIRED);

    // Too short for a signed token.
    let (status, body) = send(&app, request("GET", &uri, Some("abc"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], AUTH_REQUIRED);

    // Valid shape, broken signature.
    let tampered = format!("{token}x");
    let (status, body) = send(&app, request("GET", &uri, Some(&tampered), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], AUTH_REQUIRED);

    // Wrong scheme is ignored entirely.
    let req = Request::builder()
        .method("GET")
        .uri(&uri)
        .header(header::AUTHORIZATION, format!("Basic {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_crud_round_trip() {
    let app = app();
    let (alice_id, token) = register(&app, "alice").await;
    let post_id = create_post(&app, alice_id, &token).await;

    let (status, body) = send(
        &app,
        request("GET", &format!("/users/{alice_id}/posts"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["owner_id"].as_i64().unwrap(), alice_id);

    let uri = format!("/users/{alice_id}/posts/{post_id}");
    let (status, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "hello");

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({"title": "edited", "body": "new body"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "edited");

    let (status, _) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Gone means the ownership hop fails, and a plain user sees the denial.
    let (status, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");
}

#[tokio::test]
async fn posts_are_guarded_by_the_path_claim() {
    let app = app();
    let (alice_id, alice) = register(&app, "alice").await;
    let (bob_id, bob) = register(&app, "bob").await;
    let post_id = create_post(&app, alice_id, &alice).await;

    // A consistent path admits any signed-in caller.
    let (status, _) = send(
        &app,
        request("GET", &format!("/users/{alice_id}/posts/{post_id}"), Some(&bob), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The same post addressed under the wrong owner is denied.
    let (status, body) = send(
        &app,
        request("GET", &format!("/users/{bob_id}/posts/{post_id}"), Some(&bob), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");

    // Creating under someone else's scope is bound to the caller.
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/users/{alice_id}/posts"),
            Some(&bob),
            Some(json!({"title": "intruder", "body": "nope"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admins may act in any scope.
    let (_, carol) = register(&app, "carol").await;
    app.db.promote_admin("carol").unwrap();
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/users/{alice_id}/posts"),
            Some(&carol),
            Some(json!({"title": "notice", "body": "from the admin"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn comments_bind_the_author_for_mutation() {
    let app = app();
    let (alice_id, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let post_id = create_post(&app, alice_id, &alice).await;
    let base = format!("/users/{alice_id}/posts/{post_id}/comments");

    let (status, body) = send(
        &app,
        request("POST", &base, Some(&bob), Some(json!({"body": "nice post"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, request("GET", &base, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let uri = format!("{base}/{comment_id}");
    let (status, _) = send(&app, request("GET", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);

    // The post owner did not write it, so she may not change it.
    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(&alice), Some(json!({"body": "rewritten"}))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request("PUT", &uri, Some(&bob), Some(json!({"body": "edited"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"], "edited");

    let (_, carol) = register(&app, "carol").await;
    app.db.promote_admin("carol").unwrap();
    let (status, _) = send(&app, request("DELETE", &uri, Some(&carol), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn likes_are_one_per_user() {
    let app = app();
    let (alice_id, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let post_id = create_post(&app, alice_id, &alice).await;
    let base = format!("/users/{alice_id}/posts/{post_id}/likes");

    let (status, body) = send(&app, request("POST", &base, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::CREATED);
    let bob_like = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, request("POST", &base, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "post is already liked");

    let (status, _) = send(&app, request("POST", &base, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, request("GET", &base, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Only the user who placed a like may remove it.
    let uri = format!("{base}/{bob_like}");
    let (status, _) = send(&app, request("DELETE", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, request("DELETE", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn photo_delete_requires_the_owner_username() {
    let app = app();
    let (alice_id, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let post_id = create_post(&app, alice_id, &alice).await;
    let base = format!("/users/{alice_id}/posts/{post_id}/photos");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &base,
            Some(&alice),
            Some(json!({"file_name": "sunset.jpg", "caption": "golden hour"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let photo_id = body["id"].as_i64().unwrap();
    let uri = format!("{base}/{photo_id}");

    let (status, body) = send(&app, request("GET", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["file_name"], "sunset.jpg");

    let (status, _) = send(&app, request("DELETE", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, request("DELETE", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn messenger_round_trip() {
    let app = app();
    let (alice_id, alice) = register(&app, "alice").await;
    let (bob_id, bob) = register(&app, "bob").await;
    let base = format!("/users/{alice_id}/messengers");

    let (status, body) = send(
        &app,
        request("POST", &base, Some(&alice), Some(json!({"recipient": "bob"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner_id"].as_i64().unwrap(), alice_id);
    assert_eq!(body["recipient_id"].as_i64().unwrap(), bob_id);
    let alice_side = body["id"].as_i64().unwrap();

    // Each participant sees exactly one side-record, mirrored.
    let (status, body) = send(&app, request("GET", &base, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (status, body) = send(
        &app,
        request("GET", &format!("/users/{bob_id}/messengers"), Some(&bob), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let mirror = &body[0];
    assert_eq!(mirror["owner_id"].as_i64().unwrap(), bob_id);
    assert_eq!(mirror["recipient_id"].as_i64().unwrap(), alice_id);
    assert_ne!(mirror["id"].as_i64().unwrap(), alice_side);
    let bob_side = mirror["id"].as_i64().unwrap();

    // Messengers are personal: neither the other participant nor an admin
    // may list someone else's.
    let (status, _) = send(&app, request("GET", &base, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, carol) = register(&app, "carol").await;
    app.db.promote_admin("carol").unwrap();
    let (status, _) = send(&app, request("GET", &base, Some(&carol), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Messages land on the sending side only.
    let messages = format!("{base}/{alice_side}/messages");
    let (status, body) = send(
        &app,
        request("POST", &messages, Some(&alice), Some(json!({"text": "hello"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let message_id = body["id"].as_str().unwrap().to_owned();
    assert_eq!(body["conversation_id"].as_i64().unwrap(), alice_side);

    let (status, body) = send(&app, request("GET", &messages, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/users/{bob_id}/messengers/{bob_side}/messages"),
            Some(&bob),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, body) = send(&app, request("GET", &format!("{messages}/last"), Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "hello");
    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/users/{bob_id}/messengers/{bob_side}/messages/last"),
            Some(&bob),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["text"].is_null());

    let (status, body) = send(
        &app,
        request("GET", &format!("{messages}/{message_id}"), Some(&alice), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "hello");
    let (status, _) = send(
        &app,
        request("GET", &format!("{messages}/no-such-id"), Some(&alice), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Blank text is invalid.
    let (status, _) = send(
        &app,
        request("POST", &messages, Some(&alice), Some(json!({"text": "   "}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Starting the same pair again trips the uniqueness of the first side.
    let (status, _) = send(
        &app,
        request("POST", &base, Some(&alice), Some(json!({"recipient": bob_id}))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        request("POST", &base, Some(&alice), Some(json!({"recipient": "alice"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        request("POST", &base, Some(&alice), Some(json!({"recipient": "nobody"}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_one_side_keeps_the_mirror() {
    let app = app();
    let (alice_id, alice) = register(&app, "alice").await;
    let (bob_id, bob) = register(&app, "bob").await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/users/{alice_id}/messengers"),
            Some(&alice),
            Some(json!({"recipient": bob_id})),
        ),
    )
    .await;
    let alice_side = body["id"].as_i64().unwrap();
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/users/{alice_id}/messengers/{alice_side}/messages"),
            Some(&alice),
            Some(json!({"text": "are you there?"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/users/{alice_id}/messengers/{alice_side}"),
            Some(&alice),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        request("GET", &format!("/users/{alice_id}/messengers"), Some(&alice), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    // Her old messages are unreachable now that the side-record is gone.
    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/users/{alice_id}/messengers/{alice_side}/messages"),
            Some(&alice),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob's side survives and still works.
    let (status, body) = send(
        &app,
        request("GET", &format!("/users/{bob_id}/messengers"), Some(&bob), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bob_side = body[0]["id"].as_i64().unwrap();
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/users/{bob_id}/messengers/{bob_side}/messages"),
            Some(&bob),
            Some(json!({"text": "still here"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn user_updates_enforce_the_body_echo() {
    let app = app();
    let (_, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/users/username/alice",
            Some(&alice),
            Some(json!({"username": "alice", "email": "new-alice@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "new-alice@example.com");

    // Body asserting a different identity than the path is refused.
    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/users/username/alice",
            Some(&alice),
            Some(json!({"username": "bob", "email": "x@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // So is touching someone else's name, even with a clean echo.
    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/users/username/alice",
            Some(&bob),
            Some(json!({"username": "alice", "email": "x@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/users/email/new-alice@example.com",
            Some(&alice),
            Some(json!({"email": "new-alice@example.com", "username": "alicia"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alicia");
}

#[tokio::test]
async fn self_service_update_and_delete() {
    let app = app();
    let (alice_id, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let uri = format!("/users/{alice_id}");

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &uri,
            Some(&alice),
            Some(json!({"username": "bob", "email": "alice@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &uri,
            Some(&alice),
            Some(json!({"username": "alice", "email": "fresh@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "fresh@example.com");

    let (status, _) = send(&app, request("GET", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, request("DELETE", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The account is gone, so the still-valid token no longer resolves.
    let (status, body) = send(&app, request("GET", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], AUTH_REQUIRED);
}

#[tokio::test]
async fn admins_see_not_found_where_users_see_denied() {
    let app = app();
    let (alice_id, alice) = register(&app, "alice").await;
    let (_, bob) = register(&app, "bob").await;
    let (_, carol) = register(&app, "carol").await;
    app.db.promote_admin("carol").unwrap();
    let post_id = create_post(&app, alice_id, &alice).await;

    let missing_post = format!("/users/{alice_id}/posts/9999");
    let (status, _) = send(&app, request("GET", &missing_post, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, request("GET", &missing_post, Some(&carol), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "post not found");

    let missing_comment = format!("/users/{alice_id}/posts/{post_id}/comments/9999");
    let (status, _) = send(&app, request("GET", &missing_comment, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, request("GET", &missing_comment, Some(&carol), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "comment not found");
}
