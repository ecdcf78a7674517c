//! End-to-end tests of the GraphQL request pipeline over the in-memory
//! stores: every request goes through the real router, cookie layer, and
//! authentication context.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use spendwise::app;
use spendwise::config::Config;
use spendwise::models::session::Session;
use spendwise::repositories::memory::{
    MemorySessionStore, MemoryTransactionStore, MemoryUserStore,
};
use spendwise::repositories::session::SessionStore;
use spendwise::state::AppState;

struct TestContext {
    app: Router,
    users: Arc<MemoryUserStore>,
    sessions: Arc<MemorySessionStore>,
}

impl TestContext {
    fn new() -> Self {
        let users = Arc::new(MemoryUserStore::default());
        let sessions = Arc::new(MemorySessionStore::default());
        let transactions = Arc::new(MemoryTransactionStore::default());

        let config = Config {
            database_url: String::new(),
            redis_url: String::new(),
            session_duration_days: 7,
            cors_origin: "http://localhost:5001".to_string(),
            port: 0,
        };

        let state = AppState::from_parts(
            users.clone(),
            sessions.clone(),
            transactions,
            config,
        );

        Self {
            app: app(state),
            users,
            sessions,
        }
    }

    /// Posts a GraphQL query, optionally with a session cookie, returning
    /// the response JSON and any `Set-Cookie` header.
    async fn graphql(&self, query: &str, cookie: Option<&str>) -> (Value, Option<String>) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie.to_string());
        }
        let request = builder
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (serde_json::from_slice(&bytes).unwrap(), set_cookie)
    }
}

/// The `session_id=<uuid>` pair from a `Set-Cookie` header, ready to send
/// back in a `Cookie` header.
fn session_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .expect("Set-Cookie must carry a cookie pair")
        .to_string()
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"].as_str().unwrap()
}

async fn sign_up(
    ctx: &TestContext,
    username: &str,
    name: &str,
    password: &str,
    gender: &str,
) -> (Value, Option<String>) {
    let query = format!(
        r#"mutation {{
            signUp(input: {{ username: "{username}", name: "{name}", password: "{password}", gender: {gender} }}) {{
                id username name gender profilePicture
            }}
        }}"#
    );
    ctx.graphql(&query, None).await
}

#[tokio::test]
async fn sign_up_hides_password_and_establishes_session() {
    let ctx = TestContext::new();

    let (body, set_cookie) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let user = &body["data"]["signUp"];
    assert_eq!(user["username"], "alice");
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["gender"], "female");
    assert_eq!(
        user["profilePicture"],
        "https://avatar.iran.liara.run/public/girl?username=alice"
    );
    assert!(user.get("password").is_none());

    let cookie = session_pair(&set_cookie.expect("sign-up must set the session cookie"));
    assert!(cookie.starts_with("session_id="));

    // The session cookie authenticates subsequent requests.
    let (body, _) = ctx.graphql("{ authUser { id username } }", Some(&cookie)).await;
    assert_eq!(body["data"]["authUser"]["username"], "alice");
    assert_eq!(body["data"]["authUser"]["id"], user["id"]);
}

#[tokio::test]
async fn duplicate_sign_up_is_rejected_and_stores_one_record() {
    let ctx = TestContext::new();

    sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let (body, _) = sign_up(&ctx, "alice", "Imposter", "other-pass", "other").await;

    assert_eq!(body["errors"][0]["message"], "User already exists");
    assert_eq!(error_code(&body), "DUPLICATE_USER");
    assert_eq!(ctx.users.count().await, 1);
}

#[tokio::test]
async fn blank_sign_up_fields_fail_validation() {
    let ctx = TestContext::new();

    let (body, set_cookie) = sign_up(&ctx, "alice", "", "secret123", "female").await;
    assert_eq!(body["errors"][0]["message"], "All fields are required");
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    assert!(set_cookie.is_none());
    assert_eq!(ctx.users.count().await, 0);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    sign_up(&ctx, "alice", "Alice", "secret123", "female").await;

    let (wrong_password, _) = ctx
        .graphql(
            r#"mutation { login(input: { username: "alice", password: "wrong" }) { id } }"#,
            None,
        )
        .await;
    let (unknown_user, _) = ctx
        .graphql(
            r#"mutation { login(input: { username: "mallory", password: "secret123" }) { id } }"#,
            None,
        )
        .await;

    assert_eq!(
        wrong_password["errors"][0]["message"],
        "Invalid username or password"
    );
    assert_eq!(
        wrong_password["errors"][0]["message"],
        unknown_user["errors"][0]["message"]
    );
    assert_eq!(error_code(&wrong_password), "INVALID_CREDENTIALS");
    assert_eq!(error_code(&unknown_user), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_with_correct_credentials_returns_the_signed_up_user() {
    let ctx = TestContext::new();
    let (signed_up, _) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;

    let (body, set_cookie) = ctx
        .graphql(
            r#"mutation { login(input: { username: "alice", password: "secret123" }) { id username } }"#,
            None,
        )
        .await;

    assert_eq!(body["data"]["login"]["id"], signed_up["data"]["signUp"]["id"]);
    let cookie = session_pair(&set_cookie.expect("login must set the session cookie"));

    let (body, _) = ctx.graphql("{ authUser { username } }", Some(&cookie)).await;
    assert_eq!(body["data"]["authUser"]["username"], "alice");
}

#[tokio::test]
async fn logout_destroys_the_session_and_clears_the_cookie() {
    let ctx = TestContext::new();
    let (_, set_cookie) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let cookie = session_pair(&set_cookie.unwrap());
    assert_eq!(ctx.sessions.count().await, 1);

    let (body, clear_cookie) = ctx
        .graphql("mutation { logout { message } }", Some(&cookie))
        .await;
    assert_eq!(body["data"]["logout"]["message"], "Logged Out Successfully");
    assert!(
        clear_cookie
            .expect("logout must clear the session cookie")
            .starts_with("session_id=")
    );
    assert_eq!(ctx.sessions.count().await, 0);

    // Replaying the old cookie is anonymous, not an error.
    let (body, _) = ctx.graphql("{ authUser { id } }", Some(&cookie)).await;
    assert_eq!(body["data"]["authUser"], Value::Null);
}

#[tokio::test]
async fn user_query_is_ungated_and_null_for_unknown_ids() {
    let ctx = TestContext::new();
    let (signed_up, _) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let id = signed_up["data"]["signUp"]["id"].as_str().unwrap();

    // Anonymous caller reads the public profile.
    let query = format!(r#"{{ user(userId: "{id}") {{ username profilePicture }} }}"#);
    let (body, _) = ctx.graphql(&query, None).await;
    assert_eq!(body["data"]["user"]["username"], "alice");

    let unknown = format!(r#"{{ user(userId: "{}") {{ username }} }}"#, Uuid::new_v4());
    let (body, _) = ctx.graphql(&unknown, None).await;
    assert_eq!(body["data"]["user"], Value::Null);

    let (body, _) = ctx
        .graphql(r#"{ user(userId: "not-a-uuid") { username } }"#, None)
        .await;
    assert_eq!(body["data"]["user"], Value::Null);
}

#[tokio::test]
async fn expired_session_is_anonymous_and_dropped() {
    let ctx = TestContext::new();
    let (signed_up, _) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let user_id: Uuid = signed_up["data"]["signUp"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let session_id = Uuid::new_v4();
    let mut session = Session::new(user_id, 7);
    session.expires_at = chrono::Utc::now() - chrono::Duration::days(1);
    ctx.sessions.insert(session_id, &session, 60).await.unwrap();

    let cookie = format!("session_id={}", session_id);
    let (body, _) = ctx.graphql("{ authUser { id } }", Some(&cookie)).await;
    assert_eq!(body["data"]["authUser"], Value::Null);

    // The stale record was dropped on sight.
    assert!(ctx.sessions.load(session_id).await.unwrap().is_none());
}

#[tokio::test]
async fn transactions_require_authentication() {
    let ctx = TestContext::new();
    let (body, _) = ctx.graphql("{ transactions { id } }", None).await;
    assert_eq!(body["errors"][0]["message"], "Unauthorized");
    assert_eq!(error_code(&body), "UNAUTHENTICATED");
}

async fn create_transaction(
    ctx: &TestContext,
    cookie: &str,
    description: &str,
    category: &str,
    amount: f64,
) -> Value {
    let query = format!(
        r#"mutation {{
            createTransaction(input: {{
                description: "{description}", paymentType: card, category: {category},
                amount: {amount}, date: "2026-08-01"
            }}) {{ id description category amount }}
        }}"#
    );
    let (body, _) = ctx.graphql(&query, Some(cookie)).await;
    body
}

#[tokio::test]
async fn transaction_crud_is_scoped_to_the_owner() {
    let ctx = TestContext::new();
    let (_, alice_cookie) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let alice = session_pair(&alice_cookie.unwrap());
    let (_, bob_cookie) = sign_up(&ctx, "bob", "Bob", "hunter2-xyz", "male").await;
    let bob = session_pair(&bob_cookie.unwrap());

    let lunch = create_transaction(&ctx, &alice, "lunch", "expense", 12.5).await;
    let lunch_id = lunch["data"]["createTransaction"]["id"].as_str().unwrap().to_string();
    create_transaction(&ctx, &alice, "deposit", "saving", 100.0).await;
    create_transaction(&ctx, &bob, "concert", "expense", 60.0).await;

    let (body, _) = ctx
        .graphql("{ transactions { id description } }", Some(&alice))
        .await;
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 2);

    let (body, _) = ctx
        .graphql("{ transactions { id description } }", Some(&bob))
        .await;
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["transactions"][0]["description"], "concert");

    // Bob cannot delete (or even observe) Alice's transaction.
    let delete = format!(r#"mutation {{ deleteTransaction(transactionId: "{lunch_id}") {{ id }} }}"#);
    let (body, _) = ctx.graphql(&delete, Some(&bob)).await;
    assert_eq!(error_code(&body), "NOT_FOUND");

    let lookup = format!(r#"{{ transaction(transactionId: "{lunch_id}") {{ id }} }}"#);
    let (body, _) = ctx.graphql(&lookup, Some(&bob)).await;
    assert_eq!(body["data"]["transaction"], Value::Null);

    // Alice still owns it and can edit it.
    let update = format!(
        r#"mutation {{ updateTransaction(input: {{ transactionId: "{lunch_id}", amount: 15.0 }}) {{ id amount }} }}"#
    );
    let (body, _) = ctx.graphql(&update, Some(&alice)).await;
    assert_eq!(body["data"]["updateTransaction"]["amount"], 15.0);

    let (body, _) = ctx.graphql(&delete, Some(&alice)).await;
    assert_eq!(body["data"]["deleteTransaction"]["id"], lunch_id.as_str());
}

#[tokio::test]
async fn category_statistics_sum_the_callers_transactions() {
    let ctx = TestContext::new();
    let (_, cookie) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let alice = session_pair(&cookie.unwrap());

    create_transaction(&ctx, &alice, "lunch", "expense", 12.5).await;
    create_transaction(&ctx, &alice, "dinner", "expense", 20.0).await;
    create_transaction(&ctx, &alice, "deposit", "saving", 100.0).await;

    let (body, _) = ctx
        .graphql("{ categoryStatistics { category totalAmount } }", Some(&alice))
        .await;
    let stats = body["data"]["categoryStatistics"].as_array().unwrap();
    assert_eq!(stats.len(), 2);

    let total_for = |category: &str| {
        stats
            .iter()
            .find(|s| s["category"] == category)
            .map(|s| s["totalAmount"].as_f64().unwrap())
            .unwrap()
    };
    assert_eq!(total_for("expense"), 32.5);
    assert_eq!(total_for("saving"), 100.0);
}

#[tokio::test]
async fn user_transactions_relation_resolves() {
    let ctx = TestContext::new();
    let (signed_up, cookie) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let alice = session_pair(&cookie.unwrap());
    let id = signed_up["data"]["signUp"]["id"].as_str().unwrap();

    create_transaction(&ctx, &alice, "lunch", "expense", 12.5).await;

    let query = format!(
        r#"{{ user(userId: "{id}") {{ username transactions {{ description user {{ username }} }} }} }}"#
    );
    let (body, _) = ctx.graphql(&query, Some(&alice)).await;
    let user = &body["data"]["user"];
    assert_eq!(user["transactions"][0]["description"], "lunch");
    assert_eq!(user["transactions"][0]["user"]["username"], "alice");
}

/// Full account lifecycle: sign up alice, fail a login with the wrong
/// password, then log in correctly and get the same account back.
#[tokio::test]
async fn alice_end_to_end() {
    let ctx = TestContext::new();

    let (signed_up, _) = sign_up(&ctx, "alice", "Alice", "secret123", "female").await;
    let user = &signed_up["data"]["signUp"];
    assert_eq!(
        user["profilePicture"],
        "https://avatar.iran.liara.run/public/girl?username=alice"
    );
    assert!(user.get("password").is_none());

    let (body, _) = ctx
        .graphql(
            r#"mutation { login(input: { username: "alice", password: "wrong" }) { id } }"#,
            None,
        )
        .await;
    assert_eq!(body["errors"][0]["message"], "Invalid username or password");

    let (body, _) = ctx
        .graphql(
            r#"mutation { login(input: { username: "alice", password: "secret123" }) { id } }"#,
            None,
        )
        .await;
    assert_eq!(body["data"]["login"]["id"], user["id"]);
}
