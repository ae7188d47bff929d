//! Router-level tests for the auth crate
//!
//! Every test runs against in-memory stores and a manual clock.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use kernel::clock::{Clock, ManualClock};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::domain::entity::{
    session::Session,
    user::{NewUser, UserProfile},
};
use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::infra::memory::{InMemorySessionRegistry, InMemoryUserRepository};
use crate::presentation::{AuthAppState, auth_router, users_router};

type TestState = AuthAppState<InMemoryUserRepository, InMemorySessionRegistry>;

struct TestApp {
    router: Router,
    state: TestState,
    clock: Arc<ManualClock>,
}

fn test_app() -> TestApp {
    let clock = Arc::new(ManualClock::default());
    let state = AuthAppState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemorySessionRegistry::new()),
        clock.clone(),
        AuthConfig::new("test-secret"),
    );
    let router = Router::new()
        .nest("/auth", auth_router(state.clone()))
        .nest("/users", users_router(state.clone()));

    TestApp {
        router,
        state,
        clock,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({"username": username, "email": email, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await
    }

    /// Insert an admin directly and log in as it
    async fn admin_token(&self) -> String {
        let password = UserPassword::hash(RawPassword::new("admin-pass".into()).unwrap(), None)
            .await
            .unwrap();
        self.state
            .users
            .create(&NewUser {
                user_name: UserName::new("admin").unwrap(),
                email: Email::new("admin@example.com").unwrap(),
                password,
                user_role: UserRole::Admin,
                profile: UserProfile::default(),
            })
            .await
            .unwrap();

        let (status, body) = self.login("admin@example.com", "admin-pass").await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

mod auth_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_issues_token_bound_to_live_session() {
        let app = test_app();
        let token = app.register("ana", "ana@example.com", "s3cret").await;

        let claims = app.state.tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id, UserId::new(1));
        assert_eq!(claims.eat - claims.iat, 600);

        let session = app.state.sessions.find(claims.session).await.unwrap().unwrap();
        assert_eq!(session.user_id, claims.user_id);
        assert_eq!(session.expires_at.timestamp(), claims.eat);
    }

    #[tokio::test]
    async fn test_register_incomplete_fields() {
        let app = test_app();
        let (status, body) = app
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({"username": "ana", "email": "ana@example.com"})),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Incomplete fields"}));
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let app = test_app();
        let (status, body) = app
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({"username": "ana", "email": "not-an-email", "password": "pw"})),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid email format"}));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts_regardless_of_username() {
        let app = test_app();
        app.register("ana", "ana@example.com", "pw").await;

        let (status, body) = app
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({"username": "someone-else", "email": "ANA@example.com", "password": "pw"})),
            )
            .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"error": "Email already exists"}));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflicts() {
        let app = test_app();
        app.register("ana", "ana@example.com", "pw").await;

        let (status, body) = app
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({"username": "ana", "email": "other@example.com", "password": "pw"})),
            )
            .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"error": "Username already exists"}));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "Invalid request body"}));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let app = test_app();
        app.register("ana", "ana@example.com", "right").await;

        let (status, body) = app.login("ana@example.com", "right").await;
        assert_eq!(status, StatusCode::OK);
        assert!(app.state.tokens.verify(body["token"].as_str().unwrap()).is_ok());

        let wrong_password = app.login("ana@example.com", "wrong").await;
        let unknown_email = app.login("nobody@example.com", "right").await;

        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password.1, json!({"error": "Invalid credentials"}));
    }

    #[tokio::test]
    async fn test_login_creates_distinct_sessions() {
        let app = test_app();
        let first = app.register("ana", "ana@example.com", "pw").await;
        let (_, body) = app.login("ana@example.com", "pw").await;
        let second = body["token"].as_str().unwrap();

        let a = app.state.tokens.verify(&first).unwrap();
        let b = app.state.tokens.verify(second).unwrap();
        assert_ne!(a.session, b.session);
        assert_eq!(app.state.sessions.len().await, 2);
    }

    #[tokio::test]
    async fn test_logout_once_then_unauthorized() {
        let app = test_app();
        let token = app.register("ana", "ana@example.com", "pw").await;

        let (status, body) = app.send("DELETE", "/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Successfully logged out"}));

        let (status, body) = app.send("DELETE", "/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "You don't have permission"}));

        let (status, _) = app.send("GET", "/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_token() {
        let app = test_app();
        let (status, body) = app.send("DELETE", "/auth/logout", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "invalid token"}));
    }

    #[tokio::test]
    async fn test_logout_accepts_expired_token() {
        let app = test_app();
        let token = app.register("ana", "ana@example.com", "pw").await;
        app.clock.advance(Duration::minutes(30));

        let (status, _) = app.send("DELETE", "/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(app.state.sessions.is_empty().await);
    }
}

mod guard_tests {
    use super::*;

    #[tokio::test]
    async fn test_session_usable_until_exactly_ten_minutes() {
        let app = test_app();
        let token = app.register("ana", "ana@example.com", "pw").await;

        app.clock.advance(Duration::minutes(10));
        let (status, body) = app.send("GET", "/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ana@example.com");

        app.clock.advance(Duration::seconds(1));
        let (status, body) = app.send("GET", "/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "token expired"}));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_even_if_token_is_not() {
        let app = test_app();
        let token = app.register("ana", "ana@example.com", "pw").await;
        let claims = app.state.tokens.verify(&token).unwrap();

        // Token still valid for ten minutes, session already past its expiry.
        app.state.sessions.delete(claims.session).await.unwrap();
        let now = chrono::Utc::now();
        let short = app
            .state
            .sessions
            .create(claims.user_id, now - Duration::minutes(20), now - Duration::minutes(10))
            .await
            .unwrap();
        let forged = app
            .state
            .tokens
            .issue(&Session {
                expires_at: app.clock.now() + Duration::minutes(10),
                ..short.clone()
            })
            .unwrap();

        let (status, _) = app.send("GET", "/users/me", Some(&forged), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(app.state.sessions.find(short.session_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_authorization() {
        let app = test_app();

        let (status, body) = app.send("GET", "/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "invalid token"}));

        let (status, _) = app.send("GET", "/users", Some("a.b.c"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_tampered_signature_is_rejected() {
        let app = test_app();
        let token = app.register("ana", "ana@example.com", "pw").await;

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        let i = sig_start + 5;
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let (status, body) = app.send("GET", "/users/me", Some(&tampered), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "invalid token"}));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_produce_distinct_live_sessions() {
        let app = Arc::new(test_app());
        let n = 8;

        let handles: Vec<_> = (0..n)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    app.register(&format!("user{i}"), &format!("user{i}@example.com"), "pw")
                        .await
                })
            })
            .collect();

        let mut sessions = std::collections::HashSet::new();
        for handle in handles {
            let token = handle.await.unwrap();
            let claims = app.state.tokens.verify(&token).unwrap();
            assert!(app.state.sessions.find(claims.session).await.unwrap().is_some());
            sessions.insert(claims.session);
        }

        assert_eq!(sessions.len(), n);
        assert_eq!(app.state.sessions.len().await, n);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_for_one_user_produce_distinct_sessions() {
        let app = Arc::new(test_app());
        app.register("ana", "ana@example.com", "pw").await;
        let n = 32;

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { app.login("ana@example.com", "pw").await })
            })
            .collect();

        let mut sessions = std::collections::HashSet::new();
        for handle in handles {
            let (status, body) = handle.await.unwrap();
            assert_eq!(status, StatusCode::OK, "login failed: {body}");
            let claims = app.state.tokens.verify(body["token"].as_str().unwrap()).unwrap();
            assert!(app.state.sessions.find(claims.session).await.unwrap().is_some());
            sessions.insert(claims.session);
        }

        assert_eq!(sessions.len(), n);
        // One session from registration plus one per login.
        assert_eq!(app.state.sessions.len().await, n + 1);
    }
}

mod users_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_and_get_users_hide_password() {
        let app = test_app();
        let token = app.register("ana", "ana@example.com", "pw").await;
        app.register("ben", "ben@example.com", "pw").await;

        let (status, body) = app.send("GET", "/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.get("password").is_none()));
        assert!(users.iter().all(|u| u.get("password_hash").is_none()));

        let (status, body) = app.send("GET", "/users/2", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "ben");
        assert_eq!(body["role"], "user");

        let (status, _) = app.send("GET", "/users/99", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send("GET", "/users/abc", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_user_requires_admin() {
        let app = test_app();
        let user_token = app.register("ana", "ana@example.com", "pw").await;
        let new_user = json!({
            "username": "carla",
            "email": "carla@example.com",
            "password": "pw",
            "role": "user",
            "secondary_role": "bass"
        });

        let (status, body) = app
            .send("POST", "/users", Some(&user_token), Some(new_user.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"error": "You don't have permission"}));

        let admin = app.admin_token().await;
        let (status, body) = app.send("POST", "/users", Some(&admin), Some(new_user)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "carla");
        assert_eq!(body["secondary_role"], "bass");

        let (status, _) = app.login("carla@example.com", "pw").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let app = test_app();
        let admin = app.admin_token().await;

        let (status, _) = app
            .send(
                "POST",
                "/users",
                Some(&admin),
                Some(json!({"username": "x", "email": "x@example.com", "password": "pw"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(
                "POST",
                "/users",
                Some(&admin),
                Some(json!({"username": "x", "email": "x@example.com", "password": "pw", "role": "owner"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(
                "POST",
                "/users",
                Some(&admin),
                Some(json!({"username": "admin2", "email": "admin@example.com", "password": "pw", "role": "user"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_self_and_role_restrictions() {
        let app = test_app();
        let ana = app.register("ana", "ana@example.com", "pw").await;
        app.register("ben", "ben@example.com", "pw").await;

        let (status, body) = app
            .send(
                "PUT",
                "/users/1",
                Some(&ana),
                Some(json!({"lastname": "Lopez", "celphone": "", "password": "new-pw"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["user"]["lastname"], "Lopez");
        assert_eq!(body["user"]["celphone"], Value::Null);

        let (status, _) = app.login("ana@example.com", "new-pw").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .send("PUT", "/users/2", Some(&ana), Some(json!({"lastname": "X"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .send("PUT", "/users/1", Some(&ana), Some(json!({"role": "admin"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = app.admin_token().await;
        let (status, body) = app
            .send(
                "PUT",
                "/users/1",
                Some(&admin),
                Some(json!({"role": "admin", "secondary_role": "drums"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "admin");
        assert_eq!(body["user"]["secondary_role"], "drums");
    }

    #[tokio::test]
    async fn test_delete_user_revokes_access() {
        let app = test_app();
        let ana = app.register("ana", "ana@example.com", "pw").await;
        let admin = app.admin_token().await;

        let (status, _) = app.send("DELETE", "/users/1", Some(&ana), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.send("DELETE", "/users/1", Some(&admin), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = app.send("GET", "/users/me", Some(&ana), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.send("DELETE", "/users/1", Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
