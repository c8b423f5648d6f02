use gym_backend::{
    api::router::create_router,
    config::Config,
    domain::models::auth::{IdentitySession, Principal, Role},
    domain::ports::{IdentityProvider, MessageSink},
    domain::services::attendance::AttendanceEngine,
    domain::services::codes::CodeGenerator,
    domain::services::lifecycle::SubscriptionLifecycle,
    domain::services::locks::MemberLocks,
    error::AppError,
    infra::repositories::{
        sqlite_attendance_repo::SqliteAttendanceRepo,
        sqlite_branch_repo::SqliteBranchRepo,
        sqlite_member_repo::SqliteMemberRepo,
        sqlite_package_repo::SqlitePackageRepo,
        sqlite_payment_repo::SqlitePaymentRepo,
        sqlite_sequence_repo::SqliteSequenceRepo,
        sqlite_subscription_repo::SqliteSubscriptionRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

/// In-memory stand-in for the external identity provider. Tokens are
/// registered up front; `sign_in` accepts the fixed password "secret"
/// for any registered email.
pub struct MockIdentityProvider {
    principals: Mutex<HashMap<String, Principal>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self { principals: Mutex::new(HashMap::new()) }
    }

    pub fn register(&self, token: &str, principal: Principal) {
        self.principals.lock().unwrap().insert(token.to_string(), principal);
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, AppError> {
        if password != "secret" {
            return Err(AppError::Unauthenticated("Invalid credentials".into()));
        }
        let principal = self.principals.lock().unwrap().values()
            .find(|p| p.email == email)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("Invalid credentials".into()))?;

        let access_token = format!("session-{}", email);
        self.register(&access_token, principal.clone());

        Ok(IdentitySession {
            access_token,
            refresh_token: "refresh-token".into(),
            principal,
        })
    }

    async fn validate(&self, bearer_token: &str) -> Result<Principal, AppError> {
        self.principals.lock().unwrap().get(bearer_token)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("Invalid or expired token".into()))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<IdentitySession, AppError> {
        Err(AppError::Unauthenticated("Could not refresh session".into()))
    }

    async fn sign_out(&self, _bearer_token: &str) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MockMessageSink {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl MessageSink for MockMessageSink {
    async fn send(&self, phone: &str, body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((phone.to_string(), body.to_string()));
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub identity: Arc<MockIdentityProvider>,
    pub messages: Arc<MockMessageSink>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let identity = Arc::new(MockIdentityProvider::new());
        identity.register("owner-token", Principal {
            id: "u-owner".into(),
            email: "owner@gym.test".into(),
            role: Role::Owner,
            branch_id: None,
            member_id: None,
        });
        identity.register("admin-token", Principal {
            id: "u-admin".into(),
            email: "admin@gym.test".into(),
            role: Role::Admin,
            branch_id: None,
            member_id: None,
        });
        identity.register("member-token", Principal {
            id: "u-member".into(),
            email: "portal@gym.test".into(),
            role: Role::Member,
            branch_id: None,
            member_id: None,
        });

        let messages = Arc::new(MockMessageSink::default());

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            identity_url: "http://localhost".into(),
            identity_api_key: "test-key".into(),
            messaging_url: "http://localhost".into(),
            messaging_token: "token".into(),
        };

        let branch_repo = Arc::new(SqliteBranchRepo::new(pool.clone()));
        let package_repo = Arc::new(SqlitePackageRepo::new(pool.clone()));
        let member_repo = Arc::new(SqliteMemberRepo::new(pool.clone()));
        let subscription_repo = Arc::new(SqliteSubscriptionRepo::new(pool.clone()));
        let attendance_repo = Arc::new(SqliteAttendanceRepo::new(pool.clone()));
        let payment_repo = Arc::new(SqlitePaymentRepo::new(pool.clone()));
        let sequence_repo = Arc::new(SqliteSequenceRepo::new(pool.clone()));

        let locks = Arc::new(MemberLocks::new());
        let codes = Arc::new(CodeGenerator::new(sequence_repo));
        let lifecycle = Arc::new(SubscriptionLifecycle::new(
            subscription_repo.clone(),
            member_repo.clone(),
            package_repo.clone(),
            locks.clone(),
        ));
        let attendance = Arc::new(AttendanceEngine::new(
            member_repo.clone(),
            attendance_repo.clone(),
            locks,
        ));

        let state = Arc::new(AppState {
            config,
            branch_repo,
            package_repo,
            member_repo,
            subscription_repo,
            attendance_repo,
            payment_repo,
            identity: identity.clone(),
            messages: messages.clone(),
            codes,
            lifecycle,
            attendance,
        });

        let router = create_router(state.clone());

        Self { router, pool, db_filename, state, identity, messages }
    }

    /// Registers a bearer token for a branch-scoped staff principal.
    pub fn register_scoped(&self, token: &str, role: Role, branch_id: &str) {
        self.identity.register(token, Principal {
            id: format!("u-{}", token),
            email: format!("{}@gym.test", token),
            role,
            branch_id: Some(branch_id.to_string()),
            member_id: None,
        });
    }

    pub async fn req(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seeds a branch through the API and returns its id.
#[allow(dead_code)]
pub async fn create_branch(app: &TestApp, name: &str) -> String {
    let res = app.req(
        "POST", "/api/v1/branches", Some("owner-token"),
        Some(serde_json::json!({ "name": name, "capacity": 100 })),
    ).await;
    assert!(res.status().is_success(), "branch creation failed: {}", res.status());
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

/// Seeds a 30-day package (2 freezes of up to 14 days) and returns its id.
#[allow(dead_code)]
pub async fn create_package(app: &TestApp, name: &str, overrides: Value) -> String {
    let mut payload = serde_json::json!({
        "name": name,
        "duration_days": 30,
        "price": 1500.0,
        "max_freezes": 2,
        "freeze_days_allowed": 14
    });
    if let Some(map) = overrides.as_object() {
        for (k, v) in map {
            payload[k] = v.clone();
        }
    }
    let res = app.req("POST", "/api/v1/packages", Some("owner-token"), Some(payload)).await;
    assert!(res.status().is_success(), "package creation failed: {}", res.status());
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

/// Registers a member with an active plan; returns the member json and
/// subscription json.
#[allow(dead_code)]
pub async fn register_member(
    app: &TestApp,
    branch_id: &str,
    package_id: Option<&str>,
    name: &str,
    phone: &str,
) -> (Value, Value) {
    let mut payload = serde_json::json!({
        "branch_id": branch_id,
        "name": name,
        "phone": phone
    });
    if let Some(package_id) = package_id {
        payload["subscription"] = serde_json::json!({ "package_id": package_id });
    }
    let res = app.req("POST", "/api/v1/members", Some("owner-token"), Some(payload)).await;
    assert!(res.status().is_success(), "member registration failed: {}", res.status());
    let body = parse_body(res).await;
    (body["member"].clone(), body["subscription"].clone())
}
