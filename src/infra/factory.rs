use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::attendance::AttendanceEngine;
use crate::domain::services::codes::CodeGenerator;
use crate::domain::services::lifecycle::SubscriptionLifecycle;
use crate::domain::services::locks::MemberLocks;
use crate::infra::identity::http_identity_provider::HttpIdentityProvider;
use crate::infra::messaging::http_message_sink::HttpMessageSink;
use crate::infra::repositories::{
    postgres_attendance_repo::PostgresAttendanceRepo, postgres_branch_repo::PostgresBranchRepo,
    postgres_member_repo::PostgresMemberRepo, postgres_package_repo::PostgresPackageRepo,
    postgres_payment_repo::PostgresPaymentRepo, postgres_sequence_repo::PostgresSequenceRepo,
    postgres_subscription_repo::PostgresSubscriptionRepo,
    sqlite_attendance_repo::SqliteAttendanceRepo, sqlite_branch_repo::SqliteBranchRepo,
    sqlite_member_repo::SqliteMemberRepo, sqlite_package_repo::SqlitePackageRepo,
    sqlite_payment_repo::SqlitePaymentRepo, sqlite_sequence_repo::SqliteSequenceRepo,
    sqlite_subscription_repo::SqliteSubscriptionRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let identity = Arc::new(HttpIdentityProvider::new(
        config.identity_url.clone(),
        config.identity_api_key.clone(),
    ));
    let messages = Arc::new(HttpMessageSink::new(
        config.messaging_url.clone(),
        config.messaging_token.clone(),
    ));
    let locks = Arc::new(MemberLocks::new());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let branch_repo = Arc::new(PostgresBranchRepo::new(pool.clone()));
        let package_repo = Arc::new(PostgresPackageRepo::new(pool.clone()));
        let member_repo = Arc::new(PostgresMemberRepo::new(pool.clone()));
        let subscription_repo = Arc::new(PostgresSubscriptionRepo::new(pool.clone()));
        let attendance_repo = Arc::new(PostgresAttendanceRepo::new(pool.clone()));
        let payment_repo = Arc::new(PostgresPaymentRepo::new(pool.clone()));
        let sequence_repo = Arc::new(PostgresSequenceRepo::new(pool.clone()));

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

        AppState {
            config: config.clone(),
            branch_repo,
            package_repo,
            member_repo,
            subscription_repo,
            attendance_repo,
            payment_repo,
            identity,
            messages,
            codes,
            lifecycle,
            attendance,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let branch_repo = Arc::new(SqliteBranchRepo::new(pool.clone()));
        let package_repo = Arc::new(SqlitePackageRepo::new(pool.clone()));
        let member_repo = Arc::new(SqliteMemberRepo::new(pool.clone()));
        let subscription_repo = Arc::new(SqliteSubscriptionRepo::new(pool.clone()));
        let attendance_repo = Arc::new(SqliteAttendanceRepo::new(pool.clone()));
        let payment_repo = Arc::new(SqlitePaymentRepo::new(pool.clone()));
        let sequence_repo = Arc::new(SqliteSequenceRepo::new(pool.clone()));

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

        AppState {
            config: config.clone(),
            branch_repo,
            package_repo,
            member_repo,
            subscription_repo,
            attendance_repo,
            payment_repo,
            identity,
            messages,
            codes,
            lifecycle,
            attendance,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
