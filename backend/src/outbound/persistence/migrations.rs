//! Embedded schema migrations.
//!
//! Diesel's migration harness is synchronous, so it runs on the blocking
//! thread pool with a dedicated `PgConnection`. Each revision is applied in
//! its own transaction.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Embedded migrations from the `backend/migrations` directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("migration connection failed: {message}")]
    Connection { message: String },
    /// A revision failed to apply.
    #[error("migration failed: {message}")]
    Apply { message: String },
    /// The blocking task panicked or was cancelled.
    #[error("migration task aborted: {message}")]
    Task { message: String },
}

/// Apply every pending migration and return the applied revision names.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection fails, a revision fails to
/// apply, or the blocking task does not complete.
pub async fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply(&url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })??;

    info!(count = applied.len(), revisions = ?applied, "schema migrations applied");
    Ok(applied)
}

fn apply(url: &str) -> Result<Vec<String>, MigrationError> {
    let mut conn = PgConnection::establish(url).map_err(|err| MigrationError::Connection {
        message: err.to_string(),
    })?;
    let versions = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(versions.iter().map(ToString::to_string).collect())
}
