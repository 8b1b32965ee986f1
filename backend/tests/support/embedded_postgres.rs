//! Per-test databases cloned from a migrated template.
//!
//! The template is named after a hash of `backend/migrations`, so a schema
//! change provisions a new template instead of reusing a stale one. The
//! template is migrated with the crate's own `run_pending_migrations`.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use league_backend::domain::ports::MatchRepository;
use league_backend::domain::{Match, MatchDraft, NewMatch};
use league_backend::outbound::persistence::{
    DbPool, DieselMatchRepository, PoolConfig, run_pending_migrations,
};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

use super::cluster::{handle_cluster_setup_failure, shared_cluster_handle};

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "league_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn template_database_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn ensure_template_database(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
    }

    Ok(template_name)
}

/// Clone a fresh database from the migrated template, retrying while another
/// test binary is still creating the template.
pub fn provision_template_database(
    cluster: &ClusterHandle,
    runtime: &Runtime,
) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("no provisioning attempt ran");
    for attempt in 1..=PROVISION_RETRIES {
        let outcome = ensure_template_database(cluster, runtime).and_then(|template| {
            let db_name = format!("test_{}", Uuid::new_v4());
            cluster
                .temporary_database_from_template(db_name.as_str(), template.as_str())
                .map_err(|err| format!("create database from template: {err:?}"))
        });
        match outcome {
            Ok(database) => return Ok(database),
            Err(error) => last_error = format!("attempt {attempt}/{PROVISION_RETRIES}: {error}"),
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// A migrated database with a pool and the runtime that drives it.
pub struct DieselContext {
    /// Runtime reused for every repository call in a test.
    pub runtime: Runtime,
    /// Pool over the per-test database.
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

impl DieselContext {
    /// Drive `future` to completion on the context runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Insert a match to hang dependent rows off.
    pub fn insert_match(&self, title: &str) -> Match {
        let new_match = NewMatch::new(MatchDraft {
            tournament_id: 1,
            team_a_id: 10,
            team_b_id: 20,
            title: title.to_owned(),
            week: 1,
            match_date: None,
        })
        .expect("valid match");
        let repository = DieselMatchRepository::new(self.pool.clone());
        self.block_on(repository.insert(&new_match))
            .expect("match insert succeeds")
    }
}

fn setup_context() -> Result<DieselContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database = provision_template_database(cluster, &runtime)?;

    let config = PoolConfig::new(database.url())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(DieselContext {
        runtime,
        pool,
        _database: database,
    })
}

/// Fresh context, or `None` when the cluster is unavailable and skipping is
/// allowed.
pub fn diesel_context() -> Option<DieselContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
