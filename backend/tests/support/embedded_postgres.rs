//! Embedded PostgreSQL databases for adapter tests.
//!
//! A single cluster is shared by the test binary. Each test receives its own
//! database cloned from a template that already carries the embedded
//! migrations, keyed by a hash of the migrations directory so schema edits
//! produce a fresh template.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; suites then skip
//! instead of failing.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

use travel_backend::outbound::persistence::MIGRATIONS;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "travel_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn pg_embed_dirs() -> Result<(String, String), String> {
    let base = std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target"))
        .join("pg-embed")
        .join(format!("bootstrap-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir).map_err(|err| err.to_string())?;
    std::fs::create_dir_all(&data_dir).map_err(|err| err.to_string())?;
    Ok((
        runtime_dir.to_string_lossy().into_owned(),
        data_dir.to_string_lossy().into_owned(),
    ))
}

/// Start (or reuse) the shared cluster.
///
/// Installation and data directories default to `/var/tmp`; when either
/// override is unset both are pointed below the target directory for the
/// duration of the bootstrap.
fn cluster() -> Result<&'static ClusterHandle, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if needs_override {
        let (runtime_dir, data_dir) = pg_embed_dirs()?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir)),
            ("PG_DATA_DIR", Some(data_dir)),
        ]))
    } else {
        None
    };

    shared_cluster_handle().map_err(|err| err.to_string())
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err}"))?;
    Ok(())
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
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
        migrate_schema(&cluster.connection().database_url(&template_name))?;
    }
    Ok(template_name)
}

/// A migrated database that is dropped with the returned handle.
pub(crate) fn provision_database() -> Result<TemporaryDatabase, String> {
    let cluster = cluster()?;
    let mut last_error = String::from("no attempt made");
    for attempt in 1..=PROVISION_RETRIES {
        let provisioned = ensure_template_database(cluster).and_then(|template| {
            cluster
                .temporary_database_from_template(
                    format!("test_{}", Uuid::new_v4()).as_str(),
                    template.as_str(),
                )
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match provisioned {
            Ok(database) => return Ok(database),
            Err(err) => last_error = format!("attempt {attempt}/{PROVISION_RETRIES}: {err}"),
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// Whether `SKIP_TEST_CLUSTER` is "1", "true" or "yes" (any case).
pub(crate) fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when the cluster is opted out, otherwise fail loudly so CI breakage
/// is not masked.
pub(crate) fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
