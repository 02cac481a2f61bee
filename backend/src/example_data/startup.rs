//! Startup seeding orchestration.

use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;

use crate::domain::example_data::{
    ExampleDataSeedOutcome, ExampleDataSeeder, ExampleDataSeedingError, SeedingResult,
};
use crate::domain::ports::{CredentialHasher, RepositoryPorts};
use crate::example_data::config::ExampleDataSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Generated travellers need a password to log in with.
    #[error("example data password must not be empty")]
    EmptyPassword,
    /// Generation or persistence failed.
    #[error("example data seeding error: {0}")]
    Seeding(#[from] ExampleDataSeedingError),
}

/// Apply example data on startup when enabled.
///
/// Seeds whichever store `repos` fronts, so an in-memory server starts with
/// the same travellers every time.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use travel_backend::example_data::{ExampleDataSettings, seed_example_data_on_startup};
/// use travel_backend::outbound::memory::InMemoryStore;
/// use travel_backend::outbound::security::Argon2Hasher;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ExampleDataSettings {
///     enabled: false,
///     seed: None,
///     count: None,
///     password: None,
/// };
/// let repos = InMemoryStore::new().repository_ports();
/// let outcome =
///     seed_example_data_on_startup(&settings, &repos, Arc::new(Argon2Hasher::default())).await?;
/// assert!(outcome.is_none());
/// # Ok(())
/// # }
/// ```
pub async fn seed_example_data_on_startup(
    settings: &ExampleDataSettings,
    repos: &RepositoryPorts,
    hasher: Arc<dyn CredentialHasher>,
) -> Result<Option<ExampleDataSeedOutcome>, StartupSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "example data seeding skipped");
        return Ok(None);
    }
    let password = settings.password();
    if password.trim().is_empty() {
        return Err(StartupSeedingError::EmptyPassword);
    }

    let seeder = ExampleDataSeeder::new(repos.clone(), hasher, Arc::new(DefaultClock));
    let outcome = seeder
        .seed(settings.seed(), settings.user_count(), password)
        .await?;

    match outcome.result {
        SeedingResult::Applied => info!(
            seed = outcome.seed,
            user_count = outcome.user_count,
            "example data seeding applied"
        ),
        SeedingResult::AlreadySeeded => info!(
            seed = outcome.seed,
            user_count = outcome.user_count,
            "example data seed already applied; skipping"
        ),
    }
    Ok(Some(outcome))
}
