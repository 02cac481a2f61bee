//! Example data configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_SEED: u64 = 2024;
const DEFAULT_USER_COUNT: usize = 10;
const DEFAULT_PASSWORD: &str = "travel-example";

/// Configuration values controlling example data seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_DATA")]
pub struct ExampleDataSettings {
    /// Enable example data seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Generator seed; the same seed always yields the same travellers.
    pub seed: Option<u64>,
    /// Number of travellers to generate.
    #[ortho_config(file_key = "user_count")]
    pub count: Option<usize>,
    /// Password every generated traveller logs in with.
    pub password: Option<String>,
}

impl ExampleDataSettings {
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn user_count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_USER_COUNT)
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or(DEFAULT_PASSWORD)
    }
}
