//! Runtime settings and the HTTP server configuration derived from them.
//!
//! Settings layer defaults, an optional config file, `TRAVEL_*` environment
//! variables and command-line flags through OrthoConfig.

use std::net::SocketAddr;

use actix_web::http::Uri;
use chrono::Duration;
use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

#[cfg(feature = "example-data")]
use travel_backend::domain::ports::RepositoryPorts;
use travel_backend::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode for settings validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing signing secret.
    Debug,
    /// Release builds require every secret explicitly.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("TRAVEL_JWT_SECRET must be set in release builds")]
    MissingSigningSecret,
    #[error("token lifetime must be positive, got {minutes} minutes")]
    InvalidTokenTtl { minutes: i64 },
    #[error("invalid CORS origin '{value}': expected scheme://host[:port]")]
    InvalidCorsOrigin { value: String },
}

/// Application settings loaded via OrthoConfig.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRAVEL")]
pub struct AppSettings {
    /// Listen address.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in minutes.
    pub token_ttl_minutes: Option<i64>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Comma-separated origins allowed by CORS. Unset allows any origin.
    pub cors_allowed_origins: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        let minutes = self.token_ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        if minutes <= 0 {
            return Err(SettingsError::InvalidTokenTtl { minutes });
        }
        Ok(Duration::minutes(minutes))
    }

    /// Origins allowed to make cross-origin requests.
    ///
    /// An empty list means any origin.
    pub fn cors_origins(&self) -> Result<Vec<String>, SettingsError> {
        let Some(raw) = self.cors_allowed_origins.as_deref() else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                let valid = origin
                    .parse::<Uri>()
                    .is_ok_and(|uri| uri.scheme().is_some() && uri.host().is_some());
                if valid {
                    Ok(origin.to_owned())
                } else {
                    Err(SettingsError::InvalidCorsOrigin {
                        value: origin.to_owned(),
                    })
                }
            })
            .collect()
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            PoolConfig::new(url).with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
        })
    }

    /// The token signing secret.
    ///
    /// Debug builds without a configured secret get a random one, so tokens
    /// do not survive a restart. Release builds refuse to start.
    pub fn signing_secret(&self, mode: BuildMode) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            _ if mode == BuildMode::Debug => {
                warn!("TRAVEL_JWT_SECRET not set; using ephemeral signing secret (dev only)");
                let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
                rand::thread_rng().fill_bytes(secret.as_mut_slice());
                Ok(secret)
            }
            _ => Err(SettingsError::MissingSigningSecret),
        }
    }
}

/// Everything [`super::create_server`] needs to assemble the application.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "example-data")]
    pub(crate) repositories: Option<RepositoryPorts>,
    pub(crate) signing_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Duration,
    pub(crate) cors_origins: Vec<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, signing_secret: Zeroizing<Vec<u8>>, token_ttl: Duration) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            #[cfg(feature = "example-data")]
            repositories: None,
            signing_secret,
            token_ttl,
            cors_origins: Vec::new(),
        }
    }

    /// Restrict CORS to `origins`; empty allows any origin.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Serve from repositories that were already built (and seeded).
    #[cfg(feature = "example-data")]
    #[must_use]
    pub fn with_repositories(mut self, repositories: RepositoryPorts) -> Self {
        self.repositories = Some(repositories);
        self
    }

    /// Serve from PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 7] = [
        "TRAVEL_BIND_ADDR",
        "TRAVEL_DATABASE_URL",
        "TRAVEL_JWT_SECRET",
        "TRAVEL_TOKEN_TTL_MINUTES",
        "TRAVEL_POOL_MAX_SIZE",
        "TRAVEL_RUN_MIGRATIONS",
        "TRAVEL_CORS_ALLOWED_ORIGINS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("travel-backend")])
            .expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        KEYS.iter().map(|key| (*key, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid literal")
        );
        assert_eq!(settings.token_ttl().expect("default ttl"), Duration::minutes(60));
        assert!(settings.pool_config().is_none());
        assert!(settings.run_migrations);
        assert!(settings.cors_origins().expect("no origins").is_empty());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.extend([
            ("TRAVEL_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("TRAVEL_DATABASE_URL", Some("postgres://localhost/travel".to_owned())),
            ("TRAVEL_TOKEN_TTL_MINUTES", Some("15".to_owned())),
            ("TRAVEL_POOL_MAX_SIZE", Some("4".to_owned())),
            ("TRAVEL_RUN_MIGRATIONS", Some("false".to_owned())),
            (
                "TRAVEL_CORS_ALLOWED_ORIGINS",
                Some("https://app.example.com, http://localhost:5173".to_owned()),
            ),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(settings.token_ttl().expect("ttl"), Duration::minutes(15));
        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://localhost/travel");
        assert!(!settings.run_migrations);
        assert_eq!(
            settings.cors_origins().expect("valid origins"),
            ["https://app.example.com", "http://localhost:5173"]
        );
    }

    fn settings(jwt_secret: Option<&str>, ttl: Option<i64>) -> AppSettings {
        AppSettings {
            bind_addr: Some("not an address".to_owned()),
            database_url: None,
            jwt_secret: jwt_secret.map(str::to_owned),
            token_ttl_minutes: ttl,
            pool_max_size: None,
            run_migrations: true,
            cors_allowed_origins: None,
        }
    }

    #[rstest]
    #[case("*")]
    #[case("app.example.com")]
    #[case("https://app.example.com, not an origin")]
    fn malformed_cors_origins_are_rejected(#[case] origins: &str) {
        let config = AppSettings {
            cors_allowed_origins: Some(origins.to_owned()),
            ..settings(None, None)
        };
        assert!(matches!(
            config.cors_origins(),
            Err(SettingsError::InvalidCorsOrigin { .. })
        ));
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        assert!(matches!(
            settings(None, None).bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn non_positive_ttl_is_rejected(#[case] minutes: i64) {
        assert!(matches!(
            settings(None, Some(minutes)).token_ttl(),
            Err(SettingsError::InvalidTokenTtl { .. })
        ));
    }

    #[rstest]
    fn configured_secret_is_used_verbatim() {
        let secret = settings(Some("s3cret"), None)
            .signing_secret(BuildMode::Release)
            .expect("configured secret");
        assert_eq!(secret.as_slice(), b"s3cret");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn release_builds_require_a_secret(#[case] secret: Option<&str>) {
        assert!(matches!(
            settings(secret, None).signing_secret(BuildMode::Release),
            Err(SettingsError::MissingSigningSecret)
        ));
    }

    #[rstest]
    fn debug_builds_fall_back_to_random_secrets() {
        let config = settings(None, None);
        let first = config.signing_secret(BuildMode::Debug).expect("ephemeral");
        let second = config.signing_secret(BuildMode::Debug).expect("ephemeral");
        assert_eq!(first.len(), EPHEMERAL_SECRET_LEN);
        assert_ne!(first.as_slice(), second.as_slice());
    }
}
