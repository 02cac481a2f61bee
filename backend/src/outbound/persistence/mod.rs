//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the domain repository
//! ports backed by PostgreSQL via Diesel with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details.
//! - **Conditional writes**: updates and deletes filter on the expected
//!   `updated_at`; a zero-row result is disambiguated into a stale write or
//!   a missing record.
//! - **Cascades**: deletes rely on `ON DELETE CASCADE` foreign keys.
//!
//! # Example
//!
//! ```ignore
//! use travel_backend::outbound::persistence::{DbPool, PoolConfig, diesel_repository_ports};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/travel")).await?;
//! let repos = diesel_repository_ports(&pool);
//! ```

mod diesel_activity_repository;
mod diesel_expense_repository;
pub(crate) mod diesel_helpers;
mod diesel_itinerary_repository;
mod diesel_reminder_repository;
mod diesel_trip_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

use std::sync::Arc;

use crate::domain::ports::RepositoryPorts;

pub use diesel_activity_repository::DieselActivityRepository;
pub use diesel_expense_repository::DieselExpenseRepository;
pub use diesel_itinerary_repository::DieselItineraryRepository;
pub use diesel_reminder_repository::DieselReminderRepository;
pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

/// Build the persistence gateway with every repository sharing `pool`.
pub fn diesel_repository_ports(pool: &DbPool) -> RepositoryPorts {
    RepositoryPorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        trips: Arc::new(DieselTripRepository::new(pool.clone())),
        itineraries: Arc::new(DieselItineraryRepository::new(pool.clone())),
        activities: Arc::new(DieselActivityRepository::new(pool.clone())),
        expenses: Arc::new(DieselExpenseRepository::new(pool.clone())),
        reminders: Arc::new(DieselReminderRepository::new(pool.clone())),
    }
}
