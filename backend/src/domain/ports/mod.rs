//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Repository ports are grouped in [`RepositoryPorts`] so services receive
//! the whole persistence gateway through one constructor argument.

mod macros;
pub(crate) use macros::define_port_error;

mod activity_repository;
mod credential_hasher;
mod expense_repository;
mod itinerary_repository;
mod persistence_error;
mod reminder_repository;
mod token_service;
mod trip_repository;
mod user_repository;

use std::sync::Arc;

#[cfg(test)]
pub use activity_repository::MockActivityRepository;
pub use activity_repository::ActivityRepository;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialError, CredentialHasher};
#[cfg(test)]
pub use expense_repository::MockExpenseRepository;
pub use expense_repository::ExpenseRepository;
#[cfg(test)]
pub use itinerary_repository::MockItineraryRepository;
pub use itinerary_repository::ItineraryRepository;
pub use persistence_error::PersistenceError;
#[cfg(test)]
pub use reminder_repository::MockReminderRepository;
pub use reminder_repository::ReminderRepository;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::TripRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;

/// The persistence gateway: one repository per entity kind.
#[derive(Clone)]
pub struct RepositoryPorts {
    pub users: Arc<dyn UserRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub itineraries: Arc<dyn ItineraryRepository>,
    pub activities: Arc<dyn ActivityRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub reminders: Arc<dyn ReminderRepository>,
}
