//! Domain primitives, aggregates and services.
//!
//! Purpose: Define the strongly typed travel-planning entities and the rules
//! that govern them, independent of HTTP and storage. Adapters reach the
//! domain through the traits in [`ports`].
//!
//! Public surface:
//! - Entities: [`User`], [`Trip`], [`Itinerary`], [`Activity`], [`Expense`],
//!   [`Reminder`] with their `*Draft` and `*Changes` inputs.
//! - [`OwnershipResolver`]: decides whether a principal owns an entity.
//! - [`LifecycleManager`]: create, update and delete under the ownership and
//!   range rules.
//! - [`AccountService`]: registration and login.
//! - [`example_data`]: deterministic sample travellers for local setups.
//! - [`Error`] / [`ErrorCode`]: the transport-agnostic failure type.

pub mod account_service;
pub mod activity;
pub mod auth;
pub mod error;
pub mod example_data;
pub mod expense;
pub(crate) mod fields;
pub mod ids;
pub mod itinerary;
pub mod lifecycle;
pub mod ownership;
pub mod patch;
pub mod ports;
pub mod reminder;
pub mod schedule;
pub mod trip;
pub mod user;

pub use self::account_service::{AccountService, Session};
pub use self::activity::{
    Activity, ActivityCategory, ActivityChanges, ActivityDetail, ActivityDraft, UnknownCategory,
};
pub use self::auth::{LoginCredentials, Principal, Registration};
pub use self::error::{Error, ErrorCode, FieldError};
pub use self::expense::{Expense, ExpenseChanges, ExpenseDraft};
pub use self::ids::{
    ActivityId, ExpenseId, IdValidationError, ItineraryId, ReminderId, TripId, UserId,
};
pub use self::itinerary::{Itinerary, ItineraryChanges, ItineraryDraft};
pub use self::lifecycle::LifecycleManager;
pub use self::ownership::{
    Access, EntityKind, EntityRef, Owned, OwnershipResolver, ResolvedEntity, Verdict,
    authorize_listing,
};
pub use self::patch::Patch;
pub use self::reminder::{Reminder, ReminderChanges, ReminderDraft};
pub use self::schedule::{ACTIVITY_TIMES, RangeRule, TRIP_DATES};
pub use self::trip::{Trip, TripChanges, TripDraft};
pub use self::user::{Email, PasswordHash, User, UserChanges, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use travel_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
