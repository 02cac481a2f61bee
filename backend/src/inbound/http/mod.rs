//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON bodies into domain drafts and change sets, call
//! the [`LifecycleManager`](crate::domain::LifecycleManager) or
//! [`AccountService`](crate::domain::AccountService), and wrap the outcome
//! in the response [`envelope`].

pub mod activities;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod expenses;
pub mod health;
pub mod itineraries;
pub mod principal;
pub mod reminders;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod trips;
pub mod users;
pub mod validation;

use actix_web::web;

pub use crate::domain::ApiResult;
use error::json_error_handler;

/// Register the account and entity routes.
///
/// Expects [`state::HttpState`] to be available as app data. Health probes
/// are mounted separately because they carry their own state.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/api")
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user)
                .service(trips::list_trips)
                .service(trips::create_trip)
                .service(trips::get_trip)
                .service(trips::update_trip)
                .service(trips::delete_trip)
                .service(itineraries::create_itinerary)
                .service(itineraries::list_itineraries)
                .service(itineraries::get_itinerary)
                .service(itineraries::update_itinerary)
                .service(itineraries::delete_itinerary)
                .service(activities::create_activity)
                .service(activities::list_activities)
                .service(activities::get_activity)
                .service(activities::update_activity)
                .service(activities::delete_activity)
                .service(expenses::create_expense)
                .service(expenses::list_expenses)
                .service(expenses::get_expense)
                .service(expenses::update_expense)
                .service(expenses::delete_expense)
                .service(reminders::list_reminders)
                .service(reminders::create_reminder)
                .service(reminders::get_reminder)
                .service(reminders::update_reminder)
                .service(reminders::delete_reminder),
        );
}
