//! Internal Diesel row structs and their conversions to domain types.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Changesets set `treat_none_as_null` so a
//! cleared optional column is written as `NULL` instead of being skipped.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    Activity, ActivityDetail, ActivityId, Email, Expense, ExpenseId, Itinerary, ItineraryId,
    PasswordHash, Reminder, ReminderId, Trip, TripId, User, UserId,
};

use super::schema::{activities, expenses, itineraries, reminders, trips, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone_number: Option<&'a str>,
    pub profile_picture_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name.clone(),
            email: user.email.as_str().to_owned(),
            password_hash: user.password_hash.as_str().to_owned(),
            phone_number: user.phone_number.clone(),
            profile_picture_url: user.profile_picture_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl<'a> From<&'a User> for UserChangeset<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: &user.name,
            email: user.email.as_str(),
            phone_number: user.phone_number.as_deref(),
            profile_picture_url: user.profile_picture_url.as_deref(),
            updated_at: user.updated_at,
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(row.email)
            .map_err(|err| PersistenceError::query(format!("stored user {}: {err}", row.id)))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email,
            password_hash: PasswordHash::new(row.password_hash),
            phone_number: row.phone_number,
            profile_picture_url: row.profile_picture_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Trips
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trips)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TripChangeset<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub destination: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Trip> for TripRow {
    fn from(trip: &Trip) -> Self {
        Self {
            id: *trip.id.as_uuid(),
            user_id: *trip.user_id.as_uuid(),
            title: trip.title.clone(),
            description: trip.description.clone(),
            destination: trip.destination.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

impl<'a> From<&'a Trip> for TripChangeset<'a> {
    fn from(trip: &'a Trip) -> Self {
        Self {
            title: &trip.title,
            description: trip.description.as_deref(),
            destination: &trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            updated_at: trip.updated_at,
        }
    }
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Self {
            id: TripId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            description: row.description,
            destination: row.destination,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Itineraries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = itineraries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItineraryRow {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = itineraries)]
pub(crate) struct ItineraryChangeset {
    pub date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Itinerary> for ItineraryRow {
    fn from(itinerary: &Itinerary) -> Self {
        Self {
            id: *itinerary.id.as_uuid(),
            trip_id: *itinerary.trip_id.as_uuid(),
            date: itinerary.date,
            created_at: itinerary.created_at,
            updated_at: itinerary.updated_at,
        }
    }
}

impl From<&Itinerary> for ItineraryChangeset {
    fn from(itinerary: &Itinerary) -> Self {
        Self {
            date: itinerary.date,
            updated_at: itinerary.updated_at,
        }
    }
}

impl From<ItineraryRow> for Itinerary {
    fn from(row: ItineraryRow) -> Self {
        Self {
            id: ItineraryId::from_uuid(row.id),
            trip_id: TripId::from_uuid(row.trip_id),
            date: row.date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub id: Uuid,
    pub itinerary_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub category: String,
    pub detail: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = activities)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ActivityChangeset<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub location: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub category: &'a str,
    pub detail: Value,
    pub updated_at: DateTime<Utc>,
}

impl From<&Activity> for ActivityRow {
    fn from(activity: &Activity) -> Self {
        Self {
            id: *activity.id.as_uuid(),
            itinerary_id: *activity.itinerary_id.as_uuid(),
            title: activity.title.clone(),
            description: activity.description.clone(),
            location: activity.location.clone(),
            start_time: activity.start_time,
            end_time: activity.end_time,
            category: activity.category.as_str().to_owned(),
            detail: Value::Object(activity.detail.clone()),
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}

impl<'a> From<&'a Activity> for ActivityChangeset<'a> {
    fn from(activity: &'a Activity) -> Self {
        Self {
            title: &activity.title,
            description: activity.description.as_deref(),
            location: &activity.location,
            start_time: activity.start_time,
            end_time: activity.end_time,
            category: activity.category.as_str(),
            detail: Value::Object(activity.detail.clone()),
            updated_at: activity.updated_at,
        }
    }
}

impl TryFrom<ActivityRow> for Activity {
    type Error = PersistenceError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|err| PersistenceError::query(format!("stored activity {}: {err}", row.id)))?;
        let detail = match row.detail {
            Value::Object(map) => map,
            Value::Null => ActivityDetail::new(),
            other => {
                return Err(PersistenceError::query(format!(
                    "stored activity {}: detail is not an object: {other}",
                    row.id
                )));
            }
        };
        Ok(Self {
            id: ActivityId::from_uuid(row.id),
            itinerary_id: ItineraryId::from_uuid(row.itinerary_id),
            title: row.title,
            description: row.description,
            location: row.location,
            start_time: row.start_time,
            end_time: row.end_time,
            category,
            detail,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExpenseRow {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = expenses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ExpenseChangeset<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub amount: i64,
    pub currency: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl From<&Expense> for ExpenseRow {
    fn from(expense: &Expense) -> Self {
        Self {
            id: *expense.id.as_uuid(),
            activity_id: *expense.activity_id.as_uuid(),
            title: expense.title.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            currency: expense.currency.clone(),
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

impl<'a> From<&'a Expense> for ExpenseChangeset<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            title: &expense.title,
            description: expense.description.as_deref(),
            amount: expense.amount,
            currency: &expense.currency,
            updated_at: expense.updated_at,
        }
    }
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: ExpenseId::from_uuid(row.id),
            activity_id: ActivityId::from_uuid(row.activity_id),
            title: row.title,
            description: row.description,
            amount: row.amount,
            currency: row.currency,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reminders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReminderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_id: Uuid,
    pub message: String,
    pub time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reminders)]
pub(crate) struct ReminderChangeset<'a> {
    pub message: &'a str,
    pub time: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Reminder> for ReminderRow {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: *reminder.id.as_uuid(),
            user_id: *reminder.user_id.as_uuid(),
            trip_id: *reminder.trip_id.as_uuid(),
            message: reminder.message.clone(),
            time: reminder.time,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}

impl<'a> From<&'a Reminder> for ReminderChangeset<'a> {
    fn from(reminder: &'a Reminder) -> Self {
        Self {
            message: &reminder.message,
            time: reminder.time,
            updated_at: reminder.updated_at,
        }
    }
}

impl From<ReminderRow> for Reminder {
    fn from(row: ReminderRow) -> Self {
        Self {
            id: ReminderId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            trip_id: TripId::from_uuid(row.trip_id),
            message: row.message,
            time: row.time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 12, 1, 0, 0, 0)
            .single()
            .expect("valid date")
    }

    fn activity_row(category: &str, detail: Value) -> ActivityRow {
        ActivityRow {
            id: Uuid::new_v4(),
            itinerary_id: Uuid::new_v4(),
            title: "Museum".to_owned(),
            description: None,
            location: "Lisbon".to_owned(),
            start_time: at(),
            end_time: at(),
            category: category.to_owned(),
            detail,
            created_at: at(),
            updated_at: at(),
        }
    }

    #[rstest]
    fn activity_rows_decode_category_and_detail() {
        let activity = Activity::try_from(activity_row("SIGHTSEEING", json!({"ticket": "A1"})))
            .expect("valid row");
        assert_eq!(activity.category.as_str(), "SIGHTSEEING");
        assert_eq!(activity.detail.get("ticket"), Some(&json!("A1")));
    }

    #[rstest]
    #[case("MUSEUM", json!({}))]
    #[case("FOOD", json!([1, 2]))]
    fn malformed_activity_rows_are_query_errors(#[case] category: &str, #[case] detail: Value) {
        let err = Activity::try_from(activity_row(category, detail)).expect_err("bad row");
        assert!(matches!(err, PersistenceError::Query { .. }));
    }

    #[rstest]
    fn cleared_optional_columns_stay_none_in_changesets() {
        let trip = Trip {
            id: TripId::random(),
            user_id: UserId::random(),
            title: "Trip".to_owned(),
            description: None,
            destination: "Porto".to_owned(),
            start_date: at(),
            end_date: at(),
            created_at: at(),
            updated_at: at(),
        };
        let changeset = TripChangeset::from(&trip);
        assert_eq!(changeset.description, None);
        assert_eq!(changeset.destination, "Porto");
    }
}
