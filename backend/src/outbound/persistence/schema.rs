//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. Regenerate with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` carries a unique index.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        phone_number -> Nullable<Varchar>,
        profile_picture_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    trips (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        destination -> Varchar,
        start_date -> Timestamptz,
        end_date -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    itineraries (id) {
        id -> Uuid,
        trip_id -> Uuid,
        date -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    activities (id) {
        id -> Uuid,
        itinerary_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        location -> Varchar,
        start_time -> Timestamptz,
        end_time -> Timestamptz,
        /// One of the `ActivityCategory` wire names, enforced by a CHECK.
        category -> Varchar,
        detail -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    expenses (id) {
        id -> Uuid,
        activity_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        amount -> Int8,
        currency -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reminders reference both their owner and a trip of that owner.
    reminders (id) {
        id -> Uuid,
        user_id -> Uuid,
        trip_id -> Uuid,
        message -> Text,
        time -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(trips -> users (user_id));
diesel::joinable!(itineraries -> trips (trip_id));
diesel::joinable!(activities -> itineraries (itinerary_id));
diesel::joinable!(expenses -> activities (activity_id));
diesel::joinable!(reminders -> trips (trip_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    trips,
    itineraries,
    activities,
    expenses,
    reminders,
);
