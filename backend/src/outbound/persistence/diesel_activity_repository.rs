//! PostgreSQL-backed `ActivityRepository` implementation using Diesel ORM.
//!
//! Reads join itinerary and trip to report the owning user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ActivityRepository, PersistenceError};
use crate::domain::{Activity, ActivityId, ItineraryId, Owned, UserId};
use crate::zero_rows_error;

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{ActivityChangeset, ActivityRow};
use super::pool::DbPool;
use super::schema::{activities, itineraries, trips};

/// Diesel-backed implementation of the `ActivityRepository` port.
#[derive(Clone)]
pub struct DieselActivityRepository {
    pool: DbPool,
}

impl DieselActivityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn owned((row, owner): (ActivityRow, Uuid)) -> Result<Owned<Activity>, PersistenceError> {
    Ok(Owned::new(Activity::try_from(row)?, UserId::from_uuid(owner)))
}

#[async_trait]
impl ActivityRepository for DieselActivityRepository {
    async fn find_by_id(
        &self,
        id: &ActivityId,
    ) -> Result<Option<Owned<Activity>>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(ActivityRow, Uuid)> = activities::table
            .inner_join(itineraries::table.inner_join(trips::table))
            .filter(activities::id.eq(id.as_uuid()))
            .select((ActivityRow::as_select(), trips::user_id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(owned).transpose()
    }

    async fn list_by_itinerary(
        &self,
        itinerary_id: &ItineraryId,
    ) -> Result<Vec<Owned<Activity>>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ActivityRow, Uuid)> = activities::table
            .inner_join(itineraries::table.inner_join(trips::table))
            .filter(activities::itinerary_id.eq(itinerary_id.as_uuid()))
            .select((ActivityRow::as_select(), trips::user_id))
            .order_by((activities::start_time.asc(), activities::created_at.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(owned).collect()
    }

    async fn insert(&self, activity: &Activity) -> Result<Activity, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ActivityRow = diesel::insert_into(activities::table)
            .values(ActivityRow::from(activity))
            .returning(ActivityRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Activity::try_from(row)
    }

    async fn update(
        &self,
        activity: &Activity,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Activity, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *activity.id.as_uuid();
        let updated: Option<ActivityRow> = diesel::update(
            activities::table
                .filter(activities::id.eq(id))
                .filter(activities::updated_at.eq(expected_updated_at)),
        )
        .set(ActivityChangeset::from(activity))
        .returning(ActivityRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match updated {
            Some(row) => Activity::try_from(row),
            None => Err(zero_rows_error!(
                &mut conn,
                activities::table,
                activities::id,
                id
            )),
        }
    }

    async fn delete(
        &self,
        id: &ActivityId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id.as_uuid();
        let deleted = diesel::delete(
            activities::table
                .filter(activities::id.eq(id))
                .filter(activities::updated_at.eq(expected_updated_at)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(zero_rows_error!(
                &mut conn,
                activities::table,
                activities::id,
                id
            ));
        }
        Ok(())
    }
}
