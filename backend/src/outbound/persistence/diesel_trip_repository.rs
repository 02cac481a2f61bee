//! PostgreSQL-backed `TripRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersistenceError, TripRepository};
use crate::domain::{Trip, TripId, UserId};
use crate::zero_rows_error;

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{TripChangeset, TripRow};
use super::pool::DbPool;
use super::schema::trips;

/// Diesel-backed implementation of the `TripRepository` port.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TripRow> = trips::table
            .filter(trips::id.eq(id.as_uuid()))
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Trip::from))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Trip>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TripRow> = trips::table
            .filter(trips::user_id.eq(user_id.as_uuid()))
            .select(TripRow::as_select())
            .order_by((trips::start_date.asc(), trips::created_at.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Trip::from).collect())
    }

    async fn insert(&self, trip: &Trip) -> Result<Trip, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: TripRow = diesel::insert_into(trips::table)
            .values(TripRow::from(trip))
            .returning(TripRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        trip: &Trip,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Trip, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *trip.id.as_uuid();
        let updated: Option<TripRow> = diesel::update(
            trips::table
                .filter(trips::id.eq(id))
                .filter(trips::updated_at.eq(expected_updated_at)),
        )
        .set(TripChangeset::from(trip))
        .returning(TripRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match updated {
            Some(row) => Ok(row.into()),
            None => Err(zero_rows_error!(&mut conn, trips::table, trips::id, id)),
        }
    }

    async fn delete(
        &self,
        id: &TripId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id.as_uuid();
        let deleted = diesel::delete(
            trips::table
                .filter(trips::id.eq(id))
                .filter(trips::updated_at.eq(expected_updated_at)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(zero_rows_error!(&mut conn, trips::table, trips::id, id));
        }
        Ok(())
    }
}
