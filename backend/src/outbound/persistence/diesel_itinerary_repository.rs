//! PostgreSQL-backed `ItineraryRepository` implementation using Diesel ORM.
//!
//! Reads join the parent trip to report the owning user alongside each row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ItineraryRepository, PersistenceError};
use crate::domain::{Itinerary, ItineraryId, Owned, TripId, UserId};
use crate::zero_rows_error;

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{ItineraryChangeset, ItineraryRow};
use super::pool::DbPool;
use super::schema::{itineraries, trips};

/// Diesel-backed implementation of the `ItineraryRepository` port.
#[derive(Clone)]
pub struct DieselItineraryRepository {
    pool: DbPool,
}

impl DieselItineraryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn owned((row, owner): (ItineraryRow, Uuid)) -> Owned<Itinerary> {
    Owned::new(row.into(), UserId::from_uuid(owner))
}

#[async_trait]
impl ItineraryRepository for DieselItineraryRepository {
    async fn find_by_id(
        &self,
        id: &ItineraryId,
    ) -> Result<Option<Owned<Itinerary>>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(ItineraryRow, Uuid)> = itineraries::table
            .inner_join(trips::table)
            .filter(itineraries::id.eq(id.as_uuid()))
            .select((ItineraryRow::as_select(), trips::user_id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(owned))
    }

    async fn list_by_trip(
        &self,
        trip_id: &TripId,
    ) -> Result<Vec<Owned<Itinerary>>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ItineraryRow, Uuid)> = itineraries::table
            .inner_join(trips::table)
            .filter(itineraries::trip_id.eq(trip_id.as_uuid()))
            .select((ItineraryRow::as_select(), trips::user_id))
            .order_by((itineraries::date.asc(), itineraries::created_at.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(owned).collect())
    }

    async fn insert(&self, itinerary: &Itinerary) -> Result<Itinerary, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ItineraryRow = diesel::insert_into(itineraries::table)
            .values(ItineraryRow::from(itinerary))
            .returning(ItineraryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        itinerary: &Itinerary,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Itinerary, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *itinerary.id.as_uuid();
        let updated: Option<ItineraryRow> = diesel::update(
            itineraries::table
                .filter(itineraries::id.eq(id))
                .filter(itineraries::updated_at.eq(expected_updated_at)),
        )
        .set(ItineraryChangeset::from(itinerary))
        .returning(ItineraryRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match updated {
            Some(row) => Ok(row.into()),
            None => Err(zero_rows_error!(
                &mut conn,
                itineraries::table,
                itineraries::id,
                id
            )),
        }
    }

    async fn delete(
        &self,
        id: &ItineraryId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id.as_uuid();
        let deleted = diesel::delete(
            itineraries::table
                .filter(itineraries::id.eq(id))
                .filter(itineraries::updated_at.eq(expected_updated_at)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(zero_rows_error!(
                &mut conn,
                itineraries::table,
                itineraries::id,
                id
            ));
        }
        Ok(())
    }
}
