//! PostgreSQL-backed `ReminderRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersistenceError, ReminderRepository};
use crate::domain::{Reminder, ReminderId, UserId};
use crate::zero_rows_error;

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{ReminderChangeset, ReminderRow};
use super::pool::DbPool;
use super::schema::reminders;

/// Diesel-backed implementation of the `ReminderRepository` port.
#[derive(Clone)]
pub struct DieselReminderRepository {
    pool: DbPool,
}

impl DieselReminderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderRepository for DieselReminderRepository {
    async fn find_by_id(&self, id: &ReminderId) -> Result<Option<Reminder>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ReminderRow> = reminders::table
            .filter(reminders::id.eq(id.as_uuid()))
            .select(ReminderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Reminder::from))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Reminder>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReminderRow> = reminders::table
            .filter(reminders::user_id.eq(user_id.as_uuid()))
            .select(ReminderRow::as_select())
            .order_by((reminders::time.asc(), reminders::created_at.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Reminder::from).collect())
    }

    async fn insert(&self, reminder: &Reminder) -> Result<Reminder, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ReminderRow = diesel::insert_into(reminders::table)
            .values(ReminderRow::from(reminder))
            .returning(ReminderRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        reminder: &Reminder,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Reminder, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *reminder.id.as_uuid();
        let updated: Option<ReminderRow> = diesel::update(
            reminders::table
                .filter(reminders::id.eq(id))
                .filter(reminders::updated_at.eq(expected_updated_at)),
        )
        .set(ReminderChangeset::from(reminder))
        .returning(ReminderRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match updated {
            Some(row) => Ok(row.into()),
            None => Err(zero_rows_error!(
                &mut conn,
                reminders::table,
                reminders::id,
                id
            )),
        }
    }

    async fn delete(
        &self,
        id: &ReminderId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id.as_uuid();
        let deleted = diesel::delete(
            reminders::table
                .filter(reminders::id.eq(id))
                .filter(reminders::updated_at.eq(expected_updated_at)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(zero_rows_error!(
                &mut conn,
                reminders::table,
                reminders::id,
                id
            ));
        }
        Ok(())
    }
}
