//! PostgreSQL-backed `ExpenseRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ExpenseRepository, PersistenceError};
use crate::domain::{ActivityId, Expense, ExpenseId, Owned, UserId};
use crate::zero_rows_error;

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{ExpenseChangeset, ExpenseRow};
use super::pool::DbPool;
use super::schema::{activities, expenses, itineraries, trips};

/// Diesel-backed implementation of the `ExpenseRepository` port.
///
/// The owner of an expense sits three joins away, at the trip.
#[derive(Clone)]
pub struct DieselExpenseRepository {
    pool: DbPool,
}

impl DieselExpenseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn owned((row, owner): (ExpenseRow, Uuid)) -> Owned<Expense> {
    Owned::new(row.into(), UserId::from_uuid(owner))
}

#[async_trait]
impl ExpenseRepository for DieselExpenseRepository {
    async fn find_by_id(&self, id: &ExpenseId) -> Result<Option<Owned<Expense>>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(ExpenseRow, Uuid)> = expenses::table
            .inner_join(activities::table.inner_join(itineraries::table.inner_join(trips::table)))
            .filter(expenses::id.eq(id.as_uuid()))
            .select((ExpenseRow::as_select(), trips::user_id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(owned))
    }

    async fn list_by_activity(
        &self,
        activity_id: &ActivityId,
    ) -> Result<Vec<Owned<Expense>>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ExpenseRow, Uuid)> = expenses::table
            .inner_join(activities::table.inner_join(itineraries::table.inner_join(trips::table)))
            .filter(expenses::activity_id.eq(activity_id.as_uuid()))
            .select((ExpenseRow::as_select(), trips::user_id))
            .order_by(expenses::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(owned).collect())
    }

    async fn insert(&self, expense: &Expense) -> Result<Expense, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ExpenseRow = diesel::insert_into(expenses::table)
            .values(ExpenseRow::from(expense))
            .returning(ExpenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        expense: &Expense,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Expense, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *expense.id.as_uuid();
        let updated: Option<ExpenseRow> = diesel::update(
            expenses::table
                .filter(expenses::id.eq(id))
                .filter(expenses::updated_at.eq(expected_updated_at)),
        )
        .set(ExpenseChangeset::from(expense))
        .returning(ExpenseRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match updated {
            Some(row) => Ok(row.into()),
            None => Err(zero_rows_error!(&mut conn, expenses::table, expenses::id, id)),
        }
    }

    async fn delete(
        &self,
        id: &ExpenseId,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id.as_uuid();
        let deleted = diesel::delete(
            expenses::table
                .filter(expenses::id.eq(id))
                .filter(expenses::updated_at.eq(expected_updated_at)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(zero_rows_error!(&mut conn, expenses::table, expenses::id, id));
        }
        Ok(())
    }
}
