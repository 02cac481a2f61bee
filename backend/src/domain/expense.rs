//! Expense data model.

use chrono::{DateTime, Utc};

use super::{ActivityId, ExpenseId, Patch};

/// A cost attached to an activity.
///
/// `amount` is an integer in whatever unit the `currency` conventionally
/// uses for whole values; no conversion is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub activity_id: ActivityId,
    pub title: String,
    pub description: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub activity_id: ActivityId,
    pub title: String,
    pub description: Option<String>,
    pub amount: i64,
    pub currency: String,
}

/// Partial update of an expense.
///
/// A supplied `activity_id` is only compared with the stored parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseChanges {
    pub activity_id: Patch<ActivityId>,
    pub title: Patch<String>,
    pub description: Patch<Option<String>>,
    pub amount: Patch<i64>,
    pub currency: Patch<String>,
}
