//! Expense endpoints.
//!
//! Amounts are whole numbers in the currency's minor unit. Clients may send
//! them as JSON numbers or as numeric strings (`"100"`).

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    ActivityId, ApiResult, Error, Expense, ExpenseChanges, ExpenseDraft, ExpenseId, Patch,
};
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::principal::AuthenticatedUser;
use crate::inbound::http::schemas::MessageEnvelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{AmountInput, RequestFields, path_uuid};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBody {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[schema(example = 100)]
    pub amount: i64,
    #[schema(example = "EUR")]
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseBody {
    fn from(expense: Expense) -> Self {
        Self {
            id: *expense.id.as_uuid(),
            activity_id: *expense.activity_id.as_uuid(),
            title: expense.title,
            description: expense.description,
            amount: expense.amount,
            currency: expense.currency,
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateExpenseRequest {
    #[schema(value_type = Option<Uuid>)]
    pub activity_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub amount: Option<AmountInput>,
    pub currency: String,
}

impl CreateExpenseRequest {
    fn into_draft(self) -> Result<ExpenseDraft, Error> {
        let mut fields = RequestFields::new();
        let activity_id = fields.uuid("activityId", self.activity_id.as_deref());
        let amount = fields.amount("amount", self.amount);
        let (Some(activity_id), Some(amount)) = (activity_id, amount) else {
            return Err(fields.into_error());
        };
        Ok(ExpenseDraft {
            activity_id: ActivityId::from_uuid(activity_id),
            title: self.title,
            description: self.description,
            amount,
            currency: self.currency,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    #[serde(default)]
    #[schema(value_type = Option<Uuid>)]
    pub activity_id: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<Option<String>>,
    #[serde(default)]
    #[schema(value_type = Option<AmountInput>)]
    pub amount: Patch<AmountInput>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub currency: Patch<String>,
}

impl UpdateExpenseRequest {
    fn into_changes(self) -> Result<ExpenseChanges, Error> {
        let mut fields = RequestFields::new();
        let activity_id = fields.patch_uuid("activityId", self.activity_id);
        let amount = fields.patch_amount("amount", self.amount);
        let (Some(activity_id), Some(amount)) = (activity_id, amount) else {
            return Err(fields.into_error());
        };
        Ok(ExpenseChanges {
            activity_id: activity_id.map(ActivityId::from_uuid),
            title: self.title,
            description: self.description,
            amount,
            currency: self.currency,
        })
    }
}

fn expense_id(raw: &str) -> Result<ExpenseId, Error> {
    path_uuid("id", raw).map(ExpenseId::from_uuid)
}

#[utoipa::path(
    get,
    path = "/api/expenses/activities/{activityId}",
    params(("activityId" = Uuid, Path, description = "Activity identifier")),
    responses(
        (status = 200, description = "Expenses", body = Envelope<Vec<ExpenseBody>>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Activity not found", body = MessageEnvelope)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses"
)]
#[get("/expenses/activities/{activity_id}")]
pub async fn list_expenses(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let activity_id = path_uuid("activityId", &path).map(ActivityId::from_uuid)?;
    let expenses = state
        .lifecycle
        .list_expenses(principal.id(), &activity_id)
        .await?;
    let body: Vec<ExpenseBody> = expenses.into_iter().map(ExpenseBody::from).collect();
    Ok(envelope::ok("Expenses successfully retrieved", body))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Created expense", body = Envelope<ExpenseBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Activity not found", body = MessageEnvelope)
    ),
    tags = ["expenses"],
    operation_id = "createExpense"
)]
#[post("/expenses")]
pub async fn create_expense(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    payload: web::Json<CreateExpenseRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let expense = state.lifecycle.create_expense(principal.id(), draft).await?;
    Ok(envelope::created(
        "Expense successfully created",
        ExpenseBody::from(expense),
    ))
}

#[utoipa::path(
    get,
    path = "/api/expenses/{id}",
    params(("id" = Uuid, Path, description = "Expense identifier")),
    responses(
        (status = 200, description = "Expense", body = Envelope<ExpenseBody>),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["expenses"],
    operation_id = "getExpense"
)]
#[get("/expenses/{id}")]
pub async fn get_expense(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = expense_id(&path)?;
    let expense = state.lifecycle.get_expense(principal.id(), &id).await?;
    Ok(envelope::ok(
        "Expense successfully retrieved",
        ExpenseBody::from(expense),
    ))
}

#[utoipa::path(
    put,
    path = "/api/expenses/{id}",
    params(("id" = Uuid, Path, description = "Expense identifier")),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Updated expense", body = Envelope<ExpenseBody>),
        (status = 400, description = "Invalid input", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden or activity changed", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope),
        (status = 409, description = "Concurrent modification", body = MessageEnvelope)
    ),
    tags = ["expenses"],
    operation_id = "updateExpense"
)]
#[put("/expenses/{id}")]
pub async fn update_expense(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateExpenseRequest>,
) -> ApiResult<HttpResponse> {
    let id = expense_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let expense = state
        .lifecycle
        .update_expense(principal.id(), &id, changes)
        .await?;
    Ok(envelope::ok(
        "Expense successfully updated",
        ExpenseBody::from(expense),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    params(("id" = Uuid, Path, description = "Expense identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 401, description = "Unauthenticated", body = MessageEnvelope),
        (status = 403, description = "Forbidden", body = MessageEnvelope),
        (status = 404, description = "Not found", body = MessageEnvelope)
    ),
    tags = ["expenses"],
    operation_id = "deleteExpense"
)]
#[delete("/expenses/{id}")]
pub async fn delete_expense(
    state: web::Data<HttpState>,
    principal: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = expense_id(&path)?;
    state.lifecycle.delete_expense(principal.id(), &id).await?;
    Ok(envelope::done("Expense successfully deleted"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn string_amounts_are_parsed() {
        let request: CreateExpenseRequest = serde_json::from_value(json!({
            "activityId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "title": "Tickets",
            "amount": "100",
            "currency": "EUR",
        }))
        .expect("valid body");
        let draft = request.into_draft().expect("valid draft");
        assert_eq!(draft.amount, 100);
    }

    #[rstest]
    fn fractional_amounts_are_rejected() {
        let request: UpdateExpenseRequest =
            serde_json::from_value(json!({"amount": "12.5"})).expect("valid body");
        let err = request.into_changes().expect_err("fractional amount");
        assert_eq!(err.field_errors()[0].field(), "amount");
        assert_eq!(err.field_errors()[0].code(), "invalid_amount");
    }

    #[rstest]
    fn missing_activity_is_required() {
        let request: CreateExpenseRequest = serde_json::from_value(json!({
            "title": "Tickets",
            "amount": 5,
            "currency": "EUR",
        }))
        .expect("valid body");
        let err = request.into_draft().expect_err("no activity");
        assert_eq!(err.field_errors()[0].field(), "activityId");
        assert_eq!(err.field_errors()[0].code(), "required");
    }
}
