use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::Caller;
use crate::database::Database;
use crate::error::ApiError;
use crate::models::budget::{BudgetWithCategory, CreateBudgetRequest, UpdateBudgetRequest};
use crate::models::summary::{BudgetStatus, CategorySpending};
use crate::routes::owned_category_name;
use crate::time;

const SELECT_WITH_CATEGORY: &str = "SELECT \
     b.id, \
     b.category_id AS category, \
     c.name AS category_name, \
     b.amount, \
     b.month, \
     b.created_at \
     FROM budgets b \
     JOIN categories c ON b.category_id = c.id";

async fn fetch_budget(
    db: &Database,
    user_id: Uuid,
    budget_id: i32,
) -> Result<Option<BudgetWithCategory>, ApiError> {
    let sql = format!("{SELECT_WITH_CATEGORY} WHERE b.id = $1 AND b.user_id = $2");

    let budget = sqlx::query_as::<_, BudgetWithCategory>(&sql)
        .bind(budget_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

    Ok(budget)
}

async fn check_duplicate_budget(
    db: &Database,
    user_id: Uuid,
    category_id: i32,
    month: NaiveDate,
    exclude_id: i32,
) -> Result<(), ApiError> {
    let duplicate = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM budgets \
         WHERE user_id = $1 AND category_id = $2 AND month = $3 AND id != $4)",
    )
    .bind(user_id)
    .bind(category_id)
    .bind(month)
    .bind(exclude_id)
    .fetch_one(db)
    .await?;

    if duplicate {
        return Err(ApiError::validation(
            "month",
            "Budget for this category and month already exists.",
        ));
    }

    Ok(())
}

// Get all budgets owned by the caller
pub async fn list_budgets(
    State(db): State<Database>,
    Caller(user_id): Caller,
) -> Result<Json<Vec<BudgetWithCategory>>, ApiError> {
    let sql = format!("{SELECT_WITH_CATEGORY} WHERE b.user_id = $1 ORDER BY b.created_at DESC");

    let budgets = sqlx::query_as::<_, BudgetWithCategory>(&sql)
        .bind(user_id)
        .fetch_all(&db)
        .await?;

    Ok(Json(budgets))
}

// Create a new budget for a category and month
pub async fn create_budget(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Json(payload): Json<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<BudgetWithCategory>), ApiError> {
    // The day of month carries no meaning, so store the first of the month;
    // the (month, category, user) uniqueness then covers the whole month.
    let month = time::start_of_month(time::parse_date("month", &payload.month)?);

    owned_category_name(&db, user_id, payload.category)
        .await?
        .ok_or_else(|| ApiError::validation("category", "Category not found."))?;

    check_duplicate_budget(&db, user_id, payload.category, month, 0).await?;

    let budget_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO budgets (user_id, category_id, amount, month) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(payload.category)
    .bind(payload.amount)
    .bind(month)
    .fetch_one(&db)
    .await?;

    let budget = fetch_budget(&db, user_id, budget_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(budget)))
}

// Get a single budget by id
pub async fn get_budget(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(budget_id): Path<i32>,
) -> Result<Json<BudgetWithCategory>, ApiError> {
    let budget = fetch_budget(&db, user_id, budget_id)
        .await?
        .ok_or(ApiError::not_found("budget"))?;

    Ok(Json(budget))
}

// Partially update a budget
pub async fn update_budget(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(budget_id): Path<i32>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> Result<Json<BudgetWithCategory>, ApiError> {
    let existing = fetch_budget(&db, user_id, budget_id)
        .await?
        .ok_or(ApiError::not_found("budget"))?;

    if let Some(category_id) = payload.category {
        owned_category_name(&db, user_id, category_id)
            .await?
            .ok_or_else(|| ApiError::validation("category", "Category not found."))?;
    }

    let month = payload
        .month
        .as_deref()
        .map(|value| time::parse_date("month", value))
        .transpose()?
        .map(time::start_of_month);

    // Re-check uniqueness against the values the row will end up with.
    let effective_category = payload.category.unwrap_or(existing.category);
    let effective_month = month.unwrap_or(existing.month);
    check_duplicate_budget(&db, user_id, effective_category, effective_month, budget_id).await?;

    sqlx::query(
        "UPDATE budgets SET \
         category_id = COALESCE($1, category_id), \
         amount = COALESCE($2, amount), \
         month = COALESCE($3, month), \
         updated_at = NOW() \
         WHERE id = $4 AND user_id = $5",
    )
    .bind(payload.category)
    .bind(payload.amount)
    .bind(month)
    .bind(budget_id)
    .bind(user_id)
    .execute(&db)
    .await?;

    let budget = fetch_budget(&db, user_id, budget_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(Json(budget))
}

// Delete a budget
pub async fn delete_budget(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(budget_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
        .bind(budget_id)
        .bind(user_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("budget"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, FromRow)]
struct CurrentBudget {
    category_id: i32,
    category_name: String,
    amount: Decimal,
}

// Current-month budgets with actual spending per category. Spending counts
// every expense from the first of the month onward with no upper bound;
// future-dated rows within (or past) the month are included on purpose.
pub async fn current_month_budgets(
    State(db): State<Database>,
    Caller(user_id): Caller,
) -> Result<Json<Vec<BudgetStatus>>, ApiError> {
    let month_start = time::start_of_month(time::today());

    let budgets = sqlx::query_as::<_, CurrentBudget>(
        "SELECT b.category_id, c.name AS category_name, b.amount \
         FROM budgets b \
         JOIN categories c ON b.category_id = c.id \
         WHERE b.user_id = $1 AND b.month = $2 \
         ORDER BY b.created_at DESC",
    )
    .bind(user_id)
    .bind(month_start)
    .fetch_all(&db)
    .await?;

    let spending = sqlx::query_as::<_, CategorySpending>(
        "SELECT category_id, COALESCE(SUM(amount), 0) AS total \
         FROM transactions \
         WHERE user_id = $1 AND transaction_type = 'expense' AND date >= $2 \
         GROUP BY category_id",
    )
    .bind(user_id)
    .bind(month_start)
    .fetch_all(&db)
    .await?;

    let spent_by_category: HashMap<i32, Decimal> = spending
        .into_iter()
        .map(|row| (row.category_id, row.total))
        .collect();

    let statuses = budgets
        .into_iter()
        .map(|budget| {
            let actual_spending = spent_by_category
                .get(&budget.category_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            BudgetStatus::new(budget.category_name, budget.amount, actual_spending)
        })
        .collect::<Vec<_>>();

    Ok(Json(statuses))
}
