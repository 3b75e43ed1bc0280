use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::Caller;
use crate::database::Database;
use crate::error::ApiError;
use crate::models::summary::MonthlySummary;
use crate::models::transaction::{
    CreateTransactionRequest, TransactionListQuery, TransactionType, TransactionWithCategory,
    UpdateTransactionRequest,
};
use crate::routes::owned_category_name;
use crate::time;

const SELECT_WITH_CATEGORY: &str = "SELECT \
     t.id, \
     t.category_id AS category, \
     c.name AS category_name, \
     t.amount, \
     t.description, \
     t.transaction_type, \
     t.date, \
     t.created_at \
     FROM transactions t \
     JOIN categories c ON t.category_id = c.id";

/// The date-range filter only applies when both bounds are present;
/// a lone bound is ignored.
fn date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<Option<(NaiveDate, NaiveDate)>, ApiError> {
    match (start_date, end_date) {
        (Some(start), Some(end)) => {
            let start = time::parse_date("start_date", start)?;
            let end = time::parse_date("end_date", end)?;
            Ok(Some((start, end)))
        }
        _ => Ok(None),
    }
}

async fn fetch_transaction(
    db: &Database,
    user_id: Uuid,
    transaction_id: i32,
) -> Result<Option<TransactionWithCategory>, ApiError> {
    let sql = format!("{SELECT_WITH_CATEGORY} WHERE t.id = $1 AND t.user_id = $2");

    let transaction = sqlx::query_as::<_, TransactionWithCategory>(&sql)
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

    Ok(transaction)
}

// List the caller's transactions with optional date-range, type and
// category filters, newest first
pub async fn list_transactions(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<TransactionWithCategory>>, ApiError> {
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let transaction_type = query
        .transaction_type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose()?;

    let mut sql = format!("{SELECT_WITH_CATEGORY} WHERE t.user_id = $1");
    let mut param = 2;

    if range.is_some() {
        sql.push_str(&format!(" AND t.date >= ${} AND t.date <= ${}", param, param + 1));
        param += 2;
    }

    if transaction_type.is_some() {
        sql.push_str(&format!(" AND t.transaction_type = ${}", param));
        param += 1;
    }

    if query.category.is_some() {
        sql.push_str(&format!(" AND t.category_id = ${}", param));
    }

    sql.push_str(" ORDER BY t.date DESC, t.created_at DESC");

    let mut query_builder =
        sqlx::query_as::<_, TransactionWithCategory>(&sql).bind(user_id);

    if let Some((start, end)) = range {
        query_builder = query_builder.bind(start).bind(end);
    }

    if let Some(transaction_type) = transaction_type {
        query_builder = query_builder.bind(transaction_type.as_str());
    }

    if let Some(category_id) = query.category {
        query_builder = query_builder.bind(category_id);
    }

    let transactions = query_builder.fetch_all(&db).await?;

    Ok(Json(transactions))
}

// Create a new transaction
pub async fn create_transaction(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionWithCategory>), ApiError> {
    let description = payload.description.trim();
    if description.is_empty() {
        return Err(ApiError::validation("description", "Description is required."));
    }

    let transaction_type = payload.transaction_type.parse::<TransactionType>()?;
    let date = time::parse_date("date", &payload.date)?;

    // The category must exist and belong to the caller.
    owned_category_name(&db, user_id, payload.category)
        .await?
        .ok_or_else(|| ApiError::validation("category", "Category not found."))?;

    let transaction_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO transactions (user_id, category_id, amount, description, transaction_type, date) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(user_id)
    .bind(payload.category)
    .bind(payload.amount)
    .bind(description)
    .bind(transaction_type.as_str())
    .bind(date)
    .fetch_one(&db)
    .await?;

    let transaction = fetch_transaction(&db, user_id, transaction_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// Get a single transaction by id
pub async fn get_transaction(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(transaction_id): Path<i32>,
) -> Result<Json<TransactionWithCategory>, ApiError> {
    let transaction = fetch_transaction(&db, user_id, transaction_id)
        .await?
        .ok_or(ApiError::not_found("transaction"))?;

    Ok(Json(transaction))
}

// Partially update a transaction
pub async fn update_transaction(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(transaction_id): Path<i32>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionWithCategory>, ApiError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM transactions WHERE id = $1 AND user_id = $2)",
    )
    .bind(transaction_id)
    .bind(user_id)
    .fetch_one(&db)
    .await?;

    if !exists {
        return Err(ApiError::not_found("transaction"));
    }

    let transaction_type = payload
        .transaction_type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose()?;

    let date = payload
        .date
        .as_deref()
        .map(|value| time::parse_date("date", value))
        .transpose()?;

    let description = payload.description.as_deref().map(str::trim);
    if description.is_some_and(str::is_empty) {
        return Err(ApiError::validation("description", "Description is required."));
    }

    if let Some(category_id) = payload.category {
        owned_category_name(&db, user_id, category_id)
            .await?
            .ok_or_else(|| ApiError::validation("category", "Category not found."))?;
    }

    sqlx::query(
        "UPDATE transactions SET \
         category_id = COALESCE($1, category_id), \
         amount = COALESCE($2, amount), \
         description = COALESCE($3, description), \
         transaction_type = COALESCE($4, transaction_type), \
         date = COALESCE($5, date), \
         updated_at = NOW() \
         WHERE id = $6 AND user_id = $7",
    )
    .bind(payload.category)
    .bind(payload.amount)
    .bind(description)
    .bind(transaction_type.map(|t| t.as_str()))
    .bind(date)
    .bind(transaction_id)
    .bind(user_id)
    .execute(&db)
    .await?;

    let transaction = fetch_transaction(&db, user_id, transaction_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(Json(transaction))
}

// Delete a transaction
pub async fn delete_transaction(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(transaction_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
        .bind(transaction_id)
        .bind(user_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("transaction"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// Month-to-date income/expense totals. Everything from the first of the
// current month onward counts, future-dated rows included.
pub async fn transaction_summary(
    State(db): State<Database>,
    Caller(user_id): Caller,
) -> Result<Json<MonthlySummary>, ApiError> {
    let today = time::today();
    let since = time::start_of_month(today);

    let total_income = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions \
         WHERE user_id = $1 AND transaction_type = 'income' AND date >= $2",
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(&db)
    .await?;

    let total_expenses = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions \
         WHERE user_id = $1 AND transaction_type = 'expense' AND date >= $2",
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(&db)
    .await?;

    Ok(Json(MonthlySummary::new(total_income, total_expenses, today)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_needs_both_bounds() {
        assert_eq!(date_range(None, None).unwrap(), None);
        assert_eq!(date_range(Some("2026-08-01"), None).unwrap(), None);
        assert_eq!(date_range(None, Some("2026-08-31")).unwrap(), None);
    }

    #[test]
    fn date_range_parses_both_bounds() {
        let range = date_range(Some("2026-08-01"), Some("2026-08-31")).unwrap();
        assert_eq!(range, Some((date(2026, 8, 1), date(2026, 8, 31))));
    }

    #[test]
    fn date_range_rejects_malformed_bounds() {
        let err = date_range(Some("08/01/2026"), Some("2026-08-31")).unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "start_date", .. }));

        let err = date_range(Some("2026-08-01"), Some("never")).unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "end_date", .. }));
    }
}
