use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BudgetWithCategory {
    pub id: i32,
    pub category: i32,
    pub category_name: String,
    pub amount: Decimal,
    pub month: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub category: i32,
    pub amount: Decimal,
    pub month: String, // "YYYY-MM-DD", normalized to the first of the month
}

#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    pub category: Option<i32>,
    pub amount: Option<Decimal>,
    pub month: Option<String>, // "YYYY-MM-DD"
}
