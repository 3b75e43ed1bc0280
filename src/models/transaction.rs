use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use crate::error::ApiError;

/// The two transaction kinds. Stored as lowercase text in the
/// `transaction_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ApiError::validation(
                "transaction_type",
                "Transaction type must be \"income\" or \"expense\".",
            )),
        }
    }
}

/// Transaction row joined with its category name, the shape every
/// transaction endpoint returns.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionWithCategory {
    pub id: i32,
    pub category: i32,
    pub category_name: String,
    pub amount: Decimal,
    pub description: String,
    pub transaction_type: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub category: i32,
    pub amount: Decimal,
    pub description: String,
    pub transaction_type: String,
    pub date: String, // "YYYY-MM-DD"
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub category: Option<i32>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub transaction_type: Option<String>,
    pub date: Option<String>, // "YYYY-MM-DD"
}

#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_parses_exact_values_only() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("expense".parse::<TransactionType>().unwrap(), TransactionType::Expense);

        for bad in ["Income", "EXPENSE", "transfer", ""] {
            let err = bad.parse::<TransactionType>().unwrap_err();
            assert!(matches!(
                err,
                ApiError::Validation { field: "transaction_type", .. }
            ));
        }
    }

    #[test]
    fn transaction_type_round_trips_through_as_str() {
        for tt in [TransactionType::Income, TransactionType::Expense] {
            assert_eq!(tt.as_str().parse::<TransactionType>().unwrap(), tt);
        }
    }
}
