use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::time::month_label;

/// Month-to-date totals for `/transactions/summary`.
#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub month: String,
}

impl MonthlySummary {
    pub fn new(total_income: Decimal, total_expenses: Decimal, today: NaiveDate) -> Self {
        MonthlySummary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            month: month_label(today),
        }
    }
}

/// One row of `/budgets/current_month`: a budget compared against the
/// month-to-date expense total of its category.
#[derive(Debug, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub budget_amount: Decimal,
    pub actual_spending: Decimal,
    pub remaining: Decimal,
    pub percentage_used: f64,
}

impl BudgetStatus {
    pub fn new(category: String, budget_amount: Decimal, actual_spending: Decimal) -> Self {
        // percentage_used is defined as 0 for non-positive budgets so a zero
        // budget never divides by zero.
        let percentage_used = if budget_amount > Decimal::ZERO {
            (actual_spending / budget_amount * Decimal::from(100))
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        };

        BudgetStatus {
            category,
            budget_amount,
            actual_spending,
            remaining: budget_amount - actual_spending,
            percentage_used,
        }
    }
}

/// Month-to-date expense total for one category, grouped server-side.
#[derive(Debug, FromRow)]
pub struct CategorySpending {
    pub category_id: i32,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn summary_balance_is_income_minus_expenses() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let summary = MonthlySummary::new(dec!(100), dec!(40), today);

        assert_eq!(summary.total_income, dec!(100));
        assert_eq!(summary.total_expenses, dec!(40));
        assert_eq!(summary.balance, dec!(60));
        assert_eq!(summary.month, "August 2026");
    }

    #[test]
    fn summary_with_no_transactions_is_all_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let summary = MonthlySummary::new(Decimal::ZERO, Decimal::ZERO, today);

        assert_eq!(summary.balance, Decimal::ZERO);
        assert_eq!(summary.month, "January 2026");
    }

    #[test]
    fn budget_status_computes_remaining_and_percentage() {
        let status = BudgetStatus::new("Food".to_string(), dec!(200), dec!(80));

        assert_eq!(status.budget_amount, dec!(200));
        assert_eq!(status.actual_spending, dec!(80));
        assert_eq!(status.remaining, dec!(120));
        assert_eq!(status.percentage_used, 40.0);
    }

    #[test]
    fn overspent_budget_goes_negative_and_past_hundred_percent() {
        let status = BudgetStatus::new("Rent".to_string(), dec!(100), dec!(150));

        assert_eq!(status.remaining, dec!(-50));
        assert_eq!(status.percentage_used, 150.0);
    }

    #[test]
    fn zero_budget_yields_zero_percentage() {
        let status = BudgetStatus::new("Misc".to_string(), Decimal::ZERO, dec!(25));

        assert_eq!(status.percentage_used, 0.0);
        assert_eq!(status.remaining, dec!(-25));
    }

    #[test]
    fn negative_budget_also_yields_zero_percentage() {
        let status = BudgetStatus::new("Misc".to_string(), dec!(-10), dec!(5));
        assert_eq!(status.percentage_used, 0.0);
    }
}
