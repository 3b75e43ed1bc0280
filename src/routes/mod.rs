use uuid::Uuid;

use crate::database::Database;
use crate::error::ApiError;

pub mod budgets;
pub mod categories;
pub mod transactions;

/// Name of a category, if it exists and belongs to the user. Transactions
/// and budgets may only reference the caller's own categories; a foreign or
/// missing id reads as absent here.
pub(crate) async fn owned_category_name(
    db: &Database,
    user_id: Uuid,
    category_id: i32,
) -> Result<Option<String>, ApiError> {
    let name =
        sqlx::query_scalar::<_, String>("SELECT name FROM categories WHERE id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    Ok(name)
}
