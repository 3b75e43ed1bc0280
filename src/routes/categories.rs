use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::auth::Caller;
use crate::database::Database;
use crate::error::ApiError;
use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};

// Get all categories owned by the caller
pub async fn list_categories(
    State(db): State<Database>,
    Caller(user_id): Caller,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM categories WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&db)
    .await?;

    Ok(Json(categories))
}

// Create a new category
pub async fn create_category(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name", "Category name is required."));
    }

    let duplicate = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND user_id = $2)",
    )
    .bind(name)
    .bind(user_id)
    .fetch_one(&db)
    .await?;

    if duplicate {
        return Err(ApiError::validation(
            "name",
            "Category with this name already exists.",
        ));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (user_id, name) VALUES ($1, $2) RETURNING id, name, created_at",
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(&db)
    .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

// Get a single category by id
pub async fn get_category(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(category_id): Path<i32>,
) -> Result<Json<Category>, ApiError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM categories WHERE id = $1 AND user_id = $2",
    )
    .bind(category_id)
    .bind(user_id)
    .fetch_optional(&db)
    .await?
    .ok_or(ApiError::not_found("category"))?;

    Ok(Json(category))
}

// Update a category's name
pub async fn update_category(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(category_id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name", "Category name is required."));
    }

    let duplicate = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND user_id = $2 AND id != $3)",
    )
    .bind(name)
    .bind(user_id)
    .bind(category_id)
    .fetch_one(&db)
    .await?;

    if duplicate {
        return Err(ApiError::validation(
            "name",
            "Category with this name already exists.",
        ));
    }

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $1, updated_at = NOW() \
         WHERE id = $2 AND user_id = $3 RETURNING id, name, created_at",
    )
    .bind(name)
    .bind(category_id)
    .bind(user_id)
    .fetch_optional(&db)
    .await?
    .ok_or(ApiError::not_found("category"))?;

    Ok(Json(category))
}

// Delete a category; dependent transactions and budgets go with it
// (ON DELETE CASCADE on both foreign keys)
pub async fn delete_category(
    State(db): State<Database>,
    Caller(user_id): Caller,
    Path(category_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
        .bind(category_id)
        .bind(user_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("category"));
    }

    Ok(StatusCode::NO_CONTENT)
}
