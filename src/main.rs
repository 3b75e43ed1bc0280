use axum::{
    http::StatusCode,
    routing::get,
    Router,
};
use dotenvy::dotenv;
use std::env;
use tower_http::cors::{Any, CorsLayer};

mod auth;
mod database;
mod error;
mod models;
mod routes;
mod time;

use routes::budgets::{
    create_budget, current_month_budgets, delete_budget, get_budget, list_budgets, update_budget,
};
use routes::categories::{
    create_category, delete_category, get_category, list_categories, update_category,
};
use routes::transactions::{
    create_transaction, delete_transaction, get_transaction, list_transactions,
    transaction_summary, update_transaction,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let pool = database::create_database_connection()
        .await
        .expect("failed to connect to PostgreSQL");

    database::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    // The frontend is served elsewhere; allow it to call this API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    async fn handle_404() -> StatusCode {
        StatusCode::NOT_FOUND
    }

    let app = Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/summary", get(transaction_summary))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/current_month", get(current_month_budgets))
        .route(
            "/budgets/:id",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .fallback(handle_404)
        .with_state(pool)
        .layer(cors);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    log::info!("server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");

    axum::serve(listener, app).await.expect("server error");
}
