//! Application router configuration. Every API route requires a bearer token.

use axum::{
    Router,
    extract::OriginalUri,
    middleware,
    response::Response,
    routing::get,
};

use crate::{
    AppState, Error,
    auth::auth_guard,
    budget::{
        get_budget_endpoint, get_main_card_endpoint, get_spending_by_category_endpoint,
        get_spending_endpoint, put_budget_endpoint,
    },
    endpoints,
    transaction::{
        create_transaction_endpoint, get_transaction_endpoint, get_transactions_endpoint,
        patch_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            endpoints::BUDGETS,
            get(get_budget_endpoint).put(put_budget_endpoint),
        )
        .route(endpoints::MAIN_CARD, get(get_main_card_endpoint))
        .route(endpoints::SPENDING, get(get_spending_endpoint))
        .route(
            endpoints::SPENDING_BY_CATEGORY,
            get(get_spending_by_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).patch(patch_transaction_endpoint),
        )
        // route_layer so that unknown routes get a 404 rather than a 401.
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes.fallback(get_404_not_found).with_state(state)
}

async fn get_404_not_found(OriginalUri(uri): OriginalUri) -> Response {
    Error::NotFound("Route not found".to_owned()).into_problem_response(uri.path())
}
