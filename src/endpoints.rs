//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The route to get and set the monthly budget.
pub const BUDGETS: &str = "/api/dashboard/budgets";
/// The route for the budget status shown on the dashboard's main card.
pub const MAIN_CARD: &str = "/api/dashboard/main-card";
/// The route for the month's spending against the budget.
pub const SPENDING: &str = "/api/dashboard/spending";
/// The route for the month's totals per category.
pub const SPENDING_BY_CATEGORY: &str = "/api/dashboard/spending/by-category";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/dashboard/transactions";
/// The route to get or update a single transaction.
pub const TRANSACTION: &str = "/api/dashboard/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes that the parameter is formatted like '{parameter_name}'.
/// If there is no parameter in `endpoint_path`, the function returns `endpoint_path` as is.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let Some(param_end) = endpoint_path[param_start..].find('}') else {
        return endpoint_path.to_owned();
    };

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_start + param_end + 1..]
    )
}
