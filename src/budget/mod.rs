//! The monthly budget and the dashboard views computed from it.

mod budget_endpoint;
mod main_card;
mod metrics;
mod profile;
mod spending;
mod status;

use serde::Deserialize;

pub use budget_endpoint::{get_budget_endpoint, put_budget_endpoint};
pub use main_card::get_main_card_endpoint;
pub use metrics::{calc_budget_vars, calc_elapsed};
pub use profile::{ProfileStore, create_profile_table};
pub use spending::{get_spending_by_category_endpoint, get_spending_endpoint};
pub use status::{MainCardCode, MainCardThresholds, decide_status};

/// Query parameters for endpoints that show a single month.
#[derive(Debug, Deserialize)]
struct MonthQuery {
    /// The first day of the month, e.g. "2026-02-01". Defaults to the current month.
    month: Option<String>,
}
