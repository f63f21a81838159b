//! A month's spending against the budget and its breakdown by category.

use axum::{
    Extension, Json,
    extract::{FromRef, OriginalUri, RawQuery, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Date, UtcOffset};

use crate::{
    AppState, Error,
    auth::UserId,
    budget::{MonthQuery, ProfileStore, calc_budget_vars},
    db::SQLiteStore,
    extract::parse_query,
    month::{MonthKey, month_to_range, resolve_month},
    timezone::{require_local_offset, today_at},
    transaction::{Category, TransactionStore, TransactionType},
};

/// The state needed for the spending endpoints.
#[derive(Debug, Clone)]
pub struct SpendingState {
    pub store: SQLiteStore,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Seoul".
    pub local_timezone: String,
}

impl FromRef<AppState> for SpendingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A month's expenses compared to the budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spending {
    pub month: MonthKey,
    pub target_amount: i64,
    pub total_expense: i64,
    pub remaining_amount: i64,
    /// Zero when no budget is set.
    pub spend_percent: i64,
}

/// A month's totals for each category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub month: MonthKey,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// One item per category, in [Category::ALL] order.
    pub items: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: i64,
    /// The share of the month's total, in `[0, 1]`.
    pub ratio: f64,
}

#[derive(Debug, Deserialize)]
struct ByCategoryQuery {
    month: Option<String>,
    #[serde(rename = "type")]
    transaction_type: Option<String>,
}

/// Get the spending summary for the month in the `month` query parameter,
/// or the current month if it is absent.
pub async fn get_spending_endpoint(
    State(state): State<SpendingState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let result = parse_query::<MonthQuery>(raw_query.as_deref()).and_then(|query| {
        let local_offset = require_local_offset(&state.local_timezone)?;

        get_spending(
            &state.store,
            &user_id,
            query.month.as_deref(),
            today_at(local_offset),
            local_offset,
        )
    });

    match result {
        Ok(spending) => Json(json!({ "ok": true, "data": spending })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

/// Get the per category totals of the transaction type in the `type` query
/// parameter for the month in the `month` query parameter.
pub async fn get_spending_by_category_endpoint(
    State(state): State<SpendingState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let result = parse_query::<ByCategoryQuery>(raw_query.as_deref()).and_then(|query| {
        let local_offset = require_local_offset(&state.local_timezone)?;

        get_spending_by_category(
            &state.store,
            &user_id,
            query.month.as_deref(),
            query.transaction_type.as_deref(),
            today_at(local_offset),
            local_offset,
        )
    });

    match result {
        Ok(breakdown) => Json(json!({ "ok": true, "data": breakdown })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

/// Compare a month's expenses to the user's budget.
///
/// # Errors
/// Returns [Error::InvalidRequest] if `month_param` is not a month key,
/// [Error::MissingProfile] if the user has no profile, or any error from the store.
pub fn get_spending(
    store: &(impl ProfileStore + TransactionStore),
    user_id: &UserId,
    month_param: Option<&str>,
    today: Date,
    local_offset: UtcOffset,
) -> Result<Spending, Error> {
    let month = resolve_month(month_param, today)?;
    let target_amount = store.get_monthly_budget(user_id)?;
    let total_expense = store.total_amount(
        user_id,
        TransactionType::Out,
        &month_to_range(month, local_offset),
    )?;

    let spend_percent = if target_amount > 0 {
        calc_budget_vars(target_amount, total_expense, 0).spend_percent
    } else {
        0
    };

    Ok(Spending {
        month,
        target_amount,
        total_expense,
        remaining_amount: target_amount.saturating_sub(total_expense),
        spend_percent,
    })
}

/// Total a month's transactions of one type per category.
///
/// Every category is listed, categories without transactions have an amount
/// and ratio of zero.
///
/// # Errors
/// Returns [Error::InvalidRequest] if `type_param` is absent or `month_param`
/// is not a month key, [Error::TypeMismatch] if `type_param` is not a
/// transaction type, or any error from the store.
pub fn get_spending_by_category(
    store: &impl TransactionStore,
    user_id: &UserId,
    month_param: Option<&str>,
    type_param: Option<&str>,
    today: Date,
    local_offset: UtcOffset,
) -> Result<CategoryBreakdown, Error> {
    let Some(type_param) = type_param else {
        return Err(Error::InvalidRequest("type must be OUT or IN".to_owned()));
    };
    let transaction_type: TransactionType = type_param.parse()?;
    let month = resolve_month(month_param, today)?;

    let totals = store.totals_by_category(
        user_id,
        transaction_type,
        &month_to_range(month, local_offset),
    )?;

    let amount_of = |category: Category| {
        totals
            .iter()
            .filter(|(total_category, _)| *total_category == category)
            .map(|(_, amount)| amount)
            .sum::<i64>()
    };
    let total: i64 = totals.iter().map(|(_, amount)| amount).sum();

    let items = Category::ALL
        .into_iter()
        .map(|category| {
            let amount = amount_of(category);
            let ratio = if total > 0 {
                amount as f64 / total as f64
            } else {
                0.0
            };

            CategoryTotal {
                category,
                amount,
                ratio,
            }
        })
        .collect();

    Ok(CategoryBreakdown {
        month,
        transaction_type,
        items,
    })
}
