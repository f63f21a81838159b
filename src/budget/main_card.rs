//! The budget status card at the top of the dashboard.

use axum::{
    Extension, Json,
    extract::{FromRef, OriginalUri, RawQuery, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use time::{Date, UtcOffset};

use crate::{
    AppState, Error,
    auth::UserId,
    budget::{
        MainCardCode, MainCardThresholds, MonthQuery, ProfileStore, calc_budget_vars,
        calc_elapsed, decide_status,
    },
    db::SQLiteStore,
    extract::parse_query,
    month::{MonthKey, month_to_range, resolve_month},
    timezone::{require_local_offset, today_at},
    transaction::{TransactionStore, TransactionType},
};

/// The state needed for the main card.
#[derive(Debug, Clone)]
pub struct MainCardState {
    pub store: SQLiteStore,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Seoul".
    pub local_timezone: String,
    pub thresholds: MainCardThresholds,
}

impl FromRef<AppState> for MainCardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
            thresholds: state.main_card_thresholds.clone(),
        }
    }
}

/// The status of a month's budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainCard {
    pub month: MonthKey,
    pub code: MainCardCode,
    pub vars: MainCardVars,
}

/// The values the client interpolates into the main card message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MainCardVars {
    /// Sent as `{}` when there is no budget.
    NoBudget {},
    Budget(BudgetCardVars),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCardVars {
    pub elapsed_percent: i64,
    pub spend_percent: i64,
    pub remaining_amount: i64,
    pub remaining_days: u8,
    pub daily_recommended_amount: i64,
}

/// Get the main card for the month in the `month` query parameter, or the
/// current month if it is absent.
pub async fn get_main_card_endpoint(
    State(state): State<MainCardState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let result = parse_query::<MonthQuery>(raw_query.as_deref()).and_then(|query| {
        let local_offset = require_local_offset(&state.local_timezone)?;

        get_main_card(
            &state.store,
            &user_id,
            query.month.as_deref(),
            today_at(local_offset),
            local_offset,
            &state.thresholds,
        )
    });

    match result {
        Ok(main_card) => Json(json!({ "ok": true, "profileData": main_card })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

/// Decide the main card for a month.
///
/// The month's expenses are only queried when the user has a budget.
///
/// # Errors
/// Returns [Error::InvalidRequest] if `month_param` is not a month key,
/// [Error::MissingProfile] if the user has no profile, or any error from the store.
pub fn get_main_card(
    store: &(impl ProfileStore + TransactionStore),
    user_id: &UserId,
    month_param: Option<&str>,
    today: Date,
    local_offset: UtcOffset,
    thresholds: &MainCardThresholds,
) -> Result<MainCard, Error> {
    let month = resolve_month(month_param, today)?;
    let target_amount = store.get_monthly_budget(user_id)?;

    if target_amount <= 0 {
        return Ok(MainCard {
            month,
            code: MainCardCode::NoBudget,
            vars: MainCardVars::NoBudget {},
        });
    }

    let range = month_to_range(month, local_offset);
    tracing::debug!(
        "Main card for {month}: expenses from {} to {}",
        range.start_text(),
        range.end_text()
    );
    let total_expense = store.total_amount(user_id, TransactionType::Out, &range)?;

    let elapsed = calc_elapsed(month, today);
    let budget_vars = calc_budget_vars(target_amount, total_expense, elapsed.remaining_days);
    let code = decide_status(
        target_amount,
        elapsed.elapsed_percent,
        budget_vars.spend_percent,
        thresholds,
    );

    Ok(MainCard {
        month,
        code,
        vars: MainCardVars::Budget(BudgetCardVars {
            elapsed_percent: elapsed.elapsed_percent,
            spend_percent: budget_vars.spend_percent,
            remaining_amount: budget_vars.remaining_amount,
            remaining_days: elapsed.remaining_days,
            daily_recommended_amount: budget_vars.daily_recommended_amount,
        }),
    })
}

#[cfg(test)]
mod get_main_card_tests {
    use time::{UtcOffset, macros::date};

    use crate::{
        Error,
        auth::UserId,
        budget::{MainCardCode, MainCardThresholds, ProfileStore},
        test_utils::{create_test_transaction, get_test_state},
        transaction::{Category, TransactionType},
    };

    use super::{BudgetCardVars, MainCardVars, get_main_card};

    fn kst() -> UtcOffset {
        UtcOffset::from_hms(9, 0, 0).unwrap()
    }

    #[test]
    fn no_budget_skips_metrics() {
        let state = get_test_state();
        let user_id = UserId::new("alice");
        state.store.create_profile(&user_id, 0).unwrap();

        let got = get_main_card(
            &state.store,
            &user_id,
            None,
            date!(2026 - 02 - 17),
            kst(),
            &MainCardThresholds::default(),
        )
        .unwrap();

        assert_eq!(got.month.to_string(), "2026-02-01");
        assert_eq!(got.code, MainCardCode::NoBudget);
        assert_eq!(got.vars, MainCardVars::NoBudget {});
        assert_eq!(serde_json::to_string(&got.vars).unwrap(), "{}");
    }

    #[test]
    fn spending_ahead_of_month_is_speed_control() {
        let state = get_test_state();
        let user_id = UserId::new("alice");
        state.store.create_profile(&user_id, 1_000_000).unwrap();
        create_test_transaction(
            &state.store,
            &user_id,
            TransactionType::Out,
            Category::Shopping,
            500_000,
            "2026-04-05T12:00:00+09:00",
        );
        // Income and other months do not count towards spending.
        create_test_transaction(
            &state.store,
            &user_id,
            TransactionType::In,
            Category::Etc,
            3_000_000,
            "2026-04-05T12:00:00+09:00",
        );
        create_test_transaction(
            &state.store,
            &user_id,
            TransactionType::Out,
            Category::Shopping,
            900_000,
            "2026-03-31T23:59:59+09:00",
        );

        let got = get_main_card(
            &state.store,
            &user_id,
            Some("2026-04-01"),
            date!(2026 - 04 - 09),
            kst(),
            &MainCardThresholds::default(),
        )
        .unwrap();

        assert_eq!(got.code, MainCardCode::SpeedControl);
        assert_eq!(
            got.vars,
            MainCardVars::Budget(BudgetCardVars {
                elapsed_percent: 30,
                spend_percent: 50,
                remaining_amount: 500_000,
                remaining_days: 21,
                daily_recommended_amount: 23_809,
            })
        );
    }

    #[test]
    fn invalid_month_fails_before_store_access() {
        let state = get_test_state();

        let result = get_main_card(
            &state.store,
            &UserId::new("nobody"),
            Some("2026-02-15"),
            date!(2026 - 02 - 17),
            kst(),
            &MainCardThresholds::default(),
        );

        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn missing_profile_is_internal_error() {
        let state = get_test_state();

        let result = get_main_card(
            &state.store,
            &UserId::new("nobody"),
            None,
            date!(2026 - 02 - 17),
            kst(),
            &MainCardThresholds::default(),
        );

        assert_eq!(result, Err(Error::MissingProfile));
    }
}
