//! Month progress and budget metrics.

use serde::Serialize;
use time::Date;

use crate::month::MonthKey;

/// How far through a month "today" is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    /// Number of days of the month that have passed, including today.
    pub elapsed_days: u8,
    /// `elapsed_days` as a floored percentage of `total_days`, in `[0, 100]`.
    pub elapsed_percent: i64,
    /// Days left in the month after today.
    pub remaining_days: u8,
    /// Number of days in the month.
    pub total_days: u8,
}

/// Compute how much of `month` has elapsed as of `today`.
///
/// Past months are fully elapsed and future months have not started.
pub fn calc_elapsed(month: MonthKey, today: Date) -> Elapsed {
    let total_days = month.total_days();
    let current = MonthKey::containing(today);

    let elapsed_days = if current > month {
        total_days
    } else if current == month {
        today.day()
    } else {
        0
    }
    .min(total_days);

    let elapsed_percent = (i64::from(elapsed_days) * 100 / i64::from(total_days)).clamp(0, 100);
    let remaining_days = total_days.saturating_sub(elapsed_days);

    Elapsed {
        elapsed_days,
        elapsed_percent,
        remaining_days,
        total_days,
    }
}

/// Metrics derived from a budget and the amount spent against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVars {
    /// Floored percentage of the budget spent. Exceeds 100 when overspent.
    pub spend_percent: i64,
    /// Budget left over, negative when overspent.
    pub remaining_amount: i64,
    /// How much can be spent per remaining day without exceeding the budget.
    pub daily_recommended_amount: i64,
}

/// Compute the budget metrics for a month.
///
/// The caller must ensure `target_amount > 0`. The spend percentage
/// saturates at [i64::MAX] for expenses too large to scale by 100.
pub fn calc_budget_vars(target_amount: i64, total_expense: i64, remaining_days: u8) -> BudgetVars {
    let spend_percent = (i128::from(total_expense) * 100).div_euclid(i128::from(target_amount));
    let spend_percent = i64::try_from(spend_percent).unwrap_or(i64::MAX);
    let remaining_amount = target_amount.saturating_sub(total_expense);
    let daily_recommended_amount = remaining_amount
        .div_euclid(i64::from(remaining_days.max(1)))
        .max(0);

    BudgetVars {
        spend_percent,
        remaining_amount,
        daily_recommended_amount,
    }
}

#[cfg(test)]
mod elapsed_tests {
    use time::{Duration, macros::date};

    use crate::month::MonthKey;

    use super::calc_elapsed;

    fn month(key: &str) -> MonthKey {
        MonthKey::parse(key).unwrap()
    }

    #[test]
    fn past_month_is_fully_elapsed() {
        let got = calc_elapsed(month("2026-01-01"), date!(2026 - 02 - 10));

        assert_eq!(got.elapsed_days, 31);
        assert_eq!(got.elapsed_percent, 100);
        assert_eq!(got.remaining_days, 0);
        assert_eq!(got.total_days, 31);
    }

    #[test]
    fn past_year_is_fully_elapsed() {
        let got = calc_elapsed(month("2025-12-01"), date!(2026 - 01 - 01));

        assert_eq!(got.elapsed_percent, 100);
    }

    #[test]
    fn current_month_uses_day_of_month() {
        let got = calc_elapsed(month("2026-04-01"), date!(2026 - 04 - 12));

        assert_eq!(got.elapsed_days, 12);
        assert_eq!(got.elapsed_percent, 40);
        assert_eq!(got.remaining_days, 18);
        assert_eq!(got.total_days, 30);
    }

    #[test]
    fn elapsed_percent_is_floored() {
        // 10 / 31 = 32.25...%
        let got = calc_elapsed(month("2026-01-01"), date!(2026 - 01 - 10));

        assert_eq!(got.elapsed_percent, 32);
    }

    #[test]
    fn future_month_has_not_started() {
        let got = calc_elapsed(month("2026-03-01"), date!(2026 - 02 - 28));

        assert_eq!(got.elapsed_days, 0);
        assert_eq!(got.elapsed_percent, 0);
        assert_eq!(got.remaining_days, 31);
    }

    #[test]
    fn leap_february() {
        let got = calc_elapsed(month("2024-02-01"), date!(2024 - 02 - 29));

        assert_eq!(got.total_days, 29);
        assert_eq!(got.elapsed_percent, 100);
        assert_eq!(got.remaining_days, 0);
    }

    #[test]
    fn elapsed_percent_is_monotonic_within_month() {
        let target = month("2026-03-01");
        let mut today = date!(2026 - 03 - 01);
        let mut previous = calc_elapsed(target, today).elapsed_percent;

        while today < date!(2026 - 04 - 02) {
            today += Duration::days(1);
            let current = calc_elapsed(target, today).elapsed_percent;

            assert!(
                previous <= current,
                "elapsed percent decreased from {previous} to {current} on {today}"
            );
            previous = current;
        }
    }
}

#[cfg(test)]
mod budget_vars_tests {
    use super::{BudgetVars, calc_budget_vars};

    #[test]
    fn overspent_budget_recommends_nothing() {
        let got = calc_budget_vars(100_000, 150_000, 5);

        assert_eq!(
            got,
            BudgetVars {
                spend_percent: 150,
                remaining_amount: -50_000,
                daily_recommended_amount: 0,
            }
        );
    }

    #[test]
    fn zero_remaining_days_divides_by_one() {
        let got = calc_budget_vars(100_000, 40_000, 0);

        assert_eq!(got.spend_percent, 40);
        assert_eq!(got.remaining_amount, 60_000);
        assert_eq!(got.daily_recommended_amount, 60_000);
    }

    #[test]
    fn daily_recommendation_is_floored() {
        let got = calc_budget_vars(100_000, 0, 3);

        assert_eq!(got.daily_recommended_amount, 33_333);
    }

    #[test]
    fn spend_percent_is_floored() {
        let got = calc_budget_vars(300_000, 100_000, 10);

        assert_eq!(got.spend_percent, 33);
    }

    #[test]
    fn huge_expense_does_not_overflow() {
        let got = calc_budget_vars(100_000, 100_000_000_000_000_000, 5);

        assert_eq!(
            got,
            BudgetVars {
                spend_percent: 100_000_000_000_000,
                remaining_amount: -99_999_999_999_900_000,
                daily_recommended_amount: 0,
            }
        );
    }

    #[test]
    fn spend_percent_saturates() {
        let got = calc_budget_vars(1, i64::MAX, 0);

        assert_eq!(got.spend_percent, i64::MAX);
        assert_eq!(got.remaining_amount, 1 - i64::MAX);
        assert_eq!(got.daily_recommended_amount, 0);
    }
}
