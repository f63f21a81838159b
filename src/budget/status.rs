//! Classifies a month's budget status for the dashboard's main card.

use serde::Serialize;

/// The status shown on the main card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MainCardCode {
    /// No monthly budget has been set.
    #[serde(rename = "MAIN_CARD_NO_BUDGET")]
    NoBudget,
    /// Spending is close to or over the budget.
    #[serde(rename = "MAIN_CARD_THRESHOLD")]
    Threshold,
    /// Spending is outpacing the month.
    #[serde(rename = "MAIN_CARD_SPEED_CONTROL")]
    SpeedControl,
    /// Spending is comfortably behind the month.
    #[serde(rename = "MAIN_CARD_CRUISING")]
    Cruising,
    #[serde(rename = "MAIN_CARD_DEFAULT")]
    Default,
}

/// The percentages used by [decide_status].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainCardThresholds {
    /// Spending at or above this percentage of the budget is over budget.
    pub over_budget: i64,
    /// Spending at or above this percentage is a warning regardless of pace.
    pub strong_warning: i64,
    /// Spending at or above this percentage is a warning when not cruising.
    pub mild_warning: i64,
    /// Minimum lead of elapsed percent over spend percent to count as cruising.
    pub cruising_gap: i64,
}

impl Default for MainCardThresholds {
    fn default() -> Self {
        Self {
            over_budget: 100,
            strong_warning: 90,
            mild_warning: 80,
            cruising_gap: 10,
        }
    }
}

impl MainCardThresholds {
    /// Whether `mild_warning <= strong_warning <= over_budget` and none of
    /// the values are negative.
    pub fn is_valid(&self) -> bool {
        0 <= self.mild_warning
            && self.mild_warning <= self.strong_warning
            && self.strong_warning <= self.over_budget
            && 0 <= self.cruising_gap
    }
}

/// Decide the main card status. The first matching rule wins.
pub fn decide_status(
    target_amount: i64,
    elapsed_percent: i64,
    spend_percent: i64,
    thresholds: &MainCardThresholds,
) -> MainCardCode {
    if target_amount <= 0 {
        return MainCardCode::NoBudget;
    }

    if spend_percent >= thresholds.over_budget || spend_percent >= thresholds.strong_warning {
        return MainCardCode::Threshold;
    }

    if elapsed_percent < spend_percent {
        return MainCardCode::SpeedControl;
    }

    if elapsed_percent - spend_percent >= thresholds.cruising_gap {
        return MainCardCode::Cruising;
    }

    if spend_percent >= thresholds.mild_warning {
        return MainCardCode::Threshold;
    }

    MainCardCode::Default
}

#[cfg(test)]
mod tests {
    use super::{MainCardCode, MainCardThresholds, decide_status};

    fn decide(target_amount: i64, elapsed_percent: i64, spend_percent: i64) -> MainCardCode {
        decide_status(
            target_amount,
            elapsed_percent,
            spend_percent,
            &MainCardThresholds::default(),
        )
    }

    #[test]
    fn no_budget_wins_regardless_of_percentages() {
        for (elapsed, spend) in [(0, 0), (50, 95), (100, 500), (30, 50)] {
            assert_eq!(decide(0, elapsed, spend), MainCardCode::NoBudget);
            assert_eq!(decide(-1, elapsed, spend), MainCardCode::NoBudget);
        }
    }

    #[test]
    fn over_budget_is_threshold() {
        assert_eq!(decide(100, 100, 150), MainCardCode::Threshold);
    }

    #[test]
    fn strong_warning_fires_before_speed_control() {
        assert_eq!(decide(100, 50, 95), MainCardCode::Threshold);
    }

    #[test]
    fn spending_faster_than_time_is_speed_control() {
        assert_eq!(decide(100, 30, 50), MainCardCode::SpeedControl);
    }

    #[test]
    fn comfortably_under_pace_is_cruising() {
        assert_eq!(decide(100, 50, 30), MainCardCode::Cruising);
        assert_eq!(decide(100, 95, 85), MainCardCode::Cruising);
    }

    #[test]
    fn mild_warning_applies_when_not_cruising() {
        assert_eq!(decide(100, 88, 82), MainCardCode::Threshold);
    }

    #[test]
    fn default_when_on_pace() {
        assert_eq!(decide(100, 50, 45), MainCardCode::Default);
        assert_eq!(decide(100, 40, 40), MainCardCode::Default);
    }

    #[test]
    fn thresholds_are_configurable() {
        let thresholds = MainCardThresholds {
            cruising_gap: 30,
            ..Default::default()
        };

        assert_eq!(decide_status(100, 50, 30, &thresholds), MainCardCode::Default);
    }

    #[test]
    fn default_thresholds_are_valid() {
        assert!(MainCardThresholds::default().is_valid());
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let cases = [
            MainCardThresholds {
                mild_warning: 95,
                ..Default::default()
            },
            MainCardThresholds {
                strong_warning: 110,
                ..Default::default()
            },
            MainCardThresholds {
                cruising_gap: -1,
                ..Default::default()
            },
            MainCardThresholds {
                mild_warning: -5,
                ..Default::default()
            },
        ];

        for thresholds in cases {
            assert!(!thresholds.is_valid(), "accepted {thresholds:?}");
        }
    }

    #[test]
    fn codes_serialize_with_prefix() {
        let got = serde_json::to_string(&MainCardCode::SpeedControl).unwrap();

        assert_eq!(got, "\"MAIN_CARD_SPEED_CONTROL\"");
    }
}
