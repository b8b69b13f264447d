//! Threshold crossing detection
//!
//! Remembers the last status seen per window so a notification fires once
//! per escalation instead of on every refresh.

use std::collections::HashMap;

use super::render::{clamp_percent, token_limits, StatusLevel};
use super::types::{QuotaResponse, QuotaWindow};

/// An escalation worth telling the user about
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaAlert {
    pub window: QuotaWindow,
    pub level: StatusLevel,
    pub percent: u8,
}

impl QuotaAlert {
    pub fn title(&self) -> &'static str {
        match self.level {
            StatusLevel::Danger => "Z.ai quota almost exhausted",
            _ => "Z.ai quota warning",
        }
    }

    pub fn body(&self) -> String {
        format!("{} is at {}%", self.window.label(), self.percent)
    }
}

/// Last status per window
#[derive(Debug, Clone, Default)]
pub struct AlertState {
    last_levels: HashMap<QuotaWindow, StatusLevel>,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one window's status, returning an alert only when it got worse
    pub fn observe(&mut self, window: QuotaWindow, percent: u8) -> Option<QuotaAlert> {
        let current = StatusLevel::from_percent(percent);
        let last = self
            .last_levels
            .insert(window, current)
            .unwrap_or(StatusLevel::Safe);

        if current > last {
            Some(QuotaAlert {
                window,
                level: current,
                percent,
            })
        } else {
            None
        }
    }

    /// Record every token limit of a snapshot
    pub fn observe_snapshot(&mut self, quota: &QuotaResponse) -> Vec<QuotaAlert> {
        token_limits(quota)
            .into_iter()
            .filter_map(|limit| self.observe(limit.window(), clamp_percent(limit.percentage)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quota::types::{LimitType, QuotaLimit};

    #[test]
    fn test_safe_to_warning_alerts_once() {
        let mut state = AlertState::new();
        let alert = state.observe(QuotaWindow::FiveHour, 75).unwrap();
        assert_eq!(alert.level, StatusLevel::Warning);
        assert_eq!(alert.body(), "5-Hour Quota is at 75%");
        assert!(state.observe(QuotaWindow::FiveHour, 80).is_none());
    }

    #[test]
    fn test_warning_to_danger() {
        let mut state = AlertState::new();
        state.observe(QuotaWindow::Weekly, 72);
        let alert = state.observe(QuotaWindow::Weekly, 91).unwrap();
        assert_eq!(alert.level, StatusLevel::Danger);
        assert_eq!(alert.title(), "Z.ai quota almost exhausted");
    }

    #[test]
    fn test_drop_then_rise_alerts_again() {
        let mut state = AlertState::new();
        state.observe(QuotaWindow::FiveHour, 95);
        assert!(state.observe(QuotaWindow::FiveHour, 10).is_none());
        assert!(state.observe(QuotaWindow::FiveHour, 92).is_some());
    }

    #[test]
    fn test_windows_tracked_separately() {
        let mut state = AlertState::new();
        assert!(state.observe(QuotaWindow::FiveHour, 75).is_some());
        assert!(state.observe(QuotaWindow::Monthly, 75).is_some());
    }

    #[test]
    fn test_observe_snapshot_skips_time_limits() {
        let quota = QuotaResponse {
            limits: vec![
                QuotaLimit {
                    limit_type: LimitType::TimeLimit,
                    unit: 5,
                    number: 1.0,
                    percentage: 99.0,
                    next_reset_time: 0,
                    usage: None,
                    current_value: None,
                    remaining: None,
                },
                QuotaLimit {
                    limit_type: LimitType::TokensLimit,
                    unit: 3,
                    number: 5.0,
                    percentage: 93.0,
                    next_reset_time: 0,
                    usage: None,
                    current_value: None,
                    remaining: None,
                },
            ],
            level: String::new(),
        };

        let mut state = AlertState::new();
        let alerts = state.observe_snapshot(&quota);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].window, QuotaWindow::FiveHour);

        assert!(state.observe_snapshot(&quota).is_empty());
    }
}
