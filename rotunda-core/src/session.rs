//! Trading-session calendar used to pick cache lifetimes.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

/// Fixed-rule trading calendar: weekdays, regular session hours, exchange
/// timezone. Exchange holidays are not modelled; the worst case is a
/// shorter-than-necessary cache lifetime on a closed day.
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    tz: Tz,
    open: NaiveTime,
    close: NaiveTime,
    force: Option<bool>,
}

impl TradingCalendar {
    /// NYSE regular session: 09:30–16:00 America/New_York, Monday–Friday.
    #[must_use]
    pub fn nyse() -> Self {
        Self {
            tz: chrono_tz::America::New_York,
            open: NaiveTime::from_hms_opt(9, 30, 0).expect("valid time"),
            close: NaiveTime::from_hms_opt(16, 0, 0).expect("valid time"),
            force: None,
        }
    }

    /// A calendar that always reports the session open. For tests and
    /// deployments that want uniformly short lifetimes.
    #[must_use]
    pub fn always_open() -> Self {
        Self {
            force: Some(true),
            ..Self::nyse()
        }
    }

    /// A calendar that always reports the session closed.
    #[must_use]
    pub fn always_closed() -> Self {
        Self {
            force: Some(false),
            ..Self::nyse()
        }
    }

    /// Whether the session is open at instant `t`.
    #[must_use]
    pub fn is_open_at(&self, t: DateTime<Utc>) -> bool {
        if let Some(forced) = self.force {
            return forced;
        }
        let local = t.with_timezone(&self.tz);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let time = local.time();
        time >= self.open && time < self.close
    }

    /// Whether the session is open now.
    #[must_use]
    pub fn is_open_now(&self) -> bool {
        self.is_open_at(Utc::now())
    }
}

impl Default for TradingCalendar {
    fn default() -> Self {
        Self::nyse()
    }
}
