//! Wall-clock handling pinned to the site's configured time zone.

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
    Utc,
};
use chrono_tz::Tz;

use chapel_core::config::ScheduleConfig;
use chapel_core::error::CoreResult;

/// ## Summary
/// Converts between instants and the wall-clock values the recurrence engine works on.
///
/// Event dates are stored as naive wall-clock times; all day truncation
/// happens in this single zone rather than the host's local zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleClock {
    tz: Tz,
}

impl ScheduleClock {
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// ## Summary
    /// Builds a clock from the `schedule` config section.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the configured zone is unknown.
    pub fn from_config(config: &ScheduleConfig) -> CoreResult<Self> {
        Ok(Self::new(config.time_zone()?))
    }

    #[must_use]
    pub const fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Current wall-clock time in the configured zone.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.wall_clock(Utc::now())
    }

    #[must_use]
    pub fn wall_clock(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }

    /// Midnight at the start of `date`, used for date-only reference overrides.
    #[must_use]
    pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
    }

    /// ## Summary
    /// Attaches the configured zone to a wall-clock value.
    ///
    /// Ambiguous times (clocks turned back) resolve to the earlier instant.
    /// Times inside a DST gap are moved forward by one hour.
    #[must_use]
    pub fn localize(&self, wall_clock: NaiveDateTime) -> DateTime<FixedOffset> {
        let resolved = match self.tz.from_local_datetime(&wall_clock) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
            LocalResult::None => {
                tracing::trace!(%wall_clock, tz = %self.tz, "Wall-clock time falls in a DST gap");
                wall_clock
                    .checked_add_signed(TimeDelta::hours(1))
                    .and_then(|shifted| self.tz.from_local_datetime(&shifted).earliest())
                    .unwrap_or_else(|| self.tz.from_utc_datetime(&wall_clock))
            }
        };
        resolved.fixed_offset()
    }
}
