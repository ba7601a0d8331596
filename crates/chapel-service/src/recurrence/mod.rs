//! Occurrence arithmetic for recurring events.
//!
//! ## Summary
//! Every function here is pure: rules and dates go in, new dates come out.
//! "Is this occurrence due" is decided at day granularity, while returned
//! occurrences keep the time-of-day of the rule's `base_date`.
//!
//! Occurrence `n` of a series is always computed from the anchor
//! (`base_date + n periods`), so a month-end anchor clamps per month
//! (Jan 31, Feb 28, Mar 31, ...) instead of drifting to the 28th.

use std::iter::FusedIterator;

use chapel_core::types::{Frequency, RecurrenceRule};
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

const WEEKLY_PERIOD_DAYS: u64 = 7;
const BIWEEKLY_PERIOD_DAYS: u64 = 14;
const MONTHS_PER_YEAR: u32 = 12;

/// ## Summary
/// Moves `date` forward by one period of `frequency`.
///
/// Monthly steps keep the day-of-month and clamp to the last day of the
/// target month; yearly steps clamp Feb 29 to Feb 28 in non-leap years.
///
/// Returns `None` for `Frequency::None` (there is no next period) or when
/// the result is outside the representable calendar.
#[must_use]
pub fn advance(date: NaiveDateTime, frequency: Frequency) -> Option<NaiveDateTime> {
    nth_occurrence(date, frequency, 1)
}

/// Occurrence `n` of a series anchored at `base`, with `n = 0` being `base` itself.
fn nth_occurrence(base: NaiveDateTime, frequency: Frequency, n: u32) -> Option<NaiveDateTime> {
    match frequency {
        Frequency::None => (n == 0).then_some(base),
        Frequency::Weekly => {
            base.checked_add_days(Days::new(WEEKLY_PERIOD_DAYS.checked_mul(u64::from(n))?))
        }
        Frequency::Biweekly => {
            base.checked_add_days(Days::new(BIWEEKLY_PERIOD_DAYS.checked_mul(u64::from(n))?))
        }
        // chrono clamps to the last valid day of the target month
        Frequency::Monthly => base.checked_add_months(Months::new(n)),
        Frequency::Yearly => {
            base.checked_add_months(Months::new(n.checked_mul(MONTHS_PER_YEAR)?))
        }
    }
}

/// Lower bound on the index of the first occurrence on or after `today`.
///
/// The returned index always points at an occurrence strictly before
/// `today` (or at the anchor), so scanning forward from it finds the first
/// due occurrence without stepping through the whole history.
fn periods_before(base: NaiveDate, today: NaiveDate, frequency: Frequency) -> u32 {
    if today <= base {
        return 0;
    }
    let elapsed_days = (today - base).num_days();
    let elapsed_months = i64::from(today.year() - base.year()) * i64::from(MONTHS_PER_YEAR)
        + i64::from(today.month0())
        - i64::from(base.month0());
    let periods = match frequency {
        Frequency::None => 0,
        Frequency::Weekly => elapsed_days / 7,
        Frequency::Biweekly => elapsed_days / 14,
        Frequency::Monthly => elapsed_months - 1,
        Frequency::Yearly => i64::from(today.year() - base.year()) - 1,
    };
    u32::try_from(periods.max(0)).unwrap_or(u32::MAX)
}

/// ## Summary
/// Iterator over the occurrences of a rule that are due on or after a reference day.
///
/// Created by [`occurrences`]. Ends when the series ends: after the single
/// occurrence of a one-off event, once an occurrence falls after
/// `repeat_until`, or when the calendar overflows.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurrenceRule,
    next_index: Option<u32>,
}

impl Iterator for Occurrences {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index?;
        self.next_index = if self.rule.frequency.is_recurring() {
            index.checked_add(1)
        } else {
            None
        };

        let Some(occurrence) = nth_occurrence(self.rule.base_date, self.rule.frequency, index)
        else {
            self.next_index = None;
            return None;
        };

        // repeat_until only bounds recurring series
        if self.rule.frequency.is_recurring()
            && self
                .rule
                .repeat_until
                .is_some_and(|until| occurrence.date() > until)
        {
            tracing::trace!(
                %occurrence,
                repeat_until = ?self.rule.repeat_until,
                "Series exhausted by repeat_until"
            );
            self.next_index = None;
            return None;
        }

        Some(occurrence)
    }
}

impl FusedIterator for Occurrences {}

/// ## Summary
/// Returns the occurrences of `rule` whose day is on or after `reference`'s day,
/// in ascending order.
#[must_use]
pub fn occurrences(rule: &RecurrenceRule, reference: NaiveDateTime) -> Occurrences {
    let today = reference.date();

    let next_index = if rule.frequency.is_recurring() {
        let mut index = periods_before(rule.base_date.date(), today, rule.frequency);
        loop {
            match nth_occurrence(rule.base_date, rule.frequency, index) {
                Some(occurrence) if occurrence.date() >= today => break Some(index),
                Some(_) => match index.checked_add(1) {
                    Some(next) => index = next,
                    None => break None,
                },
                None => break None,
            }
        }
    } else {
        (rule.base_date.date() >= today).then_some(0)
    };

    Occurrences {
        rule: *rule,
        next_index,
    }
}

/// ## Summary
/// Computes the earliest occurrence of `rule` that is still due on `reference`'s day.
///
/// One-off events return `base_date` until its day has passed. Recurring
/// events return the first period on or after the reference day, or `None`
/// when that period falls after `repeat_until`.
#[must_use]
pub fn next_occurrence(rule: &RecurrenceRule, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let next = occurrences(rule, reference).next();
    tracing::trace!(
        base_date = %rule.base_date,
        frequency = %rule.frequency,
        %reference,
        next = ?next,
        "Computed next occurrence"
    );
    next
}

/// ## Summary
/// Up to `limit` consecutive occurrences starting at [`next_occurrence`].
#[must_use]
pub fn upcoming_occurrences(
    rule: &RecurrenceRule,
    reference: NaiveDateTime,
    limit: usize,
) -> Vec<NaiveDateTime> {
    occurrences(rule, reference).take(limit).collect()
}

/// Whether `rule` has any occurrence left on or after `reference`'s day.
#[must_use]
pub fn is_active(rule: &RecurrenceRule, reference: NaiveDateTime) -> bool {
    next_occurrence(rule, reference).is_some()
}

/// Label shown next to an event's schedule.
#[must_use]
pub const fn describe_frequency(frequency: Frequency) -> &'static str {
    frequency.label()
}
