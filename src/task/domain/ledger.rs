//! Elapsed-time accounting over a task's start, pause and completion events.
//!
//! Time is always re-derived from the event log; the value cached on a task
//! is never read back as an input.

use super::{PauseInterval, Task};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HUNDREDTH_MINUTE: i64 = 600;
const HALF_HUNDREDTH_MINUTE_MILLIS: i64 = 300;

/// Gross, paused and net tracked time at a reference instant.
///
/// Durations are kept at millisecond precision; rounding to hundredths of a
/// minute happens only when rendering. Net is gross minus the unrounded
/// paused total, so `net_minutes_display` can differ by 0.01 from the
/// difference of the two rounded displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeSummary {
    gross_millis: i64,
    paused_millis: i64,
    net_millis: i64,
}

impl TimeSummary {
    /// Summary for a task with no usable events.
    pub const ZERO: Self = Self {
        gross_millis: 0,
        paused_millis: 0,
        net_millis: 0,
    };

    fn from_parts(gross: TimeDelta, paused: TimeDelta) -> Self {
        let gross_millis = gross.num_milliseconds();
        let paused_millis = paused.num_milliseconds();
        Self {
            gross_millis,
            paused_millis,
            net_millis: gross_millis - paused_millis,
        }
    }

    /// Time from the first start to the reference instant.
    #[must_use]
    pub fn gross(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.gross_millis)
    }

    /// Time spent paused within the gross window.
    #[must_use]
    pub fn paused(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.paused_millis)
    }

    /// Active time: gross minus paused.
    #[must_use]
    pub fn net(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.net_millis)
    }

    /// Net active time in hundredths of a minute, rounded half up.
    #[must_use]
    pub const fn net_hundredths_of_minute(&self) -> i64 {
        hundredths_of_minute(self.net_millis)
    }

    /// Net active minutes rounded to two decimals, e.g. `"20.00"`.
    #[must_use]
    pub fn net_minutes_display(&self) -> String {
        render_minutes(self.net_millis)
    }

    /// Paused minutes rounded to two decimals, e.g. `"5.00"`.
    #[must_use]
    pub fn paused_minutes_display(&self) -> String {
        render_minutes(self.paused_millis)
    }

    /// Label reported when a task completes, e.g. `"Minutes: 20"`.
    #[must_use]
    pub fn completion_label(&self) -> String {
        let rendered = render_minutes(self.net_millis);
        let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
        format!("Minutes: {trimmed}")
    }
}

const fn hundredths_of_minute(millis: i64) -> i64 {
    (millis + HALF_HUNDREDTH_MINUTE_MILLIS).div_euclid(MILLIS_PER_HUNDREDTH_MINUTE)
}

fn render_minutes(millis: i64) -> String {
    let hundredths = hundredths_of_minute(millis);
    format!("{}.{:02}", hundredths.div_euclid(100), hundredths.rem_euclid(100))
}

/// Derives tracked time from task event logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeLedger;

impl TimeLedger {
    /// Computes the task's tracked time as of `now`.
    ///
    /// A completed task is measured up to its completion instant regardless
    /// of `now`. Repeated calls with the same inputs return the same result.
    #[must_use]
    pub fn recompute(task: &Task, now: DateTime<Utc>) -> TimeSummary {
        Self::summarise(
            task.start_events(),
            task.pause_events(),
            task.complete_event(),
            now,
        )
    }

    /// Computes tracked time from raw event logs.
    ///
    /// Tracking begins at the first start event. An open pause counts as
    /// paused up to the reference instant. Logs with no start event, or whose
    /// first start lies after the reference instant, yield
    /// [`TimeSummary::ZERO`].
    #[must_use]
    pub fn summarise(
        start_events: &[DateTime<Utc>],
        pause_events: &[PauseInterval],
        complete_event: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> TimeSummary {
        let reference = complete_event.unwrap_or(now);
        let Some(&first_start) = start_events.first() else {
            return TimeSummary::ZERO;
        };
        let gross = reference - first_start;
        if gross < TimeDelta::zero() {
            return TimeSummary::ZERO;
        }

        let paused = pause_events
            .iter()
            .map(|interval| interval.duration_within(first_start, reference))
            .fold(TimeDelta::zero(), |total, duration| total + duration)
            .min(gross);

        TimeSummary::from_parts(gross, paused)
    }
}
