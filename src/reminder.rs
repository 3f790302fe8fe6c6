//! Reminder schedule.
//!
//! Reminders fire every `interval_minutes` counted from the start of the
//! active window, and only while the window is open. A window whose start is
//! later than its end wraps past midnight.

use crate::aggregate::hydration_at;
use crate::models::{HydrationState, ReminderSettings};
use crate::state::AppState;
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone};
use tokio::select;
use tracing::{debug, info, instrument};

impl ReminderSettings {
    pub fn is_active_at(&self, time: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        if self.start <= self.end {
            self.start <= time && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }

    fn interval(&self) -> Option<Duration> {
        (self.interval_minutes > 0).then(|| Duration::minutes(i64::from(self.interval_minutes)))
    }
}

/// First reminder instant strictly after `now`, or `None` when reminders are off.
pub fn next_reminder_after<Tz: TimeZone>(now: &DateTime<Tz>, settings: &ReminderSettings) -> Option<DateTime<Tz>> {
    if !settings.enabled {
        return None;
    }
    let interval = settings.interval()?;
    let tz = now.timezone();
    let local_now = now.naive_local();
    let today = local_now.date();

    // Yesterday's window may still be open when it wraps midnight.
    for offset in -1..=2 {
        let day = today + Duration::days(offset);
        let window_start = day.and_time(settings.start);
        let window_end = if settings.start <= settings.end {
            day.and_time(settings.end)
        } else {
            (day + Duration::days(1)).and_time(settings.end)
        };

        let Some(slot) = next_slot(local_now, window_start, interval) else {
            continue;
        };
        if slot > window_end {
            continue;
        }
        if let Some(at) = tz.from_local_datetime(&slot).earliest() {
            return Some(at);
        }
    }

    None
}

fn next_slot(now: NaiveDateTime, window_start: NaiveDateTime, interval: Duration) -> Option<NaiveDateTime> {
    if now < window_start {
        return Some(window_start);
    }
    let elapsed = (now - window_start).num_seconds();
    let step = interval.num_seconds();
    let k = elapsed / step + 1;
    window_start.checked_add_signed(Duration::seconds(k * step))
}

pub fn upcoming<Tz: TimeZone>(now: &DateTime<Tz>, settings: &ReminderSettings, count: usize) -> Vec<DateTime<Tz>> {
    let mut out = Vec::with_capacity(count);
    let mut cursor = now.clone();
    while out.len() < count {
        let Some(next) = next_reminder_after(&cursor, settings) else {
            break;
        };
        cursor = next.clone();
        out.push(next);
    }
    out
}

/// Sleeps until the next reminder, logs it, and repeats. Settings updates
/// signal `state.reminder_wake` to force a reschedule.
pub async fn run_reminders(state: AppState) {
    run_reminders_with(state, Local::now, |_, hydration| log_reminder(&hydration)).await
}

/// `run_reminders` with an injected clock and reminder sink.
#[instrument(skip_all)]
pub async fn run_reminders_with<Tz, C, F>(state: AppState, clock: C, mut on_reminder: F)
where
    Tz: TimeZone,
    C: Fn() -> DateTime<Tz>,
    F: FnMut(DateTime<Tz>, HydrationState),
{
    let wake = state.reminder_wake.clone();
    let mut last: Option<DateTime<Tz>> = None;
    loop {
        let now = clock();
        // A wake-up a hair early must not fire the same slot twice.
        let from = match &last {
            Some(prev) if *prev > now => prev.clone(),
            _ => now.clone(),
        };
        let next = {
            let data = state.data.lock().await;
            next_reminder_after(&from, &data.reminders)
        };

        let Some(at) = next else {
            debug!("reminders disabled, waiting for settings change");
            wake.notified().await;
            continue;
        };

        let wait = (at.clone() - now).to_std().unwrap_or_default();
        debug!("next reminder in {}s", wait.as_secs());

        select! {
            () = tokio::time::sleep(wait) => {
                let hydration = {
                    let data = state.data.lock().await;
                    hydration_at(&data, &at)
                };
                last = Some(at.clone());
                on_reminder(at, hydration);
            }
            () = wake.notified() => debug!("reminder settings changed, rescheduling"),
        }
    }
}

fn log_reminder(hydration: &HydrationState) {
    info!(
        target: "reminder",
        consumed = hydration.consumed_today,
        daily_goal = hydration.daily_goal,
        remaining = hydration.difference,
        "Stay hydrated! Please don't forget to drink water."
    );
}
