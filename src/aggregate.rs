use crate::catalog::is_caffeinated;
use crate::models::{AppData, DrinkEntry, HistoryPoint, HistoryResponse, HydrationState};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

/// Entries logged on one calendar day, with their totals.
#[derive(Debug)]
pub struct DaySummary<'a> {
    pub entries: Vec<&'a DrinkEntry>,
    pub consumed: f64,
    pub caffeinated: f64,
}

/// Entries whose timestamp falls on `day` in `tz`, in log order.
pub fn drinks_for_day<'a, Tz: TimeZone>(entries: &'a [DrinkEntry], day: NaiveDate, tz: &Tz) -> Vec<&'a DrinkEntry> {
    entries
        .iter()
        .filter(|entry| entry.timestamp.with_timezone(tz).date_naive() == day)
        .collect()
}

pub fn sum_for_day<Tz: TimeZone>(entries: &[DrinkEntry], day: NaiveDate, tz: &Tz) -> f64 {
    drinks_for_day(entries, day, tz).iter().map(|entry| entry.amount).sum()
}

pub fn caffeinated_for_day<Tz: TimeZone>(entries: &[DrinkEntry], day: NaiveDate, tz: &Tz) -> f64 {
    drinks_for_day(entries, day, tz)
        .iter()
        .filter(|entry| is_caffeinated(&entry.drink_type))
        .map(|entry| entry.amount)
        .sum()
}

pub fn summarize_day<'a, Tz: TimeZone>(entries: &'a [DrinkEntry], day: NaiveDate, tz: &Tz) -> DaySummary<'a> {
    DaySummary {
        entries: drinks_for_day(entries, day, tz),
        consumed: sum_for_day(entries, day, tz),
        caffeinated: caffeinated_for_day(entries, day, tz),
    }
}

/// Hydration for the calendar day `now` falls on, in `now`'s zone.
pub fn hydration_at<Tz: TimeZone>(data: &AppData, now: &DateTime<Tz>) -> HydrationState {
    let day = now.date_naive();
    let summary = summarize_day(&data.entries, day, &now.timezone());
    HydrationState::compute(&data.profile, day, &summary)
}

pub fn summarize_day_local(entries: &[DrinkEntry], day: NaiveDate) -> DaySummary<'_> {
    summarize_day(entries, day, &Local)
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

pub fn build_history(data: &AppData) -> HistoryResponse {
    build_history_at(today_local(), data, &Local)
}

pub fn build_history_at<Tz: TimeZone>(today: NaiveDate, data: &AppData, tz: &Tz) -> HistoryResponse {
    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let summary = summarize_day(&data.entries, date, tz);
        let state = HydrationState::compute(&data.profile, date, &summary);
        last_7_days.push(HistoryPoint {
            date: state.date,
            consumed: state.consumed_today,
            daily_goal: state.daily_goal,
            goal_met: state.daily_goal > 0.0 && state.difference <= 0.0,
        });
    }

    HistoryResponse { last_7_days }
}
