//! Daily hydration goal.
//!
//! The goal is `base_rate(gender) * weight` liters plus the volume of
//! caffeinated drinks taken that day. Caffeinated drinks still count toward
//! the consumed total, so they move the goal without changing the difference.

use crate::aggregate::DaySummary;
use crate::models::{Gender, HydrationState, UserProfile};
use chrono::NaiveDate;

/// Liters per kilogram of body weight.
pub fn base_rate(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 0.040,
        Gender::Female => 0.030,
        Gender::Other => 0.033,
    }
}

/// Non-positive weights are not rejected; they yield a goal <= caffeine volume.
pub fn daily_goal(weight: f64, gender: Gender, caffeinated: f64) -> f64 {
    base_rate(gender) * weight + caffeinated
}

/// Returns `(daily_goal, difference)`. Accepts a `Gender` or a raw gender string.
pub fn hydration_goal(weight: f64, gender: impl Into<Gender>, caffeinated: f64, consumed: f64) -> (f64, f64) {
    let goal = daily_goal(weight, gender.into(), caffeinated);
    (goal, goal - consumed)
}

impl HydrationState {
    pub fn compute(profile: &UserProfile, day: NaiveDate, summary: &DaySummary<'_>) -> Self {
        let base_goal = daily_goal(profile.weight, profile.gender, 0.0);
        let (goal, difference) = hydration_goal(profile.weight, profile.gender, summary.caffeinated, summary.consumed);
        Self {
            date: day.to_string(),
            consumed_today: summary.consumed,
            caffeinated_today: summary.caffeinated,
            base_goal,
            daily_goal: goal,
            difference,
        }
    }
}
