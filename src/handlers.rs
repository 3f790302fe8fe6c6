use crate::aggregate::{build_history, hydration_at, summarize_day_local};
use crate::catalog::{DEFAULT_DRINK, catalog};
use crate::errors::AppError;
use crate::models::{
    AppData, CatalogItem, DayResponse, DrinkEntry, DrinkRequest, Gender, HistoryResponse, HydrationState,
    ProfileRequest, ReminderRequest, RemindersResponse, UserProfile, parse_hhmm,
};
use crate::reminder::upcoming;
use crate::state::AppState;
use crate::storage::persist_or_warn;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Local, NaiveDate, Utc};
use tracing::info;

const UPCOMING_REMINDERS: usize = 5;

pub async fn get_today(State(state): State<AppState>) -> Result<Json<HydrationState>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(hydration_at(&data, &Local::now())))
}

pub async fn get_day(State(state): State<AppState>, Path(date): Path<String>) -> Result<Json<DayResponse>, AppError> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be formatted as YYYY-MM-DD"))?;

    let data = state.data.lock().await;
    let summary = summarize_day_local(&data.entries, day);
    let hydration = HydrationState::compute(&data.profile, day, &summary);

    Ok(Json(DayResponse {
        hydration,
        entries: summary.entries.into_iter().cloned().collect(),
    }))
}

pub async fn get_history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_history(&data)))
}

pub async fn list_drinks(State(state): State<AppState>) -> Result<Json<Vec<DrinkEntry>>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(data.entries.clone()))
}

pub async fn add_drink(
    State(state): State<AppState>,
    Json(payload): Json<DrinkRequest>,
) -> Result<(StatusCode, Json<DrinkEntry>), AppError> {
    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(AppError::bad_request("amount must be a non-negative number of liters"));
    }

    let drink_type = payload
        .drink_type
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DRINK.to_string());
    let timestamp = payload.timestamp.unwrap_or_else(Utc::now);

    let mut data = state.data.lock().await;
    let entry = data.add_entry(drink_type, payload.amount, timestamp);
    persist_or_warn(&state.data_path, &data).await;

    info!(id = entry.id, drink_type = %entry.drink_type, amount = entry.amount, "drink logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_drink(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let removed = data
        .remove_entry(id)
        .ok_or_else(|| AppError::not_found(format!("no drink entry with id {id}")))?;
    persist_or_warn(&state.data_path, &data).await;

    info!(id = removed.id, "drink deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_profile(State(state): State<AppState>) -> Result<Json<UserProfile>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(data.profile.clone()))
}

pub async fn put_profile(
    State(state): State<AppState>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let mut data = state.data.lock().await;
    if let Some(age) = payload.age {
        data.profile.age = age;
    }
    if let Some(gender) = payload.gender {
        data.profile.gender = Gender::parse(&gender);
    }
    if let Some(weight) = payload.weight {
        data.profile.weight = weight;
    }
    persist_or_warn(&state.data_path, &data).await;

    info!(gender = %data.profile.gender, weight = data.profile.weight, "profile updated");
    Ok(Json(data.profile.clone()))
}

pub async fn get_reminders(State(state): State<AppState>) -> Result<Json<RemindersResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(reminders_response(&data)))
}

pub async fn put_reminders(
    State(state): State<AppState>,
    Json(payload): Json<ReminderRequest>,
) -> Result<Json<RemindersResponse>, AppError> {
    let start = payload.start.as_deref().map(parse_time).transpose()?;
    let end = payload.end.as_deref().map(parse_time).transpose()?;

    let mut data = state.data.lock().await;
    let settings = &mut data.reminders;
    if let Some(enabled) = payload.enabled {
        settings.enabled = enabled;
    }
    if let Some(interval) = payload.interval_minutes {
        settings.interval_minutes = interval;
    }
    if let Some(start) = start {
        settings.start = start;
    }
    if let Some(end) = end {
        settings.end = end;
    }
    persist_or_warn(&state.data_path, &data).await;
    state.reminder_wake.notify_one();

    info!(enabled = data.reminders.enabled, "reminder settings updated");
    Ok(Json(reminders_response(&data)))
}

pub async fn get_catalog() -> Json<Vec<CatalogItem>> {
    Json(catalog())
}

fn parse_time(value: &str) -> Result<chrono::NaiveTime, AppError> {
    parse_hhmm(value).ok_or_else(|| AppError::bad_request(format!("invalid time '{value}', expected HH:MM")))
}

fn reminders_response(data: &AppData) -> RemindersResponse {
    let upcoming = upcoming(&Local::now(), &data.reminders, UPCOMING_REMINDERS)
        .into_iter()
        .map(|at| at.with_timezone(&Utc))
        .collect();

    RemindersResponse {
        settings: data.reminders.clone(),
        upcoming,
    }
}
