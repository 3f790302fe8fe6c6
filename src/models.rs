use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    /// Case-insensitive, untrimmed; anything unrecognised (including "") is `Other`.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

impl From<&str> for Gender {
    fn from(value: &str) -> Self {
        Gender::parse(value)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrinkEntry {
    pub id: u64,
    pub drink_type: String,
    /// Liters.
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub gender: Gender,
    /// Kilograms.
    #[serde(default)]
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    #[serde(default = "default_start", with = "hhmm")]
    pub start: NaiveTime,
    #[serde(default = "default_end", with = "hhmm")]
    pub end: NaiveTime,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_minutes: default_interval_minutes(),
            start: default_start(),
            end: default_end(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_minutes() -> u32 {
    30
}

fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_end() -> NaiveTime {
    NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).ok_or_else(|| D::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub entries: Vec<DrinkEntry>,
    #[serde(default)]
    pub reminders: ReminderSettings,
    #[serde(default)]
    pub next_id: u64,
}

impl AppData {
    pub fn add_entry(&mut self, drink_type: String, amount: f64, timestamp: DateTime<Utc>) -> DrinkEntry {
        let floor = self.entries.iter().map(|entry| entry.id + 1).max().unwrap_or(0);
        let id = self.next_id.max(floor);
        self.next_id = id + 1;

        let entry = DrinkEntry {
            id,
            drink_type,
            amount,
            timestamp,
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn remove_entry(&mut self, id: u64) -> Option<DrinkEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }
}

#[derive(Debug, Deserialize)]
pub struct DrinkRequest {
    pub drink_type: Option<String>,
    pub amount: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    pub enabled: Option<bool>,
    pub interval_minutes: Option<u32>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HydrationState {
    pub date: String,
    pub consumed_today: f64,
    pub caffeinated_today: f64,
    pub base_goal: f64,
    pub daily_goal: f64,
    pub difference: f64,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub hydration: HydrationState,
    pub entries: Vec<DrinkEntry>,
}

#[derive(Debug, Serialize)]
pub struct HistoryPoint {
    pub date: String,
    pub consumed: f64,
    pub daily_goal: f64,
    pub goal_met: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub last_7_days: Vec<HistoryPoint>,
}

#[derive(Debug, Serialize)]
pub struct RemindersResponse {
    pub settings: ReminderSettings,
    pub upcoming: Vec<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CatalogItem {
    pub name: &'static str,
    pub caffeinated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parse_is_case_insensitive() {
        assert_eq!(Gender::parse("MALE"), Gender::Male);
        assert_eq!(Gender::parse("Female"), Gender::Female);
        assert_eq!(Gender::parse(" male "), Gender::Other);
        assert_eq!(Gender::parse(""), Gender::Other);
        assert_eq!(Gender::parse("nonbinary"), Gender::Other);
    }

    #[test]
    fn partial_document_loads_with_defaults() {
        let data: AppData = serde_json::from_str(r#"{"profile":{"weight":70.0}}"#).unwrap();
        assert_eq!(data.profile.weight, 70.0);
        assert_eq!(data.profile.gender, Gender::Other);
        assert!(data.entries.is_empty());
        assert_eq!(data.reminders, ReminderSettings::default());
    }

    #[test]
    fn reminder_times_serialize_as_hhmm() {
        let json = serde_json::to_value(ReminderSettings::default()).unwrap();
        assert_eq!(json["start"], "09:00");
        assert_eq!(json["end"], "21:00");
        assert_eq!(json["interval_minutes"], 30);
    }

    #[test]
    fn ids_keep_increasing_after_removal() {
        let mut data = AppData::default();
        let now = Utc::now();
        let first = data.add_entry("Water".into(), 0.5, now);
        let second = data.add_entry("Tea".into(), 0.2, now);
        assert!(data.remove_entry(second.id).is_some());
        let third = data.add_entry("Milk".into(), 0.3, now);
        assert_eq!(first.id, 0);
        assert_eq!(third.id, 2);
        assert!(data.remove_entry(99).is_none());
    }
}
