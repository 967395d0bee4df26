//! Resolve the date and time of an LLM-generated note.
//!
//! The LLM extraction call returns structured fields (`Title`, `Notes`,
//! `Tags`, and optionally `Date` / `Time`). Its `Date` is often still
//! relative ("tomorrow") or loosely formatted ("2025 - 10 - 20"). An explicit
//! expression in the user's own prompt is more trustworthy, so it takes
//! precedence when present.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NormalizeError, Result};
use crate::normalize::{
    extract_date_from_text, extract_time_from_text, normalize_date, normalize_time,
};

/// Structured fields returned by the note extraction LLM call.
///
/// Every key is optional; a `null` value is treated like a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmNoteFields {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
    #[serde(rename = "Tags", default)]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Time", default)]
    pub time: Option<String>,
}

impl LlmNoteFields {
    /// Decode the JSON object produced by the extraction call.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::InvalidFields`] if the payload is not a JSON
    /// object of the expected shape.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| NormalizeError::InvalidFields(e.to_string()))
    }
}

/// The resolved date and time of a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    /// `YYYY-MM-DD`, free-form passthrough text, or `None`.
    pub date: Option<String>,
    /// `HH:MM`, free-form passthrough text, or `None`.
    pub time: Option<String>,
}

/// Resolve the date and time for a note generated from `prompt`.
///
/// For each of date and time, an expression found in the prompt wins;
/// otherwise the LLM-provided field is normalized (passthrough included).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use note_dates::schedule::{resolve_schedule, LlmNoteFields};
///
/// let today = NaiveDate::from_ymd_opt(2025, 10, 18).unwrap();
/// let fields = LlmNoteFields::from_json(r#"{"Title": "Badminton", "Date": "2025-10-25", "Time": "17:00"}"#).unwrap();
///
/// let schedule = resolve_schedule("Badminton tmr 5pm @polyu", &fields, today);
/// assert_eq!(schedule.date.as_deref(), Some("2025-10-19"));
/// assert_eq!(schedule.time.as_deref(), Some("17:00"));
/// ```
pub fn resolve_schedule(prompt: &str, fields: &LlmNoteFields, today: NaiveDate) -> Schedule {
    let date = match extract_date_from_text(prompt, today) {
        Some(date) => {
            debug!(date = %date, "date taken from prompt");
            Some(date)
        }
        None => normalize_date(fields.date.as_deref(), today),
    };

    let time = match extract_time_from_text(prompt) {
        Some(time) => {
            debug!(time = %time, "time taken from prompt");
            Some(time)
        }
        None => normalize_time(fields.time.as_deref()),
    };

    Schedule { date, time }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()
    }

    fn fields(date: Option<&str>, time: Option<&str>) -> LlmNoteFields {
        LlmNoteFields {
            date: date.map(str::to_string),
            time: time.map(str::to_string),
            ..Default::default()
        }
    }

    // ── LlmNoteFields tests ─────────────────────────────────────────────

    #[test]
    fn test_fields_full_payload() {
        let payload = r#"{
            "Title": "Badminton at PolyU",
            "Notes": "Remember to play badminton at 5pm tomorrow at PolyU.",
            "Tags": ["badminton", "sports"],
            "Date": "tomorrow",
            "Time": "17:00"
        }"#;
        let parsed = LlmNoteFields::from_json(payload).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Badminton at PolyU"));
        assert_eq!(parsed.tags, Some(vec!["badminton".to_string(), "sports".to_string()]));
        assert_eq!(parsed.date.as_deref(), Some("tomorrow"));
        assert_eq!(parsed.time.as_deref(), Some("17:00"));
    }

    #[test]
    fn test_fields_optional_keys_and_nulls() {
        let parsed = LlmNoteFields::from_json(r#"{"Title": "Groceries", "Date": null}"#).unwrap();
        assert_eq!(parsed.date, None);
        assert_eq!(parsed.time, None);
        assert_eq!(parsed.tags, None);
    }

    #[test]
    fn test_fields_invalid_payload() {
        let err = LlmNoteFields::from_json("```json {}```").unwrap_err().to_string();
        assert!(err.contains("Invalid note fields"), "got: {err}");
    }

    // ── resolve_schedule tests ──────────────────────────────────────────

    #[test]
    fn test_prompt_overrides_llm_fields() {
        let llm = fields(Some("2025-10-25"), Some("09:00"));
        let schedule = resolve_schedule("Badminton tmr 5pm @polyu", &llm, today());
        assert_eq!(schedule.date.as_deref(), Some("2025-10-19"));
        assert_eq!(schedule.time.as_deref(), Some("17:00"));
    }

    #[test]
    fn test_llm_fields_used_when_prompt_is_silent() {
        let llm = fields(Some("2025 - 11 - 02"), Some("7:30 pm"));
        let schedule = resolve_schedule("Dinner with Sam", &llm, today());
        assert_eq!(schedule.date.as_deref(), Some("2025-11-02"));
        assert_eq!(schedule.time.as_deref(), Some("19:30"));
    }

    #[test]
    fn test_date_and_time_resolve_independently() {
        let llm = fields(Some("friday"), Some("10am"));
        let schedule = resolve_schedule("Dentist 3:15pm", &llm, today());
        assert_eq!(schedule.date.as_deref(), Some("2025-10-24"));
        assert_eq!(schedule.time.as_deref(), Some("15:15"));
    }

    #[test]
    fn test_llm_passthrough_and_missing_fields() {
        let llm = fields(Some("end of the month"), None);
        let schedule = resolve_schedule("Pay rent", &llm, today());
        assert_eq!(schedule.date.as_deref(), Some("end of the month"));
        assert_eq!(schedule.time, None);
    }

    #[test]
    fn test_schedule_serializes_lowercase_keys() {
        let schedule = Schedule {
            date: Some("2025-10-19".to_string()),
            time: None,
        };
        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, r#"{"date":"2025-10-19","time":null}"#);
    }
}
