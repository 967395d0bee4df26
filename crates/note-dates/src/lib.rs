//! # note-dates
//!
//! Best-effort date and time normalization for notes.
//!
//! Free-form temporal expressions in English or Chinese ("tmr", "明天",
//! "next friday", "周三", "on 20 Oct", "5:30 p.m.") are turned into canonical
//! `YYYY-MM-DD` and `HH:MM` strings. Everything is a pure function of its
//! input and an explicit "today" anchor, so results are reproducible and safe
//! to compute from any thread.
//!
//! ## Modules
//!
//! - [`normalize`]: Heuristic date/time normalization and free-text extraction
//! - [`strict`]: Strict ISO date / `HH:MM` parsers for user-supplied fields
//! - [`schedule`]: Combine prompt extraction with LLM-provided date/time fields
//! - [`error`]: Error types

pub mod error;
pub mod normalize;
pub mod schedule;
pub mod strict;

pub use error::NormalizeError;
pub use normalize::{
    extract_date_from_text, extract_time_from_text, normalize_date, normalize_time, resolve_date,
    resolve_time, strip_edge_punct,
};
pub use schedule::{resolve_schedule, LlmNoteFields, Schedule};
pub use strict::{parse_event_date, parse_start_time};
