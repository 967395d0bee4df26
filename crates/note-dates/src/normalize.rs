//! Best-effort normalization of free-form note dates and times.
//!
//! Turns bilingual (English/Chinese) temporal expressions, typed by a user or
//! returned as the `Date`/`Time` fields of an LLM extraction, into canonical
//! `YYYY-MM-DD` and `HH:MM` strings. All functions are pure: the caller
//! supplies the "today" anchor explicitly, so results never depend on when
//! they are computed.
//!
//! # Two families
//!
//! - [`normalize_date`] / [`normalize_time`] canonicalize a single field. When
//!   no heuristic matches they return the edge-trimmed input unchanged, so the
//!   caller keeps whatever the user wrote.
//! - [`extract_date_from_text`] / [`extract_time_from_text`] scan a whole
//!   sentence. When nothing is found they return `None`, meaning "no override".
//!
//! Neither family ever fails. A heuristic that cannot produce a valid
//! calendar value simply does not match.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;
use tracing::debug;

// ── Lexicon ─────────────────────────────────────────────────────────────────

/// Relative day terms and their offset from today, in days.
///
/// Order matters for extraction: the first term found in the text wins, so
/// forward-looking terms come first.
pub const RELATIVE_DAY_TERMS: &[(&str, i64)] = &[
    ("tomorrow", 1),
    ("tmr", 1),
    ("tomorow", 1),
    ("明天", 1),
    ("yesterday", -1),
    ("yday", -1),
    ("昨天", -1),
    ("today", 0),
    ("tonight", 0),
    ("今天", 0),
];

/// English weekday names.
pub const ENGLISH_WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Chinese weekday names in both `星期X` and `周X` forms. Matched as
/// substrings; the first entry found wins.
pub const CHINESE_WEEKDAYS: &[(&str, Weekday)] = &[
    ("星期一", Weekday::Mon),
    ("星期二", Weekday::Tue),
    ("星期三", Weekday::Wed),
    ("星期四", Weekday::Thu),
    ("星期五", Weekday::Fri),
    ("星期六", Weekday::Sat),
    ("星期日", Weekday::Sun),
    ("星期天", Weekday::Sun),
    ("周一", Weekday::Mon),
    ("周二", Weekday::Tue),
    ("周三", Weekday::Wed),
    ("周四", Weekday::Thu),
    ("周五", Weekday::Fri),
    ("周六", Weekday::Sat),
    ("周日", Weekday::Sun),
    ("周天", Weekday::Sun),
];

/// English month names, full forms ahead of abbreviations (plus "sept") so
/// the alternation takes the longest spelling.
pub const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sept", 9),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Punctuation trimmed from both ends of an expression, in addition to whitespace.
const EDGE_PUNCT: &[char] = &[',', '.', ';', ':', '!', '\'', '，', '。', '！', '？'];

/// Day-first and year-first numeric layouts, tried in order after every
/// keyword heuristic has missed. chrono's `%Y` takes one to four digits, so
/// each layout is paired with the shape its input must have first.
const NUMERIC_DATE_FORMATS: &[(&str, &str)] = &[
    ("%Y-%m-%d", r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$"),
    ("%d/%m/%Y", r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$"),
    ("%d-%m-%Y", r"^[0-9]{1,2}-[0-9]{1,2}-[0-9]{4}$"),
    ("%Y/%m/%d", r"^[0-9]{4}/[0-9]{1,2}/[0-9]{1,2}$"),
];

/// ISO 8601 datetime layouts whose date part is accepted.
const ISO_NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const ISO_OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

// ── Patterns ────────────────────────────────────────────────────────────────

static NUMERIC_DATE_SHAPES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    NUMERIC_DATE_FORMATS
        .iter()
        .map(|(fmt, shape)| (compile(shape), *fmt))
        .collect()
});

/// ISO dates and datetimes open with a four-digit year and two-digit fields.
static ISO_DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}"));

static IN_N_DAYS: LazyLock<Regex> = LazyLock::new(|| compile(r"in\s+([0-9]+)\s+day"));

static NEXT_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"next\s+({})", alternation(ENGLISH_WEEKDAYS))));

static WEEKDAY_WORD: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"\b({})\b", alternation(ENGLISH_WEEKDAYS))));

static ON_DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"\bon\s+([0-9]{{1,2}})(?:st|nd|rd|th)?\s*({})\b",
        alternation(MONTH_NAMES)
    ))
});

/// One pattern per relative term: ASCII terms must stand alone as words,
/// CJK terms match anywhere (CJK text has no word separators).
static RELATIVE_DAY_PATTERNS: LazyLock<Vec<(Regex, i64)>> = LazyLock::new(|| {
    RELATIVE_DAY_TERMS
        .iter()
        .map(|(term, offset)| {
            let escaped = regex::escape(term);
            let pattern = if term.is_ascii() {
                format!(r"\b{escaped}\b")
            } else {
                escaped
            };
            (compile(&pattern), *offset)
        })
        .collect()
});

static CLOCK_24H: LazyLock<Regex> = LazyLock::new(|| compile(r"^([0-9]{1,2}):([0-9]{2})$"));

static CLOCK_12H: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([0-9]{1,2})(?::([0-9]{2}))?\s*(am|pm)$"));

static CLOCK_COMPACT: LazyLock<Regex> = LazyLock::new(|| compile(r"^([0-9]{2})([0-9]{2})$"));

static DOTTED_MERIDIEM: LazyLock<Regex> =
    LazyLock::new(|| compile(r"([0-9]\s*)([ap])\.m\.?"));

/// `H:MM` with an optional meridiem; also covers bare 24-hour `HH:MM`.
static TEXT_CLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"[0-9]{1,2}:[0-9]{2}(?:\s*(?:am|pm)\b)?"));

static TEXT_HOUR_MERIDIEM: LazyLock<Regex> =
    LazyLock::new(|| compile(r"[0-9]{1,2}\s*(?:am|pm)\b"));

// ── Sanitization ────────────────────────────────────────────────────────────

/// Trim whitespace and edge punctuation from an expression.
///
/// Returns `""` for `None`. Interior punctuation is left alone.
///
/// # Examples
///
/// ```
/// use note_dates::strip_edge_punct;
///
/// assert_eq!(strip_edge_punct("  tomorrow!! "), "tomorrow");
/// assert_eq!(strip_edge_punct("，明天。"), "明天");
/// assert_eq!(strip_edge_punct("9, 10."), "9, 10");
/// assert_eq!(strip_edge_punct(None), "");
/// ```
pub fn strip_edge_punct<'a>(s: impl Into<Option<&'a str>>) -> &'a str {
    match s.into() {
        Some(s) => s.trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCT.contains(&c)),
        None => "",
    }
}

// ── normalize_date ──────────────────────────────────────────────────────────

/// An expression prepared for date matching.
struct DateInput<'a> {
    /// The caller's string, untouched.
    raw: &'a str,
    /// Edge-stripped and lowercased.
    cleaned: String,
}

impl<'a> DateInput<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            cleaned: strip_edge_punct(raw).to_lowercase(),
        }
    }
}

type DateMatcher = fn(&DateInput<'_>, NaiveDate) -> Option<NaiveDate>;

/// Heuristics for a single date field, most specific first.
const FIELD_DATE_MATCHERS: &[(&str, DateMatcher)] = &[
    ("iso", match_iso),
    ("relative_keyword", match_relative_keyword),
    ("in_n_days", match_in_n_days),
    ("next_weekday", match_next_weekday),
    ("bare_weekday", match_bare_weekday),
    ("chinese_weekday", match_chinese_weekday),
    ("day_month", match_day_month),
    ("numeric_format", match_numeric_format),
];

/// Heuristics for finding a date inside a sentence.
const TEXT_DATE_MATCHERS: &[(&str, DateMatcher)] = &[
    ("relative_keyword", find_relative_keyword),
    ("in_n_days", match_in_n_days),
    ("next_weekday", match_next_weekday),
    ("weekday_word", find_weekday_word),
    ("chinese_weekday", match_chinese_weekday),
    ("day_month", match_day_month),
];

/// Normalize a date field to `YYYY-MM-DD`.
///
/// Returns `None` for missing or blank input. When no heuristic matches,
/// returns the input with edge whitespace and punctuation removed, so
/// free-form text like "sometime next week" is preserved for the caller.
///
/// # Resolution order
///
/// 1. ISO 8601 date or datetime, after removing all whitespace ("2025 - 10 - 20")
/// 2. Relative keywords: "tomorrow", "tmr", "明天", "yesterday", "今天", ...
/// 3. "in N days"
/// 4. "next monday" (1-7 days ahead, never today)
/// 5. A bare weekday such as "friday" (0-6 days ahead, today included)
/// 6. Chinese weekdays "星期三" / "周五" (0-6 days ahead)
/// 7. "on 20 oct" (this year, or next year if already past)
/// 8. `YYYY-MM-DD`, `DD/MM/YYYY`, `DD-MM-YYYY`, `YYYY/MM/DD`
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use note_dates::normalize_date;
///
/// let today = NaiveDate::from_ymd_opt(2025, 10, 18).unwrap(); // Saturday
/// assert_eq!(normalize_date("tomorrow", today).as_deref(), Some("2025-10-19"));
/// assert_eq!(normalize_date("next Monday", today).as_deref(), Some("2025-10-20"));
/// assert_eq!(normalize_date("whenever!", today).as_deref(), Some("whenever"));
/// assert_eq!(normalize_date(None, today), None);
/// ```
pub fn normalize_date<'a>(input: impl Into<Option<&'a str>>, today: NaiveDate) -> Option<String> {
    let raw = input.into()?;
    if raw.trim().is_empty() {
        return None;
    }

    if let Some(date) = resolve_date(raw, today) {
        return Some(format_date(date));
    }

    debug!(input = %raw, "no date heuristic matched, passing through");
    let fallback = strip_edge_punct(raw);
    (!fallback.is_empty()).then(|| fallback.to_string())
}

/// Resolve a date field to a calendar date, without the passthrough fallback.
///
/// Uses the same heuristics, in the same order, as [`normalize_date`].
pub fn resolve_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    run_date_matchers(FIELD_DATE_MATCHERS, &DateInput::new(input), today)
}

/// Find a date expression anywhere in a sentence.
///
/// Uses the keyword, offset, weekday and "on <day> <month>" heuristics of
/// [`normalize_date`], matched anywhere in the text. ASCII keywords and
/// weekday names must be whole words. Returns `None` when nothing is found,
/// never a passthrough.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use note_dates::extract_date_from_text;
///
/// let today = NaiveDate::from_ymd_opt(2025, 10, 18).unwrap();
/// assert_eq!(
///     extract_date_from_text("Badminton tmr 5pm @polyu", today).as_deref(),
///     Some("2025-10-19")
/// );
/// assert_eq!(extract_date_from_text("no date here", today), None);
/// ```
pub fn extract_date_from_text<'a>(
    text: impl Into<Option<&'a str>>,
    today: NaiveDate,
) -> Option<String> {
    let text = text.into()?;
    if text.trim().is_empty() {
        return None;
    }
    run_date_matchers(TEXT_DATE_MATCHERS, &DateInput::new(text), today).map(format_date)
}

fn run_date_matchers(
    matchers: &[(&'static str, DateMatcher)],
    input: &DateInput<'_>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    matchers.iter().find_map(|(name, matcher)| {
        let date = matcher(input, today).filter(is_representable)?;
        debug!(matcher = *name, input = %input.raw, date = %date, "resolved date");
        Some(date)
    })
}

// ── Date matchers ───────────────────────────────────────────────────────────

fn match_iso(input: &DateInput<'_>, _today: NaiveDate) -> Option<NaiveDate> {
    let compact: String = input.raw.chars().filter(|c| !c.is_whitespace()).collect();
    parse_iso_date(&compact)
}

fn match_relative_keyword(input: &DateInput<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let offset = lookup(RELATIVE_DAY_TERMS, &input.cleaned)?;
    shift_days(today, offset)
}

fn find_relative_keyword(input: &DateInput<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let (_, offset) = RELATIVE_DAY_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&input.cleaned))?;
    shift_days(today, *offset)
}

fn match_in_n_days(input: &DateInput<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let caps = IN_N_DAYS.captures(&input.cleaned)?;
    let days: u64 = caps[1].parse().ok()?;
    today.checked_add_days(Days::new(days))
}

fn match_next_weekday(input: &DateInput<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let caps = NEXT_WEEKDAY.captures(&input.cleaned)?;
    let weekday = lookup(ENGLISH_WEEKDAYS, &caps[1])?;
    following(today, weekday)
}

fn match_bare_weekday(input: &DateInput<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let weekday = lookup(ENGLISH_WEEKDAYS, &input.cleaned)?;
    upcoming(today, weekday)
}

fn find_weekday_word(input: &DateInput<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let caps = WEEKDAY_WORD.captures(&input.cleaned)?;
    let weekday = lookup(ENGLISH_WEEKDAYS, &caps[1])?;
    upcoming(today, weekday)
}

fn match_chinese_weekday(input: &DateInput<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let (_, weekday) = CHINESE_WEEKDAYS
        .iter()
        .find(|(name, _)| input.cleaned.contains(name))?;
    upcoming(today, *weekday)
}

/// "on 20 oct", "on 3rd november". A date already past this year rolls to next
/// year; a day that does not exist in the target year (29 Feb) is no match.
fn match_day_month(input: &DateInput<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let caps = ON_DAY_MONTH.captures(&input.cleaned)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = lookup(MONTH_NAMES, &caps[2])?;

    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year < today {
        NaiveDate::from_ymd_opt(today.year().checked_add(1)?, month, day)
    } else {
        Some(this_year)
    }
}

fn match_numeric_format(input: &DateInput<'_>, _today: NaiveDate) -> Option<NaiveDate> {
    NUMERIC_DATE_SHAPES
        .iter()
        .filter(|(shape, _)| shape.is_match(&input.cleaned))
        .find_map(|(_, fmt)| NaiveDate::parse_from_str(&input.cleaned, fmt).ok())
}

// ── normalize_time ──────────────────────────────────────────────────────────

type TimeMatcher = fn(&str) -> Option<NaiveTime>;

const TIME_MATCHERS: &[(&str, TimeMatcher)] = &[
    ("24h", match_clock_24h),
    ("12h", match_clock_12h),
    ("compact", match_clock_compact),
];

/// Normalize a time field to 24-hour `HH:MM`.
///
/// Accepts `17:30`, `9:05`, `5pm`, `5:30 p.m.` and compact `1730`. Returns
/// `None` for missing or blank input, and the edge-trimmed input when nothing
/// matches or the time does not exist ("25:00").
///
/// # Examples
///
/// ```
/// use note_dates::normalize_time;
///
/// assert_eq!(normalize_time("5pm").as_deref(), Some("17:00"));
/// assert_eq!(normalize_time("12am").as_deref(), Some("00:00"));
/// assert_eq!(normalize_time("1730").as_deref(), Some("17:30"));
/// assert_eq!(normalize_time("after lunch.").as_deref(), Some("after lunch"));
/// ```
pub fn normalize_time<'a>(input: impl Into<Option<&'a str>>) -> Option<String> {
    let raw = input.into()?;
    if raw.trim().is_empty() {
        return None;
    }

    if let Some(time) = resolve_time(raw) {
        return Some(format_time(time));
    }

    debug!(input = %raw, "no time heuristic matched, passing through");
    let fallback = strip_edge_punct(raw);
    (!fallback.is_empty()).then(|| fallback.to_string())
}

/// Resolve a time field to a wall-clock time, without the passthrough fallback.
pub fn resolve_time(input: &str) -> Option<NaiveTime> {
    let cleaned = strip_edge_punct(input).to_lowercase().replace('.', "");
    TIME_MATCHERS.iter().find_map(|(name, matcher)| {
        let time = matcher(&cleaned)?;
        debug!(matcher = *name, input = %input, time = %time, "resolved time");
        Some(time)
    })
}

/// Find a clock time anywhere in a sentence.
///
/// Looks for `H:MM` (with an optional am/pm) first, then `H am|pm`. Matches
/// that are not real times ("25:00") are skipped. Returns `None` when
/// nothing is found.
///
/// # Examples
///
/// ```
/// use note_dates::extract_time_from_text;
///
/// assert_eq!(extract_time_from_text("Badminton tmr 5pm @polyu").as_deref(), Some("17:00"));
/// assert_eq!(extract_time_from_text("Lunch 12:30pm tomorrow").as_deref(), Some("12:30"));
/// assert_eq!(extract_time_from_text("no time here"), None);
/// ```
pub fn extract_time_from_text<'a>(text: impl Into<Option<&'a str>>) -> Option<String> {
    let text = text.into()?;
    let lowered = text.to_lowercase();
    let text = DOTTED_MERIDIEM.replace_all(&lowered, "${1}${2}m");

    [&*TEXT_CLOCK, &*TEXT_HOUR_MERIDIEM]
        .into_iter()
        .flat_map(|pattern| pattern.find_iter(&text))
        .find_map(|m| resolve_time(m.as_str()))
        .map(format_time)
}

// ── Time matchers ───────────────────────────────────────────────────────────

fn match_clock_24h(s: &str) -> Option<NaiveTime> {
    let caps = CLOCK_24H.captures(s)?;
    NaiveTime::from_hms_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, 0)
}

fn match_clock_12h(s: &str) -> Option<NaiveTime> {
    let caps = CLOCK_12H.captures(s)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if hour > 12 {
        return None;
    }

    let hour24 = match (hour, &caps[3]) {
        (12, "am") => 0,
        (h, "pm") if h != 12 => h + 12,
        (h, _) => h,
    };
    NaiveTime::from_hms_opt(hour24, minute, 0)
}

fn match_clock_compact(s: &str) -> Option<NaiveTime> {
    let caps = CLOCK_COMPACT.captures(s)?;
    NaiveTime::from_hms_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, 0)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Date part of an ISO 8601 date or datetime ("2025-10-20", "2025-10-20T09:30:00+08:00").
///
/// An offset is kept as given: the date is the local date at that offset.
pub(crate) fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if !ISO_DATE_PREFIX.is_match(s) {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ISO_OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date_naive())
        .or_else(|| {
            ISO_NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
}

fn alternation<T>(table: &[(&str, T)]) -> String {
    table
        .iter()
        .map(|(name, _)| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

fn shift_days(today: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset >= 0 {
        today.checked_add_days(days)
    } else {
        today.checked_sub_days(days)
    }
}

/// Days from `today` forward to the next `target`, 0 if today is `target`.
fn days_until(today: NaiveDate, target: Weekday) -> u64 {
    let current = today.weekday().num_days_from_monday();
    u64::from((target.num_days_from_monday() + 7 - current) % 7)
}

/// Nearest `target` on or after today.
fn upcoming(today: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(days_until(today, target)))
}

/// Nearest `target` strictly after today.
fn following(today: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let days = match days_until(today, target) {
        0 => 7,
        n => n,
    };
    today.checked_add_days(Days::new(days))
}

/// Years 1-9999, the range a four-digit `YYYY` can express.
fn is_representable(date: &NaiveDate) -> bool {
    (1..=9999).contains(&date.year())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

// ── Tests ───────────────────────────────────────────────────────────────────
