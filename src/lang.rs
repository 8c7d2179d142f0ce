//! Language-aware extraction: normalized dates, durations, part types.
//!
//! Enhanced parsing is available for English (`E`), Ukrainian (`K`, with
//! `U` accepted as the filename alias), and Polish (`P`). Unsupported
//! languages fall back to carrying source text verbatim.

use crate::schedule::SongRef;
use regex::Regex;
use std::sync::LazyLock;

/// Highest number in the current songbook.
const MAX_SONG_NUMBER: u16 = 162;

static SONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("valid song number pattern"));

static DEFAULT_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*min").expect("valid default minutes pattern"));

static PROFILES: LazyLock<[LanguageProfile; 3]> =
    LazyLock::new(|| [english(), ukrainian(), polish()]);

/// Regular expressions and month tables for one enhanced language.
pub(crate) struct LanguageProfile {
    code: &'static str,
    /// Month names (nominative and genitive forms where applicable),
    /// lowercase, mapped to month numbers.
    months: &'static [(&'static str, u8)],
    /// Captures the first day range of a Meeting Workbook week heading.
    ///
    /// English binds `(month, day, [end day])`;
    /// the others bind `(day, [end day], month)`.
    mwb_date: Regex,
    /// Captures a Watchtower study date line.
    ///
    /// English binds `(ordinal, month, day, [end day], year)`;
    /// the others bind `(ordinal, day, [end day], month, year)`.
    w_study_date: Regex,
    /// Duration anchored on the language's minutes marker.
    minutes: Regex,
}

impl LanguageProfile {
    fn month_number(&self, name: &str) -> Option<u8> {
        let lower = name.to_lowercase();
        self.months
            .iter()
            .find(|(month, _)| *month == lower)
            .map(|(_, number)| *number)
    }

    fn is_english(&self) -> bool {
        self.code == "E"
    }
}

fn english() -> LanguageProfile {
    LanguageProfile {
        code: "E",
        months: &[
            ("january", 1),
            ("february", 2),
            ("march", 3),
            ("april", 4),
            ("may", 5),
            ("june", 6),
            ("july", 7),
            ("august", 8),
            ("september", 9),
            ("october", 10),
            ("november", 11),
            ("december", 12),
        ],
        mwb_date: Regex::new(
            r"(?i)(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:-(\d{1,2}))?",
        )
        .expect("valid English week date pattern"),
        w_study_date: Regex::new(
            r"(?i)Study Article\s+(\d+):\s*(\w+)\s+(\d{1,2})(?:-(\d{1,2}))?,?\s*(\d{4})",
        )
        .expect("valid English study date pattern"),
        minutes: Regex::new(r"(\d+)\s*min\.?").expect("valid English minutes pattern"),
    }
}

fn ukrainian() -> LanguageProfile {
    LanguageProfile {
        code: "K",
        months: &[
            ("січня", 1),
            ("січень", 1),
            ("лютого", 2),
            ("лютий", 2),
            ("березня", 3),
            ("березень", 3),
            ("квітня", 4),
            ("квітень", 4),
            ("травня", 5),
            ("травень", 5),
            ("червня", 6),
            ("червень", 6),
            ("липня", 7),
            ("липень", 7),
            ("серпня", 8),
            ("серпень", 8),
            ("вересня", 9),
            ("вересень", 9),
            ("жовтня", 10),
            ("жовтень", 10),
            ("листопада", 11),
            ("листопад", 11),
            ("грудня", 12),
            ("грудень", 12),
        ],
        mwb_date: Regex::new(
            r"(?i)(\d{1,2})(?:[-–—](\d{1,2}))?\s+(січня|лютого|березня|квітня|травня|червня|липня|серпня|вересня|жовтня|листопада|грудня)",
        )
        .expect("valid Ukrainian week date pattern"),
        w_study_date: Regex::new(
            r"(?i)Стаття(?:\s+для\s+вивчення)?\s+(\d+).*?(\d{1,2})(?:[-–—](\d{1,2}))?\s+(січня|лютого|березня|квітня|травня|червня|липня|серпня|вересня|жовтня|листопада|грудня)\s+(\d{4})",
        )
        .expect("valid Ukrainian study date pattern"),
        minutes: Regex::new(r"(\d+)\s*хв\.?").expect("valid Ukrainian minutes pattern"),
    }
}

fn polish() -> LanguageProfile {
    LanguageProfile {
        code: "P",
        months: &[
            ("stycznia", 1),
            ("styczeń", 1),
            ("lutego", 2),
            ("luty", 2),
            ("marca", 3),
            ("marzec", 3),
            ("kwietnia", 4),
            ("kwiecień", 4),
            ("maja", 5),
            ("maj", 5),
            ("czerwca", 6),
            ("czerwiec", 6),
            ("lipca", 7),
            ("lipiec", 7),
            ("sierpnia", 8),
            ("sierpień", 8),
            ("września", 9),
            ("wrzesień", 9),
            ("października", 10),
            ("październik", 10),
            ("listopada", 11),
            ("listopad", 11),
            ("grudnia", 12),
            ("grudzień", 12),
        ],
        mwb_date: Regex::new(
            r"(?i)(\d{1,2})(?:-(\d{1,2}))?\s+(stycznia|lutego|marca|kwietnia|maja|czerwca|lipca|sierpnia|września|października|listopada|grudnia)",
        )
        .expect("valid Polish week date pattern"),
        w_study_date: Regex::new(
            r"(?i)Artykuł\s+do\s+studium\s+(\d+).*?(\d{1,2})(?:-(\d{1,2}))?\s+(\w+)\s+(\d{4})",
        )
        .expect("valid Polish study date pattern"),
        minutes: Regex::new(r"(\d+)\s*min\.?").expect("valid Polish minutes pattern"),
    }
}

/// Resolves the enhanced profile for a filename language tag.
///
/// Lookup is case-insensitive. `U`, the filename letter for Ukrainian,
/// aliases the `K` profile.
pub(crate) fn profile(language: &str) -> Option<&'static LanguageProfile> {
    let code = language.to_ascii_uppercase();
    let code = if code == "U" { "K" } else { code.as_str() };
    PROFILES.iter().find(|profile| profile.code == code)
}

/// Language codes with an enhanced profile.
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    PROFILES.iter().map(|profile| profile.code)
}

/// Applies the song-number rule to a text.
///
/// The first integer in the text becomes the value when it falls in
/// `1..=162`; otherwise the original text is retained. Empty input
/// yields `None`.
pub(crate) fn extract_song_ref(text: &str) -> Option<SongRef> {
    if text.is_empty() {
        return None;
    }

    match SONG_NUMBER
        .captures(text)
        .and_then(|captures| captures[1].parse::<u16>().ok())
    {
        Some(number) if (1..=MAX_SONG_NUMBER).contains(&number) => Some(SongRef::Number(number)),
        _ => Some(SongRef::Text(text.to_owned())),
    }
}

/// The song number in a text, or `None` when the song-number rule
/// yields free-form text.
pub(crate) fn extract_song_number(text: &str) -> Option<u16> {
    match extract_song_ref(text) {
        Some(SongRef::Number(number)) => Some(number),
        _ => None,
    }
}

/// Extracts a duration in minutes, anchored on the language's
/// minutes marker, falling back to `N min` for unprofiled languages.
pub(crate) fn extract_minutes(text: &str, profile: Option<&LanguageProfile>) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    let pattern = profile.map_or(&*DEFAULT_MINUTES, |profile| &profile.minutes);
    pattern
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
}

/// Normalizes a Meeting Workbook week heading into `YYYY/MM/DD`,
/// using the issue year and the first day of the matched range.
///
/// Returns `None` when the heading does not match the profile pattern,
/// in which case callers keep the source text.
pub(crate) fn normalize_week_date(
    raw: &str,
    year: i32,
    profile: &LanguageProfile,
) -> Option<String> {
    let captures = profile.mwb_date.captures(raw)?;

    let (day, month_name) = if profile.is_english() {
        (captures.get(2)?.as_str(), captures.get(1)?.as_str())
    } else {
        (captures.get(1)?.as_str(), captures.get(3)?.as_str())
    };

    let day: u8 = day.parse().ok()?;
    let month = profile.month_number(month_name)?;

    Some(format!("{year}/{month:02}/{day:02}"))
}

/// Normalizes a Watchtower study date line into `YYYY/MM/DD`.
///
/// Returns `None` when the line does not match the profile pattern,
/// in which case callers keep the source text.
pub(crate) fn normalize_study_date(raw: &str, profile: &LanguageProfile) -> Option<String> {
    let captures = profile.w_study_date.captures(raw)?;

    let (day, month_name) = if profile.is_english() {
        (captures.get(3)?.as_str(), captures.get(2)?.as_str())
    } else {
        (captures.get(2)?.as_str(), captures.get(4)?.as_str())
    };

    let day: u8 = day.parse().ok()?;
    let year: i32 = captures.get(5)?.as_str().parse().ok()?;
    let month = profile.month_number(month_name)?;

    Some(format!("{year}/{month:02}/{day:02}"))
}
