//! Prayer time extraction from the Habous HTML page
//!
//! The ministry endpoint returns a small HTML fragment containing a
//! `<table class="horaire">` whose rows hold label/value cell pairs, three
//! pairs per row. This module locates that table and turns it into a
//! [`PrayerTimeSet`]. Parsing is pure: identical input always yields the
//! same result, and no retry or network logic lives here.

use chrono::{NaiveDate, NaiveTime};
use scraper::{Html, Selector};
use thiserror::Error;

use super::{Prayer, PrayerTimeSet, PrayerTimes, DISPLAY_ORDER};

/// Errors that can occur while extracting times from a fetched page
#[derive(Debug, Error)]
pub enum ParseError {
    /// The page does not contain the expected times table
    #[error("times table not found in page")]
    MissingTable,

    /// One of the six expected markers is absent
    #[error("marker {0} not found in times table")]
    MissingMarker(&'static str),

    /// A time value does not match the 24-hour HH:MM pattern
    #[error("invalid time value: '{0}'")]
    InvalidTime(String),

    /// The five prayers are not monotonically non-decreasing
    #[error("extracted prayer times are out of order")]
    OutOfOrder,
}

/// Extract a full set of prayer times from the Habous page markup.
///
/// Labels are matched tolerantly: surrounding whitespace and trailing colons
/// are ignored, Arabic labels are matched first and the French spellings
/// used elsewhere on the site are accepted as a fallback. All six markers
/// must be present with valid `HH:MM` values or extraction fails.
///
/// # Arguments
/// * `html` - Raw page markup as returned by the fetcher
/// * `city_id` - Registry id of the city the page was fetched for
/// * `date` - Calendar date the times apply to (the endpoint only ever
///   publishes the current day)
///
/// # Returns
/// * `Ok(PrayerTimeSet)` with all six times
/// * `Err(ParseError)` if the table, a marker, or a valid time is missing
pub fn extract_times(
    html: &str,
    city_id: &str,
    date: NaiveDate,
) -> Result<PrayerTimeSet, ParseError> {
    let document = Html::parse_document(html);

    // Static selectors, cannot fail to parse.
    let table_selector =
        Selector::parse("table.horaire").map_err(|_| ParseError::MissingTable)?;
    let row_selector = Selector::parse("tr").map_err(|_| ParseError::MissingTable)?;
    let cell_selector = Selector::parse("td").map_err(|_| ParseError::MissingTable)?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ParseError::MissingTable)?;

    let mut found: [Option<NaiveTime>; 6] = [None; 6];

    for row in table.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>())
            .collect();

        // Rows hold label/value pairs; anything else is decoration.
        if cells.is_empty() || cells.len() % 2 != 0 {
            continue;
        }

        for pair in cells.chunks(2) {
            let Some(prayer) = match_label(&pair[0]) else {
                continue;
            };
            let time = parse_time(&pair[1])?;
            if let Some(slot) = DISPLAY_ORDER.iter().position(|p| *p == prayer) {
                found[slot] = Some(time);
            }
        }
    }

    let mut resolved = [NaiveTime::MIN; 6];
    for (slot, prayer) in DISPLAY_ORDER.iter().enumerate() {
        resolved[slot] = found[slot].ok_or(ParseError::MissingMarker(prayer.as_str()))?;
    }

    let times = PrayerTimes {
        fajr: resolved[0],
        shuruq: resolved[1],
        dhuhr: resolved[2],
        asr: resolved[3],
        maghrib: resolved[4],
        isha: resolved[5],
    };

    if !times.is_ordered() {
        return Err(ParseError::OutOfOrder);
    }

    Ok(PrayerTimeSet {
        city_id: city_id.to_string(),
        date,
        times,
    })
}

/// Map a label cell to the marker it names, or `None` for unrelated cells.
///
/// The Habous page labels rows in Arabic; French spellings appear on the
/// index page and are accepted defensively. Trailing colons and whitespace
/// are stripped before matching.
fn match_label(label: &str) -> Option<Prayer> {
    let cleaned = label.trim().trim_end_matches(':').trim();
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.contains("الفجر") || cleaned.contains("الصبح") {
        return Some(Prayer::Fajr);
    }
    if cleaned.contains("الشروق") {
        return Some(Prayer::Shuruq);
    }
    if cleaned.contains("الظهر") {
        return Some(Prayer::Dhuhr);
    }
    if cleaned.contains("العصر") {
        return Some(Prayer::Asr);
    }
    if cleaned.contains("المغرب") {
        return Some(Prayer::Maghrib);
    }
    if cleaned.contains("العشاء") {
        return Some(Prayer::Isha);
    }

    let lower = cleaned.to_lowercase();
    match lower.as_str() {
        "fajr" | "sobh" => Some(Prayer::Fajr),
        "chorouk" | "chourouk" | "shuruq" => Some(Prayer::Shuruq),
        "dohr" | "dhuhr" | "dhohr" => Some(Prayer::Dhuhr),
        "asr" | "aasr" => Some(Prayer::Asr),
        "maghrib" | "maghreb" => Some(Prayer::Maghrib),
        "ichaa" | "isha" | "icha" => Some(Prayer::Isha),
        _ => None,
    }
}

/// Parse a positional `HH:MM` value (24-hour clock) into a `NaiveTime`.
///
/// Whitespace around the value is ignored. `00 ≤ HH ≤ 23` and
/// `00 ≤ MM ≤ 59` are enforced; anything else is a [`ParseError::InvalidTime`].
fn parse_time(value: &str) -> Result<NaiveTime, ParseError> {
    let cleaned = value.trim();
    let invalid = || ParseError::InvalidTime(cleaned.to_string());

    let (hours, minutes) = cleaned.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}
