//! Plain-text rendering of prayer times
//!
//! Renders the `today` table (rounded box style) and the one-line `next`
//! message. The core hands this module stable identifiers and times; every
//! visible string comes from the localization tables.

use crate::data::{PrayerTimeSet, DISPLAY_ORDER};
use crate::i18n::{self, Language};
use crate::service::NextPrayer;

/// Renders today's prayer times as a rounded box table.
///
/// One row per marker in display order, localized label first, `HH:MM`
/// time second.
pub fn render_today(set: &PrayerTimeSet, language: Language) -> String {
    let header = (
        i18n::header_prayer(language).to_string(),
        i18n::header_time(language).to_string(),
    );
    let rows: Vec<(String, String)> = DISPLAY_ORDER
        .iter()
        .map(|prayer| {
            (
                i18n::prayer_label(language, *prayer).to_string(),
                set.times.time_of(*prayer).format("%H:%M").to_string(),
            )
        })
        .collect();

    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain([header.0.chars().count()])
        .max()
        .unwrap_or(0);
    let time_width = rows
        .iter()
        .map(|(_, time)| time.chars().count())
        .chain([header.1.chars().count()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&border('╭', '┬', '╮', label_width, time_width));
    out.push_str(&row(&header.0, &header.1, label_width, time_width));
    out.push_str(&border('├', '┼', '┤', label_width, time_width));
    for (label, time) in &rows {
        out.push_str(&row(label, time, label_width, time_width));
    }
    out.push_str(&border('╰', '┴', '╯', label_width, time_width));
    out
}

/// Renders the next-prayer message, e.g. "Next prayer is Maghrib in 01:45".
pub fn render_next(next: &NextPrayer, language: Language) -> String {
    let label = i18n::prayer_label(language, next.prayer);
    let minutes = next.remaining.num_minutes().max(0);
    i18n::msg_next_prayer_in(language, label, minutes / 60, minutes % 60)
}

fn border(left: char, middle: char, right: char, label_width: usize, time_width: usize) -> String {
    format!(
        "{left}{}{middle}{}{right}\n",
        "─".repeat(label_width + 2),
        "─".repeat(time_width + 2)
    )
}

fn row(label: &str, time: &str, label_width: usize, time_width: usize) -> String {
    format!(
        "│ {label}{} │ {time}{} │\n",
        " ".repeat(label_width - label.chars().count()),
        " ".repeat(time_width - time.chars().count())
    )
}
