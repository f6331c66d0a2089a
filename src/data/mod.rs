//! Core data models for the Moroccan prayer times CLI
//!
//! This module contains the types used throughout the application for
//! representing prayers, daily time sets, and the supported cities.

pub mod extract;
pub mod habous;

pub use extract::{extract_times, ParseError};
pub use habous::{FetchError, HabousClient};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// The six daily time markers published by the Habous ministry.
///
/// Five of these are canonical prayers; `Shuruq` (sunrise) is published and
/// displayed alongside them but is not itself a prayer and is never returned
/// as a "next prayer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Shuruq,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

/// The five canonical prayers, in daily order. Shuruq is excluded.
pub const PRAYERS: [Prayer; 5] = [
    Prayer::Fajr,
    Prayer::Dhuhr,
    Prayer::Asr,
    Prayer::Maghrib,
    Prayer::Isha,
];

/// All six markers in the order they are displayed, Shuruq included.
pub const DISPLAY_ORDER: [Prayer; 6] = [
    Prayer::Fajr,
    Prayer::Shuruq,
    Prayer::Dhuhr,
    Prayer::Asr,
    Prayer::Maghrib,
    Prayer::Isha,
];

impl Prayer {
    /// Stable identifier for this marker, used in cache files and as the
    /// lookup key for localized labels. Never a display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Prayer::Fajr => "FAJR",
            Prayer::Shuruq => "SHURUQ",
            Prayer::Dhuhr => "DHUHR",
            Prayer::Asr => "ASR",
            Prayer::Maghrib => "MAGHRIB",
            Prayer::Isha => "ISHA",
        }
    }
}

/// The six time-of-day values for one city on one calendar date.
///
/// All six fields are required; extraction fails if any marker is missing
/// from the source page. Serde round-trips every value losslessly since
/// `NaiveTime` serializes as `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimes {
    pub fajr: NaiveTime,
    pub shuruq: NaiveTime,
    pub dhuhr: NaiveTime,
    pub asr: NaiveTime,
    pub maghrib: NaiveTime,
    pub isha: NaiveTime,
}

impl PrayerTimes {
    /// Returns the time of day for the given marker.
    pub fn time_of(&self, prayer: Prayer) -> NaiveTime {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Shuruq => self.shuruq,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// Checks the monotonic ordering of the five canonical prayers
    /// (Fajr ≤ Dhuhr ≤ Asr ≤ Maghrib ≤ Isha). Shuruq is not part of the
    /// ordering contract.
    pub fn is_ordered(&self) -> bool {
        PRAYERS
            .windows(2)
            .all(|pair| self.time_of(pair[0]) <= self.time_of(pair[1]))
    }

    /// Finds the first canonical prayer whose time is strictly after `now`.
    ///
    /// A prayer whose time equals `now` exactly is considered already
    /// passed. Returns `None` when all five prayers have passed (i.e., the
    /// next prayer is tomorrow's Fajr).
    pub fn next_after(&self, now: NaiveTime) -> Option<Prayer> {
        PRAYERS.into_iter().find(|p| self.time_of(*p) > now)
    }
}

/// Prayer times for one city on one calendar date.
///
/// Created by the extractor from a fetched page, written once to the cache,
/// then read many times. Superseded (never mutated) when a new date's data
/// is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimeSet {
    /// City identifier from the supported-city registry (e.g., "casablanca")
    pub city_id: String,
    /// Calendar date these times apply to, in the local timezone
    pub date: NaiveDate,
    /// The six time markers
    pub times: PrayerTimes,
}

/// A supported Moroccan city.
///
/// Uses `&'static str` for string fields to allow static initialization of
/// the CITIES array. The `habous_id` is the numeric `ville` parameter the
/// ministry endpoint expects.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct City {
    /// Unique identifier for the city
    pub id: &'static str,
    /// Human-readable name of the city
    pub name: &'static str,
    /// Numeric id used by the Habous endpoint
    pub habous_id: u32,
}

/// Static registry of supported Moroccan cities.
///
/// The set is closed: the service refuses any city id not listed here
/// before touching the network.
pub static CITIES: [City; 12] = [
    City {
        id: "agadir",
        name: "Agadir",
        habous_id: 26,
    },
    City {
        id: "casablanca",
        name: "Casablanca",
        habous_id: 58,
    },
    City {
        id: "el-jadida",
        name: "El Jadida",
        habous_id: 62,
    },
    City {
        id: "fes",
        name: "Fès",
        habous_id: 66,
    },
    City {
        id: "kenitra",
        name: "Kénitra",
        habous_id: 76,
    },
    City {
        id: "marrakech",
        name: "Marrakech",
        habous_id: 88,
    },
    City {
        id: "meknes",
        name: "Meknès",
        habous_id: 89,
    },
    City {
        id: "oujda",
        name: "Oujda",
        habous_id: 107,
    },
    City {
        id: "rabat",
        name: "Rabat",
        habous_id: 112,
    },
    City {
        id: "safi",
        name: "Safi",
        habous_id: 115,
    },
    City {
        id: "tangier",
        name: "Tanger",
        habous_id: 101,
    },
    City {
        id: "tetouan",
        name: "Tétouan",
        habous_id: 103,
    },
];

/// Get a city by its registry id
///
/// # Arguments
///
/// * `id` - The unique identifier for the city (e.g., "casablanca", "rabat")
///
/// # Returns
///
/// Returns `Some(&City)` if found, `None` otherwise. Matching is
/// case-insensitive so `--city Casablanca` works as well.
pub fn get_city_by_id(id: &str) -> Option<&'static City> {
    CITIES.iter().find(|city| city.id.eq_ignore_ascii_case(id))
}
