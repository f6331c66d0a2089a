//! Localized labels and messages for the presentation layer
//!
//! The core returns stable identifiers only; every user-facing string is
//! looked up here, keyed by identifier and language. Three locales are
//! supported: Arabic, English, and French.

use serde::{Deserialize, Serialize};

use crate::data::{FetchError, Prayer};
use crate::service::PrayerTimesError;

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ar,
    #[default]
    En,
    Fr,
}

impl Language {
    /// Parse a language from a CLI or config value ("ar", "en", "fr").
    ///
    /// Returns `None` for anything else.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ar" | "arabic" => Some(Language::Ar),
            "en" | "english" => Some(Language::En),
            "fr" | "french" => Some(Language::Fr),
            _ => None,
        }
    }

    /// Stable lowercase code for this language
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

/// Localized display label for a prayer marker
pub fn prayer_label(language: Language, prayer: Prayer) -> &'static str {
    match language {
        Language::Ar => match prayer {
            Prayer::Fajr => "الفجر",
            Prayer::Shuruq => "الشروق",
            Prayer::Dhuhr => "الظهر",
            Prayer::Asr => "العصر",
            Prayer::Maghrib => "المغرب",
            Prayer::Isha => "العشاء",
        },
        Language::En => match prayer {
            Prayer::Fajr => "Fajr",
            Prayer::Shuruq => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        },
        Language::Fr => match prayer {
            Prayer::Fajr => "Fajr",
            Prayer::Shuruq => "Chorouk",
            Prayer::Dhuhr => "Dohr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Ichaa",
        },
    }
}

/// Column header for the prayer name column of the `today` table
pub fn header_prayer(language: Language) -> &'static str {
    match language {
        Language::Ar => "الصلاة",
        Language::En => "Prayer",
        Language::Fr => "Prière",
    }
}

/// Column header for the time column of the `today` table
pub fn header_time(language: Language) -> &'static str {
    match language {
        Language::Ar => "الوقت",
        Language::En => "Time",
        Language::Fr => "Heure",
    }
}

/// "Next prayer in" message, with the remaining time as `HH:MM`
pub fn msg_next_prayer_in(
    language: Language,
    prayer_label: &str,
    hours: i64,
    minutes: i64,
) -> String {
    match language {
        Language::Ar => format!(
            "الصلاة القادمة هي {} بعد {:02}:{:02}",
            prayer_label, hours, minutes
        ),
        Language::En => format!(
            "Next prayer is {} in {:02}:{:02}",
            prayer_label, hours, minutes
        ),
        Language::Fr => format!(
            "La prochaine prière est {} dans {:02}:{:02}",
            prayer_label, hours, minutes
        ),
    }
}

/// Hint shown when no city is saved and none was passed on the command line
pub fn msg_not_configured(language: Language) -> &'static str {
    match language {
        Language::Ar => "لم يتم حفظ أي مدينة. استعمل: salaty setup --city <city>",
        Language::En => "No city saved. Run: salaty setup --city <city>",
        Language::Fr => "Aucune ville enregistrée. Lancez : salaty setup --city <city>",
    }
}

/// Confirmation shown after `setup` saves the configuration
pub fn msg_config_saved(language: Language) -> &'static str {
    match language {
        Language::Ar => "تم حفظ الإعدادات",
        Language::En => "Configuration saved",
        Language::Fr => "Configuration enregistrée",
    }
}

/// Localized, user-readable message for a service failure
pub fn error_message(language: Language, error: &PrayerTimesError) -> String {
    match error {
        PrayerTimesError::UnsupportedCity(city) => match language {
            Language::Ar => format!("المدينة '{city}' غير مدعومة"),
            Language::En => format!("City '{city}' is not supported"),
            Language::Fr => format!("La ville '{city}' n'est pas prise en charge"),
        },
        PrayerTimesError::Fetch(FetchError::Network(_)) => match language {
            Language::Ar => "تعذر الاتصال بمصدر مواقيت الصلاة".to_string(),
            Language::En => "Could not reach the prayer times source".to_string(),
            Language::Fr => "Impossible de joindre la source des horaires".to_string(),
        },
        PrayerTimesError::Fetch(FetchError::RemoteService { status }) => match language {
            Language::Ar => format!("مصدر مواقيت الصلاة أجاب بالخطأ {status}"),
            Language::En => format!("The prayer times source answered with HTTP {status}"),
            Language::Fr => format!("La source des horaires a répondu HTTP {status}"),
        },
        PrayerTimesError::Parse(_) => match language {
            Language::Ar => "تعذرت قراءة مواقيت الصلاة من الصفحة".to_string(),
            Language::En => "Could not read prayer times from the fetched page".to_string(),
            Language::Fr => "Impossible de lire les horaires depuis la page".to_string(),
        },
    }
}
