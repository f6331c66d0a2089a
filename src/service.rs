//! Prayer time service orchestrating cache, fetcher, and extractor
//!
//! The service is cache-first: a valid same-day entry answers immediately,
//! otherwise the page is fetched, extracted, cached, and returned. Each call
//! is atomic from the caller's perspective; there is no retry logic and no
//! externally observable intermediate state.

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate, NaiveDateTime, TimeDelta};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::CacheManager;
use crate::data::{
    extract_times, get_city_by_id, City, FetchError, HabousClient, ParseError, Prayer,
    PrayerTimeSet,
};

/// Source of raw page markup for a city.
///
/// Seam between the service and the network so tests can inject canned
/// pages. The production implementation is [`HabousClient`].
#[async_trait]
pub trait PageSource {
    /// Fetch the raw HTML of today's times page for the given city
    async fn fetch_html(&self, city: &City) -> Result<String, FetchError>;
}

#[async_trait]
impl PageSource for HabousClient {
    async fn fetch_html(&self, city: &City) -> Result<String, FetchError> {
        HabousClient::fetch_html(self, city).await
    }
}

/// Errors surfaced by the prayer time service.
///
/// Cache write failures are deliberately absent: they are logged and the
/// freshly fetched data is still returned.
#[derive(Debug, Error)]
pub enum PrayerTimesError {
    /// The requested city is not in the supported-city registry
    #[error("unsupported city: '{0}'")]
    UnsupportedCity(String),

    /// Fetching the page failed (network or remote status)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched page could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// The upcoming prayer for a city, relative to a given instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPrayer {
    /// Which prayer comes next
    pub prayer: Prayer,
    /// When it occurs (may be tomorrow's date for post-Isha queries)
    pub time: NaiveDateTime,
    /// Time remaining until it occurs
    pub remaining: TimeDelta,
}

/// Orchestrates the cache store, page fetcher, and time extractor
#[derive(Debug)]
pub struct PrayerTimeService<S> {
    source: S,
    cache: CacheManager,
}

impl<S: PageSource + Sync> PrayerTimeService<S> {
    /// Creates a service over the given page source and cache
    pub fn new(source: S, cache: CacheManager) -> Self {
        Self { source, cache }
    }

    /// Returns today's prayer times for a city, using the local calendar date.
    pub async fn today_times(&self, city_id: &str) -> Result<PrayerTimeSet, PrayerTimesError> {
        self.times_for(city_id, Local::now().date_naive()).await
    }

    /// Returns the prayer times for a city on a specific date, cache-first.
    ///
    /// On a cache miss the page is fetched and extracted, and the result is
    /// written back before returning. A failed cache write is logged and
    /// otherwise ignored; a failed fetch or extraction propagates even when
    /// a stale entry for a different date exists, since yesterday's times
    /// must never be shown as today's.
    pub async fn times_for(
        &self,
        city_id: &str,
        date: NaiveDate,
    ) -> Result<PrayerTimeSet, PrayerTimesError> {
        let city = get_city_by_id(city_id)
            .ok_or_else(|| PrayerTimesError::UnsupportedCity(city_id.to_string()))?;

        if let Some(set) = self.cache.read(city.id, date) {
            debug!(city = city.id, %date, "serving prayer times from cache");
            return Ok(set);
        }

        let html = self.source.fetch_html(city).await?;
        let set = extract_times(&html, city.id, date)?;

        if let Err(err) = self.cache.write(&set) {
            // Non-fatal: the fetched data is still returned.
            warn!(city = city.id, %date, error = %err, "failed to cache prayer times");
        }

        Ok(set)
    }

    /// Returns the next prayer for a city relative to `now`.
    ///
    /// The five canonical prayers are scanned in order for the first whose
    /// time is strictly after `now`; a prayer occurring exactly at `now`
    /// counts as already passed. Once Isha has passed the next prayer is
    /// tomorrow's Fajr, approximated with today's Fajr time plus one day:
    /// the Habous endpoint only publishes the current day, so tomorrow's
    /// page cannot be fetched ahead of time.
    pub async fn next_prayer(
        &self,
        city_id: &str,
        now: NaiveDateTime,
    ) -> Result<NextPrayer, PrayerTimesError> {
        let set = self.times_for(city_id, now.date()).await?;

        let (prayer, time) = match set.times.next_after(now.time()) {
            Some(prayer) => (prayer, now.date().and_time(set.times.time_of(prayer))),
            None => {
                let tomorrow = now
                    .date()
                    .checked_add_days(Days::new(1))
                    .unwrap_or(now.date());
                (Prayer::Fajr, tomorrow.and_time(set.times.fajr))
            }
        };

        Ok(NextPrayer {
            prayer,
            time,
            remaining: time - now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PrayerTimes;
    use chrono::NaiveTime;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Page source returning a canned response and counting calls
    struct FakeSource {
        response: Mutex<Result<String, u16>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn serving(html: &str) -> Self {
            Self {
                response: Mutex::new(Ok(html.to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                response: Mutex::new(Err(status)),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageSource for FakeSource {
        async fn fetch_html(&self, _city: &City) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &*self.response.lock().unwrap() {
                Ok(html) => Ok(html.clone()),
                Err(status) => Err(FetchError::RemoteService { status: *status }),
            }
        }
    }

    /// The §8 scenario page: Casablanca with Maghrib at 18:45
    const CASABLANCA_PAGE: &str = r#"
        <table class="horaire">
            <tr>
                <td>الفجر</td><td>05:30</td>
                <td>الشروق</td><td>07:00</td>
                <td>الظهر</td><td>13:00</td>
            </tr>
            <tr>
                <td>العصر</td><td>16:15</td>
                <td>المغرب</td><td>18:45</td>
                <td>العشاء</td><td>20:00</td>
            </tr>
        </table>
    "#;

    const MISSING_ASR_PAGE: &str = r#"
        <table class="horaire">
            <tr>
                <td>الفجر</td><td>05:30</td>
                <td>الشروق</td><td>07:00</td>
                <td>الظهر</td><td>13:00</td>
            </tr>
            <tr>
                <td>المغرب</td><td>18:45</td>
                <td>العشاء</td><td>20:00</td>
            </tr>
        </table>
    "#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    fn service_with(source: FakeSource) -> (PrayerTimeService<FakeSource>, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (PrayerTimeService::new(source, cache), temp_dir)
    }

    fn yesterday_set() -> PrayerTimeSet {
        PrayerTimeSet {
            city_id: "casablanca".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            times: PrayerTimes {
                fajr: NaiveTime::from_hms_opt(5, 31, 0).unwrap(),
                shuruq: NaiveTime::from_hms_opt(7, 1, 0).unwrap(),
                dhuhr: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                asr: NaiveTime::from_hms_opt(16, 14, 0).unwrap(),
                maghrib: NaiveTime::from_hms_opt(18, 46, 0).unwrap(),
                isha: NaiveTime::from_hms_opt(20, 1, 0).unwrap(),
            },
        }
    }

    #[tokio::test]
    async fn test_times_for_fetches_and_returns_set() {
        let (service, _dir) = service_with(FakeSource::serving(CASABLANCA_PAGE));

        let set = service
            .times_for("casablanca", date())
            .await
            .expect("should succeed");

        assert_eq!(set.city_id, "casablanca");
        assert_eq!(set.date, date());
        assert!(set.times.is_ordered());
        assert_eq!(service.source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_second_call_is_a_cache_hit() {
        let (service, _dir) = service_with(FakeSource::serving(CASABLANCA_PAGE));

        let first = service
            .times_for("casablanca", date())
            .await
            .expect("first call");
        let second = service
            .times_for("casablanca", date())
            .await
            .expect("second call");

        assert_eq!(first, second, "idempotent within the same date");
        assert_eq!(service.source.call_count(), 1, "second call must not fetch");
    }

    #[tokio::test]
    async fn test_unsupported_city_is_rejected_before_fetch() {
        let (service, _dir) = service_with(FakeSource::serving(CASABLANCA_PAGE));

        let err = service.times_for("atlantis", date()).await.unwrap_err();
        match err {
            PrayerTimesError::UnsupportedCity(city) => assert_eq!(city, "atlantis"),
            other => panic!("expected UnsupportedCity, got {other:?}"),
        }
        assert_eq!(service.source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_with_empty_cache_propagates() {
        let (service, dir) = service_with(FakeSource::failing(503));

        let err = service.times_for("casablanca", date()).await.unwrap_err();
        assert!(matches!(
            err,
            PrayerTimesError::Fetch(FetchError::RemoteService { status: 503 })
        ));

        // No partial cache entry may be written on failure.
        let files: Vec<_> = std::fs::read_dir(dir.path())
            .map(|it| it.flatten().collect())
            .unwrap_or_default();
        assert!(files.is_empty(), "cache must stay empty after a failed fetch");
    }

    #[tokio::test]
    async fn test_stale_entry_from_previous_date_never_masks_failure() {
        let (service, _dir) = service_with(FakeSource::failing(503));
        service.cache.write(&yesterday_set()).expect("seed yesterday");

        // A stale entry for another date is not an acceptable substitute.
        let result = service.times_for("casablanca", date()).await;
        assert!(matches!(result, Err(PrayerTimesError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_parse_failure_leaves_cache_unmodified() {
        let (service, dir) = service_with(FakeSource::serving(MISSING_ASR_PAGE));
        service.cache.write(&yesterday_set()).expect("seed yesterday");

        let err = service.times_for("casablanca", date()).await.unwrap_err();
        assert!(matches!(
            err,
            PrayerTimesError::Parse(ParseError::MissingMarker("ASR"))
        ));

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["casablanca_2026-08-28.json".to_string()]);
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_returns_data() {
        let temp_dir = TempDir::new().expect("temp dir");
        let blocked = temp_dir.path().join("blocked");
        std::fs::write(&blocked, "not a directory").unwrap();

        let cache = CacheManager::with_dir(blocked);
        let service = PrayerTimeService::new(FakeSource::serving(CASABLANCA_PAGE), cache);

        let set = service
            .times_for("casablanca", date())
            .await
            .expect("data must be returned even when caching fails");
        assert_eq!(set.times.maghrib, NaiveTime::from_hms_opt(18, 45, 0).unwrap());
    }

    #[tokio::test]
    async fn test_next_prayer_casablanca_afternoon_scenario() {
        let (service, _dir) = service_with(FakeSource::serving(CASABLANCA_PAGE));

        let now = date().and_time(NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        let next = service
            .next_prayer("casablanca", now)
            .await
            .expect("should succeed");

        assert_eq!(next.prayer, Prayer::Maghrib);
        assert_eq!(next.remaining, TimeDelta::minutes(105));
        assert_eq!(
            next.time,
            date().and_time(NaiveTime::from_hms_opt(18, 45, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_next_prayer_at_exact_prayer_time_moves_on() {
        let (service, _dir) = service_with(FakeSource::serving(CASABLANCA_PAGE));

        let now = date().and_time(NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        let next = service
            .next_prayer("casablanca", now)
            .await
            .expect("should succeed");

        assert_eq!(next.prayer, Prayer::Asr);
    }

    #[tokio::test]
    async fn test_next_prayer_after_isha_rolls_over_to_fajr() {
        let (service, _dir) = service_with(FakeSource::serving(CASABLANCA_PAGE));

        let now = date().and_time(NaiveTime::from_hms_opt(22, 30, 0).unwrap());
        let next = service
            .next_prayer("casablanca", now)
            .await
            .expect("should succeed");

        assert_eq!(next.prayer, Prayer::Fajr);
        // Tomorrow's Fajr approximated with today's time: 05:30 next day.
        assert_eq!(
            next.time,
            NaiveDate::from_ymd_opt(2026, 8, 30)
                .unwrap()
                .and_time(NaiveTime::from_hms_opt(5, 30, 0).unwrap())
        );
        assert_eq!(next.remaining, TimeDelta::hours(7));
    }

    #[tokio::test]
    async fn test_next_prayer_never_returns_shuruq() {
        let (service, _dir) = service_with(FakeSource::serving(CASABLANCA_PAGE));

        let now = date().and_time(NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        let next = service
            .next_prayer("casablanca", now)
            .await
            .expect("should succeed");

        assert_eq!(next.prayer, Prayer::Dhuhr);
    }
}
