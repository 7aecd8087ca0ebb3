use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    error::{Result, UpstreamError, WeatherError},
    model::{CurrentWeather, ForecastRange, WeatherSnapshot},
};

/// Round to one decimal place.
///
/// Rounds the exact binary value, so `21.15` (stored as `21.149..`) becomes
/// `21.1`.
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

fn invalid(reason: String) -> WeatherError {
    UpstreamError::Invalid {
        endpoint: "weather",
        reason,
    }
    .into()
}

/// Current temperature and provider-local wall clock time.
///
/// The timezone offset is added to the observation timestamp before it is
/// formatted as UTC, so the result is the location's local time.
pub fn extract_current(snapshot: &WeatherSnapshot) -> Result<CurrentWeather> {
    let dt = snapshot.current.dt;
    let offset = snapshot.timezone_offset.unwrap_or(0);

    let local_time = dt
        .checked_add(offset)
        .and_then(|shifted| DateTime::<Utc>::from_timestamp(shifted, 0))
        .ok_or_else(|| invalid(format!("timestamp {dt} with offset {offset} is out of range")))?
        .format("%H:%M")
        .to_string();

    Ok(CurrentWeather {
        temperature: round1(snapshot.current.temp),
        local_time,
    })
}

/// Min/max forecast for `target_date`.
///
/// Day entries are matched on the UTC calendar date of their timestamp; no
/// timezone offset is applied here.
pub fn extract_forecast(snapshot: &WeatherSnapshot, target_date: NaiveDate) -> Result<ForecastRange> {
    snapshot
        .daily
        .iter()
        .find(|day| utc_date(day.dt) == Some(target_date))
        .map(|day| ForecastRange {
            min_temperature: round1(day.temp.min),
            max_temperature: round1(day.temp.max),
        })
        .ok_or_else(|| WeatherError::not_found("Forecast not available for this date"))
}

fn utc_date(ts: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        model::{CurrentBlock, DailyEntry, DailyTemperature},
    };

    fn snapshot(daily: Vec<DailyEntry>) -> WeatherSnapshot {
        WeatherSnapshot {
            timezone_offset: Some(3600),
            current: CurrentBlock { dt: 1000, temp: 15.456 },
            daily,
        }
    }

    fn day(date: NaiveDate, min: f64, max: f64) -> DailyEntry {
        // Providers stamp daily entries around local noon.
        let dt = date.and_hms_opt(11, 0, 0).unwrap().and_utc().timestamp();
        DailyEntry {
            dt,
            temp: DailyTemperature { min, max },
        }
    }

    #[test]
    fn current_applies_offset_and_rounds() {
        let current = extract_current(&snapshot(vec![])).unwrap();
        assert_eq!(
            current,
            CurrentWeather {
                temperature: 15.5,
                local_time: "01:16".into(),
            }
        );
    }

    #[test]
    fn current_without_offset_is_utc() {
        let mut snap = snapshot(vec![]);
        snap.timezone_offset = None;
        snap.current.dt = 1_717_243_200; // 2024-06-01 12:00:00 UTC
        assert_eq!(extract_current(&snap).unwrap().local_time, "12:00");
    }

    #[test]
    fn current_wraps_past_midnight() {
        let mut snap = snapshot(vec![]);
        snap.current.dt = 1_717_282_800; // 2024-06-01 23:00:00 UTC
        snap.timezone_offset = Some(2 * 3600);
        assert_eq!(extract_current(&snap).unwrap().local_time, "01:00");
    }

    #[test]
    fn forecast_picks_matching_day() {
        let d1 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let snap = snapshot(vec![day(d1, 5.24, 9.81), day(d2, 7.0, 12.0)]);

        assert_eq!(
            extract_forecast(&snap, d1).unwrap(),
            ForecastRange {
                min_temperature: 5.2,
                max_temperature: 9.8,
            }
        );
        assert_eq!(extract_forecast(&snap, d2).unwrap().max_temperature, 12.0);
    }

    #[test]
    fn forecast_uses_first_match() {
        let d1 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let snap = snapshot(vec![day(d1, 1.0, 2.0), day(d1, 3.0, 4.0)]);
        assert_eq!(extract_forecast(&snap, d1).unwrap().min_temperature, 1.0);
    }

    #[test]
    fn forecast_ignores_timezone_offset() {
        // 2024-06-01 23:30 UTC is already June 2nd at +01:00, but matches June 1st.
        let d1 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut snap = snapshot(vec![DailyEntry {
            dt: 1_717_284_600,
            temp: DailyTemperature { min: 1.0, max: 2.0 },
        }]);
        snap.timezone_offset = Some(3600);
        assert!(extract_forecast(&snap, d1).is_ok());
    }

    #[test]
    fn forecast_missing_day_is_not_found() {
        let d1 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let snap = snapshot(vec![day(d1, 1.0, 2.0)]);

        let err = extract_forecast(&snap, d1.succ_opt().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Forecast not available for this date");
    }

    #[test]
    fn current_offset_overflow_is_invalid_payload() {
        let mut snap = snapshot(vec![]);
        snap.current.dt = i64::MAX - 10;
        snap.timezone_offset = Some(3600);

        let err = extract_current(&snap).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert!(matches!(
            err,
            WeatherError::UpstreamUnavailable(UpstreamError::Invalid { endpoint: "weather", .. })
        ));
    }

    #[test]
    fn current_out_of_range_timestamp_is_invalid_payload() {
        let mut snap = snapshot(vec![]);
        snap.current.dt = 1 << 50;
        snap.timezone_offset = None;

        let err = extract_current(&snap).unwrap_err();
        assert!(matches!(
            err,
            WeatherError::UpstreamUnavailable(UpstreamError::Invalid { .. })
        ));
    }

    #[test]
    fn round1_rounds_to_nearest() {
        assert_eq!(round1(15.456), 15.5);
        assert_eq!(round1(-3.14), -3.1);
        assert_eq!(round1(9.81), 9.8);
    }

    #[test]
    fn round1_rounds_the_binary_value() {
        // Both are stored slightly below the written value.
        assert_eq!(round1(21.15), 21.1);
        assert_eq!(round1(1.15), 1.1);
    }
}
