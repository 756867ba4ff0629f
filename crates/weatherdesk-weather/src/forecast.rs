//! Forecast aggregation: 3-hourly provider entries to per-day summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::current::title_case;
use crate::error::WeatherError;
use crate::raw::{RawForecast, RawForecastEntry};
use crate::types::{ChartSeries, DailyForecastEntry, ForecastPayload, Units};

/// Number of calendar days kept in a summary
pub const MAX_DAYS: usize = 5;

const MIDDAY_HOUR: i32 = 12;

/// One forecast entry in provider-local time
#[derive(Debug)]
struct Sample<'a> {
    local: NaiveDateTime,
    temp: f64,
    icon: &'a str,
    description: &'a str,
}

/// Aggregate a `/forecast` response into daily summaries plus a chart series.
///
/// Entries are bucketed by their local calendar date (UTC timestamp shifted by
/// the city's offset). The first [`MAX_DAYS`] dates are kept in chronological
/// order. Each day's icon and description come from the entry nearest local
/// noon; on a tie the entry that arrived first wins. An empty list is not an
/// error.
pub fn build_forecast(raw: &RawForecast, units: Units) -> Result<ForecastPayload, WeatherError> {
    let offset = raw.city.as_ref().and_then(|c| c.timezone).unwrap_or(0);

    let mut days: BTreeMap<NaiveDate, Vec<Sample<'_>>> = BTreeMap::new();
    for (index, entry) in raw.list.iter().enumerate() {
        let sample = to_sample(entry, index, offset)?;
        days.entry(sample.local.date()).or_default().push(sample);
    }

    let daily: Vec<DailyForecastEntry> = days
        .into_iter()
        .take(MAX_DAYS)
        .filter_map(|(date, samples)| summarize(date, &samples))
        .collect();

    let chart = ChartSeries {
        labels: daily.iter().map(|d| d.date.to_string()).collect(),
        data: daily.iter().map(|d| round2(d.temp_avg)).collect(),
    };

    tracing::debug!(
        entries = raw.list.len(),
        days = daily.len(),
        "Aggregated forecast"
    );

    Ok(ForecastPayload {
        daily,
        chart,
        units: units.symbol().to_string(),
    })
}

fn to_sample(
    entry: &RawForecastEntry,
    index: usize,
    offset: i64,
) -> Result<Sample<'_>, WeatherError> {
    let field = |name: &str| WeatherError::malformed(format!("list[{}].{}", index, name));

    let dt = entry.dt.ok_or_else(|| field("dt"))?;
    let local = dt
        .checked_add(offset)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .ok_or_else(|| field("dt"))?
        .naive_utc();
    let temp = entry
        .main
        .as_ref()
        .and_then(|m| m.temp)
        .ok_or_else(|| field("main.temp"))?;
    let condition = entry.weather.first().ok_or_else(|| field("weather[0]"))?;
    let icon = condition
        .icon
        .as_deref()
        .ok_or_else(|| field("weather[0].icon"))?;
    let description = condition
        .description
        .as_deref()
        .ok_or_else(|| field("weather[0].description"))?;

    Ok(Sample {
        local,
        temp,
        icon,
        description,
    })
}

/// Returns `None` only for an empty group, which bucketing never produces.
fn summarize(date: NaiveDate, samples: &[Sample<'_>]) -> Option<DailyForecastEntry> {
    // min_by_key keeps the first of equal keys
    let midday = samples
        .iter()
        .min_by_key(|s| (s.local.hour() as i32 - MIDDAY_HOUR).abs())?;

    let temp_min = samples.iter().map(|s| s.temp).fold(f64::INFINITY, f64::min);
    let temp_max = samples
        .iter()
        .map(|s| s.temp)
        .fold(f64::NEG_INFINITY, f64::max);
    let mean = samples.iter().map(|s| s.temp).sum::<f64>() / samples.len() as f64;
    // Summation error can push the mean a hair outside [min, max]
    let temp_avg = mean.clamp(temp_min, temp_max);

    Some(DailyForecastEntry {
        date,
        temp_min,
        temp_max,
        temp_avg,
        icon: midday.icon.to_string(),
        description: title_case(midday.description),
    })
}

fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
