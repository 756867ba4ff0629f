//! Current conditions: raw provider body to display record.

use chrono::DateTime;

use crate::error::WeatherError;
use crate::raw::RawCurrent;
use crate::types::{Coordinates, CurrentConditions, Units};

/// Map one `/weather` response into [`CurrentConditions`].
///
/// Fails with [`WeatherError::MalformedData`] when the condition list, the
/// temperature block, or sunrise/sunset are missing. Optional readings stay
/// `None` rather than being defaulted.
pub fn build_current_conditions(
    raw: &RawCurrent,
    units: Units,
) -> Result<CurrentConditions, WeatherError> {
    let offset = raw.timezone.unwrap_or(0);

    let condition = raw
        .weather
        .first()
        .ok_or_else(|| WeatherError::malformed("weather[0]"))?;
    let description = condition
        .description
        .as_deref()
        .ok_or_else(|| WeatherError::malformed("weather[0].description"))?;
    let icon = condition
        .icon
        .clone()
        .ok_or_else(|| WeatherError::malformed("weather[0].icon"))?;

    let main = raw
        .main
        .as_ref()
        .ok_or_else(|| WeatherError::malformed("main"))?;
    let temp = main
        .temp
        .ok_or_else(|| WeatherError::malformed("main.temp"))?;

    let sys = raw
        .sys
        .as_ref()
        .ok_or_else(|| WeatherError::malformed("sys"))?;
    let sunrise = sys
        .sunrise
        .ok_or_else(|| WeatherError::malformed("sys.sunrise"))?;
    let sunset = sys
        .sunset
        .ok_or_else(|| WeatherError::malformed("sys.sunset"))?;

    let location = [raw.name.as_deref(), sys.country.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let coord = raw.coord.as_ref().and_then(|c| match (c.lat, c.lon) {
        (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
        _ => None,
    });

    Ok(CurrentConditions {
        location,
        description: title_case(description),
        temp,
        feels_like: main.feels_like,
        temp_min: main.temp_min,
        temp_max: main.temp_max,
        humidity: main.humidity,
        pressure: main.pressure,
        wind_speed: raw.wind.as_ref().and_then(|w| w.speed),
        icon,
        sunrise: local_hh_mm(sunrise, offset, "sys.sunrise")?,
        sunset: local_hh_mm(sunset, offset, "sys.sunset")?,
        units: units.symbol().to_string(),
        coord,
    })
}

/// Format a UTC epoch shifted by `offset` seconds as `HH:MM`.
fn local_hh_mm(epoch: i64, offset: i64, field: &str) -> Result<String, WeatherError> {
    epoch
        .checked_add(offset)
        .and_then(|local| DateTime::from_timestamp(local, 0))
        .map(|dt| dt.format("%H:%M").to_string())
        .ok_or_else(|| WeatherError::malformed(field))
}

/// Upper-case the first letter of every word, lower-case the rest.
/// A word starts after any non-alphabetic character.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawCurrent;

    fn raw(value: serde_json::Value) -> RawCurrent {
        serde_json::from_value(value).unwrap()
    }

    fn mumbai() -> serde_json::Value {
        serde_json::json!({
            "coord": {"lon": 72.85, "lat": 19.01},
            "weather": [{"id": 721, "main": "Haze", "description": "haze", "icon": "50d"}],
            "main": {
                "temp": 31.99, "feels_like": 38.99, "temp_min": 31.94,
                "temp_max": 31.99, "pressure": 1008, "humidity": 66
            },
            "wind": {"speed": 4.63, "deg": 270},
            "dt": 1717491000,
            "sys": {"country": "IN", "sunrise": 1717460722, "sunset": 1717508123},
            "timezone": 19800,
            "name": "Mumbai",
            "cod": 200
        })
    }

    #[test]
    fn test_builds_display_record() {
        let current = build_current_conditions(&raw(mumbai()), Units::Metric).unwrap();

        assert_eq!(current.location, "Mumbai, IN");
        assert_eq!(current.description, "Haze");
        assert_eq!(current.temp, 31.99);
        assert_eq!(current.feels_like, Some(38.99));
        assert_eq!(current.humidity, Some(66.0));
        assert_eq!(current.pressure, Some(1008.0));
        assert_eq!(current.wind_speed, Some(4.63));
        assert_eq!(current.icon, "50d");
        assert_eq!(current.units, "°C");
        assert_eq!(current.coord, Some(Coordinates { lat: 19.01, lon: 72.85 }));
    }

    #[test]
    fn test_sun_times_use_local_offset() {
        let current = build_current_conditions(&raw(mumbai()), Units::Metric).unwrap();
        // 1717460722 is 00:25:22 UTC; +05:30
        assert_eq!(current.sunrise, "05:55");
        // 1717508123 is 13:35:23 UTC; +05:30
        assert_eq!(current.sunset, "19:05");
    }

    #[test]
    fn test_negative_offset_wraps_to_previous_day() {
        let mut body = mumbai();
        body["timezone"] = serde_json::json!(-18000);
        body["sys"]["sunrise"] = serde_json::json!(3600);
        let current = build_current_conditions(&raw(body), Units::Imperial).unwrap();
        assert_eq!(current.sunrise, "20:00");
        assert_eq!(current.units, "°F");
    }

    #[test]
    fn test_optional_fields_stay_absent() {
        let body = serde_json::json!({
            "weather": [{"description": "clear sky", "icon": "01n"}],
            "main": {"temp": 12.5},
            "sys": {"sunrise": 0, "sunset": 43200},
            "name": "Reykjavik"
        });
        let current = build_current_conditions(&raw(body), Units::Metric).unwrap();

        assert_eq!(current.location, "Reykjavik");
        assert_eq!(current.description, "Clear Sky");
        assert_eq!(current.feels_like, None);
        assert_eq!(current.pressure, None);
        assert_eq!(current.wind_speed, None);
        assert_eq!(current.coord, None);
        assert_eq!(current.sunrise, "00:00");
        assert_eq!(current.sunset, "12:00");
    }

    #[test]
    fn test_missing_condition_is_malformed() {
        let mut body = mumbai();
        body["weather"] = serde_json::json!([]);
        let err = build_current_conditions(&raw(body), Units::Metric).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedData(ref f) if f == "weather[0]"));
    }

    #[test]
    fn test_missing_temperature_is_malformed() {
        let mut body = mumbai();
        body["main"] = serde_json::json!({"humidity": 40});
        let err = build_current_conditions(&raw(body), Units::Metric).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedData(ref f) if f == "main.temp"));

        let mut body = mumbai();
        body.as_object_mut().unwrap().remove("main");
        let err = build_current_conditions(&raw(body), Units::Metric).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedData(ref f) if f == "main"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("OVERCAST clouds"), "Overcast Clouds");
        assert_eq!(title_case("thunderstorm with heavy drizzle"), "Thunderstorm With Heavy Drizzle");
        assert_eq!(title_case("smoke/haze"), "Smoke/Haze");
        assert_eq!(title_case(""), "");
    }
}
