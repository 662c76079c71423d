//! The server payload and its display formatting.
//!
//! The latest successfully fetched snapshot is kept around so display
//! regions can be refilled from stale-but-valid data during outages.

use serde::{Deserialize, Serialize};

const MISSING: &str = "N/A";
const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub user_name: Option<String>,
    pub weather: Option<Weather>,
    pub traffic: Option<Traffic>,
    pub quote: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub location: Option<String>,
    pub temperature: Option<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traffic {
    pub status: Option<String>,
    pub travel_time: Option<String>,
    pub location: Option<String>,
}

impl Weather {
    pub fn line(&self) -> String {
        let temperature = self.temperature.as_deref().unwrap_or(MISSING);
        let condition = self.condition.as_deref().unwrap_or(MISSING);
        let location = self.location.as_deref().unwrap_or(UNKNOWN_LOCATION);
        format!("Weather: {temperature}, {condition} ({location})")
    }
}

impl Traffic {
    pub fn line(&self) -> String {
        let status = self.status.as_deref().unwrap_or(MISSING);
        let travel_time = self.travel_time.as_deref().unwrap_or(MISSING);
        let location = self.location.as_deref().unwrap_or(UNKNOWN_LOCATION);
        format!("Traffic: {status} ({travel_time}) - {location}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_weather_line() {
        let weather = Weather {
            location: Some("NYC".into()),
            temperature: Some("72F".into()),
            condition: Some("Sunny".into()),
        };
        assert_eq!(weather.line(), "Weather: 72F, Sunny (NYC)");
    }

    #[test]
    fn test_weather_line_placeholders() {
        assert_eq!(Weather::default().line(), "Weather: N/A, N/A (Unknown)");
    }

    #[test]
    fn test_traffic_line_missing_location() {
        let traffic = Traffic {
            status: Some("Heavy".into()),
            travel_time: Some("45min".into()),
            location: None,
        };
        assert_eq!(traffic.line(), "Traffic: Heavy (45min) - Unknown");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"traffic":{"status":"Heavy","travelTime":"45min"}}"#)
                .expect("valid payload");

        let traffic = snapshot.traffic.expect("traffic present");
        assert_eq!(traffic.travel_time.as_deref(), Some("45min"));
        assert_eq!(snapshot.weather, None);
        assert_eq!(snapshot.user_name, None);
    }

    #[test]
    fn test_deserialize_full_payload() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{
                "userName": "Deepak",
                "weather": {"location": "NYC", "temperature": "72F", "condition": "Sunny"},
                "traffic": {"status": "Light", "travelTime": "12min", "location": "Downtown"},
                "quote": "Stay hungry, stay foolish."
            }"#,
        )
        .expect("valid payload");

        assert_eq!(snapshot.user_name.as_deref(), Some("Deepak"));
        assert_eq!(snapshot.quote.as_deref(), Some("Stay hungry, stay foolish."));
    }
}
