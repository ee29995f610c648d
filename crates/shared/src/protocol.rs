use chrono::NaiveDateTime;

/// Path of the events resource on the service.
pub const EVENTS_ROUTE: &str = "/api/events";

/// Canonical wire form of an event date-time.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn events_item_route(id: impl std::fmt::Display) -> String {
    format!("{EVENTS_ROUTE}/{id}")
}

/// Parses the date-time shapes produced by the service and by date-time
/// pickers (minute precision, optional fractional seconds).
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Serde codec for `NaiveDateTime` fields on the wire.
pub mod date_time {
    use chrono::NaiveDateTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date_time(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date-time '{raw}'")))
    }
}
