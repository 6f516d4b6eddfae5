use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ui::color::{Color, ColorError};

pub const PROP_CALENDAR_ID: &str = "X-OWNCLOUD-CALENDARID";
pub const PROP_DISPLAY_NAME: &str = "X-OWNCLOUD-DISPLAYNAME";
pub const PROP_COLOR: &str = "X-OWNCLOUD-CALENDARCOLOR";
pub const PROP_EDITABLE: &str = "X-OWNCLOUD-ISEDITABLE";
pub const PROP_ENABLED: &str = "X-OWNCLOUD-ENABLED";
pub const PROP_OWNER: &str = "X-OWNCLOUD-USERID";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalendarError {
    #[error("Calendar is missing property {0}")]
    MissingProperty(&'static str),
    #[error("Invalid calendar color: {0}")]
    InvalidColor(#[from] ColorError),
    #[error("Failed to parse calendar data: {0}")]
    ParseError(String),
    #[error("Calendar data contains no VEVENT, VTODO or VJOURNAL")]
    NoComponent,
}

/// Calendar as handed over by the storage backend: a loose bag of
/// `X-OWNCLOUD-*` properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCalendar {
    pub properties: HashMap<String, String>,
}

impl RawCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// The owning user, read without validating the other properties.
    pub fn owner(&self) -> Option<&str> {
        self.get(PROP_OWNER).filter(|owner| !owner.is_empty())
    }

    fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub id: String,
    pub owner: String,
    pub display_name: String,
    pub color: Color,
    pub editable: bool,
    pub enabled: bool,
}

impl TryFrom<&RawCalendar> for CalendarRecord {
    type Error = CalendarError;

    fn try_from(raw: &RawCalendar) -> Result<Self, Self::Error> {
        let required = |name: &'static str| {
            raw.get(name)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or(CalendarError::MissingProperty(name))
        };

        let id = required(PROP_CALENDAR_ID)?;
        let owner = required(PROP_OWNER)?;
        let color = Color::from_hex(&required(PROP_COLOR)?)?;

        Ok(Self {
            display_name: raw.get(PROP_DISPLAY_NAME).unwrap_or_default().to_string(),
            editable: raw.flag(PROP_EDITABLE).unwrap_or(false),
            enabled: raw.flag(PROP_ENABLED).unwrap_or(true),
            id,
            owner,
            color,
        })
    }
}

/// Request for a fresh calendar on a storage backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalendar {
    pub owner: String,
    pub display_name: String,
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_calendar() -> RawCalendar {
        RawCalendar::new()
            .with(PROP_CALENDAR_ID, "database::42")
            .with(PROP_OWNER, "alice")
            .with(PROP_DISPLAY_NAME, "Work")
            .with(PROP_COLOR, "#1a73e8")
            .with(PROP_EDITABLE, "1")
    }

    #[test]
    fn record_is_built_from_raw_properties() {
        let record = CalendarRecord::try_from(&raw_calendar()).unwrap();

        assert_eq!(
            record,
            CalendarRecord {
                id: "database::42".to_string(),
                owner: "alice".to_string(),
                display_name: "Work".to_string(),
                color: Color::rgb(0x1a, 0x73, 0xe8),
                editable: true,
                enabled: true,
            }
        );
    }

    #[test]
    fn disabled_flag_is_respected() {
        let raw = raw_calendar().with(PROP_ENABLED, "false").with(PROP_EDITABLE, "0");

        let record = CalendarRecord::try_from(&raw).unwrap();

        assert!(!record.enabled);
        assert!(!record.editable);
    }

    #[test]
    fn missing_id_is_rejected() {
        let mut raw = raw_calendar();
        raw.properties.remove(PROP_CALENDAR_ID);

        assert_eq!(
            CalendarRecord::try_from(&raw),
            Err(CalendarError::MissingProperty(PROP_CALENDAR_ID))
        );
    }

    #[test]
    fn malformed_color_is_rejected() {
        let raw = raw_calendar().with(PROP_COLOR, "#12345");

        let result = CalendarRecord::try_from(&raw);

        assert!(matches!(result, Err(CalendarError::InvalidColor(_))));
    }

    #[test]
    fn display_name_defaults_to_empty() {
        let mut raw = raw_calendar();
        raw.properties.remove(PROP_DISPLAY_NAME);

        let record = CalendarRecord::try_from(&raw).unwrap();

        assert_eq!(record.display_name, "");
    }

    #[test]
    fn owner_is_readable_despite_malformed_color() {
        let raw = raw_calendar().with(PROP_COLOR, "#FFF");

        assert_eq!(raw.owner(), Some("alice"));
        assert!(CalendarRecord::try_from(&raw).is_err());
    }

    #[test]
    fn empty_owner_counts_as_missing() {
        let raw = raw_calendar().with(PROP_OWNER, "");

        assert_eq!(raw.owner(), None);
    }
}
