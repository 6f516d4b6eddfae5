use serde::{Deserialize, Serialize};

use super::calendar_type::CalendarRecord;
use crate::ui::color::{BlueChannel, Color, border_color_with, text_color_with};

/// Front-end descriptor for one calendar's events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "displayname")]
    pub display_name: String,
    pub background_color: Color,
    pub border_color: Color,
    pub text_color: Color,
    pub editable: bool,
    pub enabled: bool,
    #[serde(rename = "calendarid")]
    pub calendar_id: String,
    pub hash: String,
    pub class_name: String,
    pub cache: bool,
}

impl EventSource {
    pub fn from_record(record: &CalendarRecord, blue: BlueChannel) -> Self {
        let hash = calendar_hash(&record.id);
        Self {
            display_name: record.display_name.clone(),
            background_color: record.color,
            border_color: border_color_with(record.color, blue),
            text_color: text_color_with(record.color, blue),
            editable: record.editable,
            enabled: record.enabled,
            calendar_id: record.id.clone(),
            class_name: format!("calendar_{hash}"),
            hash,
            cache: true,
        }
    }
}

pub fn calendar_hash(calendar_id: &str) -> String {
    blake3::hash(calendar_id.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::color::{NEAR_BLACK, NEAR_WHITE};
    use pretty_assertions::assert_eq;

    fn record(id: &str, color: Color) -> CalendarRecord {
        CalendarRecord {
            id: id.to_string(),
            owner: "alice".to_string(),
            display_name: "Personal".to_string(),
            color,
            editable: true,
            enabled: false,
        }
    }

    #[test]
    fn colors_follow_background() {
        let light = EventSource::from_record(&record("a", Color::rgb(0xC2, 0xF9, 0xFC)), BlueChannel::Independent);
        let dark = EventSource::from_record(&record("b", Color::rgb(0x10, 0x20, 0x30)), BlueChannel::Independent);

        assert_eq!(light.text_color, NEAR_BLACK);
        assert_eq!(light.border_color, NEAR_BLACK);
        assert_eq!(dark.text_color, NEAR_WHITE);
        assert_eq!(dark.border_color, NEAR_WHITE);
    }

    #[test]
    fn class_name_is_derived_from_hash() {
        let source = EventSource::from_record(&record("database::7", Color::rgb(0, 0, 0)), BlueChannel::Independent);

        assert_eq!(source.hash, calendar_hash("database::7"));
        assert_eq!(source.class_name, format!("calendar_{}", source.hash));
        assert!(source.cache);
        assert!(!source.enabled);
    }

    #[test]
    fn hash_is_stable_and_distinct() {
        assert_eq!(calendar_hash("one"), calendar_hash("one"));
        assert_ne!(calendar_hash("one"), calendar_hash("two"));
        assert_eq!(calendar_hash("one").len(), 64);
    }

    #[test]
    fn serializes_with_front_end_keys() {
        let source = EventSource::from_record(&record("c", Color::rgb(0xFF, 0xFF, 0xFF)), BlueChannel::Independent);

        let json = serde_json::to_value(&source).unwrap();

        assert_eq!(json["displayname"], "Personal");
        assert_eq!(json["backgroundColor"], "#FFFFFF");
        assert_eq!(json["textColor"], "#000000");
        assert_eq!(json["borderColor"], "#000000");
        assert_eq!(json["calendarid"], "c");
        assert_eq!(json["className"], format!("calendar_{}", source.hash));
        assert_eq!(json["hash"], source.hash);
        assert!(json.get("md5").is_none());
    }
}
