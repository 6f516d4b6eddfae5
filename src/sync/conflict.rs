use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::calendar::StoredObject;

/// The object changed after the client fetched it. The client has to reload
/// before submitting again.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("Object {object_id} was modified (submitted {submitted}, stored {stored})")]
pub struct StaleWrite {
    pub object_id: String,
    pub submitted: i64,
    pub stored: i64,
}

impl StaleWrite {
    /// JSON error body reported to the client.
    pub fn payload(&self) -> Value {
        json!({
            "status": "error",
            "data": { "modified": true },
        })
    }
}

/// Compares against the store's last-modified value, or the object's own
/// LAST-MODIFIED when the store does not track one.
pub fn ensure_unmodified(object: &StoredObject, submitted: i64) -> Result<(), StaleWrite> {
    let last_modified = object
        .last_modified
        .or_else(|| object.parse().ok().and_then(|parsed| parsed.last_modified));
    check_timestamp(&object.id, last_modified, submitted)
}

pub fn check_timestamp(
    object_id: &str,
    last_modified: Option<DateTime<Utc>>,
    submitted: i64,
) -> Result<(), StaleWrite> {
    match last_modified {
        Some(stored) if stored.timestamp() != submitted => Err(StaleWrite {
            object_id: object_id.to_string(),
            submitted,
            stored: stored.timestamp(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_object(last_modified_seconds: Option<i64>) -> StoredObject {
        StoredObject {
            id: "event1".to_string(),
            calendar_id: "primary".to_string(),
            owner: "alice".to_string(),
            data: String::new(),
            last_modified: last_modified_seconds
                .map(|seconds| Utc.timestamp_opt(seconds, 0).unwrap()),
        }
    }

    #[test]
    fn matching_timestamp_passes() {
        let object = create_object(Some(1_700_000_000));

        assert!(ensure_unmodified(&object, 1_700_000_000).is_ok());
    }

    #[test]
    fn mismatching_timestamp_is_a_conflict() {
        let object = create_object(Some(1_700_000_000));

        let conflict = ensure_unmodified(&object, 1_699_999_999).unwrap_err();

        assert_eq!(conflict.object_id, "event1");
        assert_eq!(conflict.submitted, 1_699_999_999);
        assert_eq!(conflict.stored, 1_700_000_000);
    }

    #[test]
    fn newer_submission_is_also_a_conflict() {
        let object = create_object(Some(100));

        assert!(ensure_unmodified(&object, 150).is_err());
    }

    #[test]
    fn object_without_timestamp_always_passes() {
        let object = create_object(None);

        assert!(ensure_unmodified(&object, 42).is_ok());
    }

    #[test]
    fn falls_back_to_last_modified_in_data() {
        let mut object = create_object(None);
        object.data = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:x\r\n\
LAST-MODIFIED:20231114T221320Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"
            .to_string();

        assert!(ensure_unmodified(&object, 1_700_000_000).is_ok());
        let conflict = ensure_unmodified(&object, 1_600_000_000).unwrap_err();
        assert_eq!(conflict.stored, 1_700_000_000);
    }

    #[test]
    fn store_timestamp_wins_over_data() {
        let mut object = create_object(Some(100));
        object.data = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\n\
LAST-MODIFIED:20231114T221320Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"
            .to_string();

        assert!(ensure_unmodified(&object, 100).is_ok());
    }

    #[test]
    fn sub_second_precision_is_ignored() {
        let stored = Utc.timestamp_opt(100, 500_000_000).unwrap();

        assert!(check_timestamp("event1", Some(stored), 100).is_ok());
    }

    #[test]
    fn payload_signals_modified() {
        let object = create_object(Some(100));
        let conflict = ensure_unmodified(&object, 99).unwrap_err();

        let payload = conflict.payload();

        assert_eq!(payload["status"], "error");
        assert_eq!(payload["data"]["modified"], true);
    }
}
