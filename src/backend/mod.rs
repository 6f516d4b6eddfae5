//! Seams to the host application's services.
//!
//! The storage, sharing, category and localization systems live outside this
//! crate; the application hands implementations of these traits to
//! [`CalendarHelper`](crate::helper::CalendarHelper).

pub mod categories;
pub mod l10n;
pub mod sharing;

use thiserror::Error;

use crate::calendar::{NewCalendar, RawCalendar, StoredObject};

pub use categories::{Categories, CategoryStore, default_categories};
pub use l10n::{Catalog, Translator};
pub use sharing::{ItemType, Permissions, ShareBackend};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Backend request failed: {0}")]
    RequestFailed(String),
}

#[cfg_attr(test, mockall::automock)]
pub trait CalendarStore {
    fn calendars_by_user(
        &self,
        user: &str,
        active_only: bool,
        writable_only: bool,
    ) -> Result<Vec<RawCalendar>, BackendError>;

    fn find_calendar(&self, calendar_id: &str) -> Result<Option<RawCalendar>, BackendError>;

    fn default_backend(&self) -> String;

    /// Returns the new calendar's id, or `None` when the backend declined.
    fn create_calendar(
        &self,
        backend: &str,
        calendar: &NewCalendar,
    ) -> Result<Option<String>, BackendError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ObjectStore {
    fn find_object(&self, object_id: &str) -> Result<Option<StoredObject>, BackendError>;

    fn objects_in_calendar(&self, calendar_id: &str) -> Result<Vec<StoredObject>, BackendError>;

    fn update_object(&self, object_id: &str, data: &str) -> Result<(), BackendError>;
}
