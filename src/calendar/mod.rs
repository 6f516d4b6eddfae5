pub mod calendar_type;
pub mod event;
pub mod event_source;

pub use calendar_type::{CalendarError, CalendarRecord, NewCalendar, RawCalendar};
pub use event::{CalendarObject, ComponentKind, StoredObject};
pub use event_source::{EventSource, calendar_hash};
