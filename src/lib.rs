pub mod backend;
pub mod calendar;
pub mod helper;
pub mod storage;
pub mod sync;
pub mod ui;

pub use calendar::{CalendarRecord, EventSource, RawCalendar, StoredObject};
pub use helper::{CalendarHelper, DefaultCalendar, HelperError, Services};
pub use ui::color::{BlueChannel, Color, border_color, text_color};
