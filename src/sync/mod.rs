pub mod conflict;

pub use conflict::{StaleWrite, check_timestamp, ensure_unmodified};
