//! Calendar provider adapters
//!
//! Only Google Calendar is supported. The gateway implements the
//! `CalendarGateway` port from `studysync-core`.

pub mod google;

pub use google::GoogleCalendarGateway;
