//! Third-party service adapters

pub mod calendar;
