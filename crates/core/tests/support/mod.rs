//! Shared test helpers for `studysync-core` integration tests.
//!
//! In-memory implementations of every store port plus a scriptable calendar
//! gateway, so service tests can focus on behaviour instead of SQL.

#![allow(dead_code)]

pub mod calendar;
pub mod repositories;
