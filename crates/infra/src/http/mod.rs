//! Outbound HTTP plumbing shared by provider adapters

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
