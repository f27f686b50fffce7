//! Failguard - error normalization, notification, reporting, and retry
//! engine for interactive applications.
//!
//! Heterogeneous failures (native errors, structured API payloads,
//! arbitrary values) are normalized into one canonical `StandardError`,
//! classified, counted, surfaced as user-facing notifications, forwarded
//! to a reporting client, driven through bounded retry with exponential
//! backoff, and mapped onto per-field form state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
