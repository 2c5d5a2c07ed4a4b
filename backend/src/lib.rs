//! # Dinebook Backend
//!
//! Restaurant reservation service.
//!
//! Restaurants publish per-weekday opening windows; identified users book them,
//! subject to the window for the requested instant and a per-user reservation cap.
//!
//! ## Architecture
//!
//! - [`api`]: Identifier newtypes and the domain types shared across layers
//! - [`models`]: Weekdays, schedules, restaurants, reservations, identity, pagination
//! - [`services`]: Availability and quota rules, reservation and restaurant workflows
//! - [`db`]: Repository traits with in-memory and Postgres implementations
//! - [`config`]: Server settings from the environment
//! - [`http`]: Axum-based HTTP server and request handlers (feature `http-server`)

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
