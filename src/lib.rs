//! Metropole CRM Dashboard API Library
//!
//! This library provides the core functionality for the Metropole CRM
//! dashboard service: the remote lead-service client, the in-memory
//! lead snapshot pipeline (sorting, statistics, search, pagination),
//! the two-variant intake form, the file-backed product registry, and
//! the HTTP handlers that tie them together.
//!
//! # Modules
//!
//! - `board`: Lead snapshot pipeline (ordering, stats, filter, pages).
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `intake`: Two-variant lead intake form state.
//! - `links`: Outbound WhatsApp/mail deep links.
//! - `metropole_client`: Remote Metropole lead-service client.
//! - `models`: Core data models.
//! - `product_registry`: File-backed product configuration store.
//! - `session`: Sign-out session boundary.
//! - `timefmt`: Timestamp parsing and human labels.

pub mod board;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod intake;
pub mod links;
pub mod metropole_client;
pub mod models;
pub mod product_registry;
pub mod session;
pub mod timefmt;
