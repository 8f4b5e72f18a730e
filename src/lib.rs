//! # Markstash
//!
//! A personal bookmark server, usable both as a standalone binary and as a library.
//!
//! Bookmarks share one metadata record per URL across all users, carry
//! free-form per-user tags and an optional category, and are soft-deleted.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! markstash = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use markstash::server::{AppState, create_router};
//! use markstash::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/markstash.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), chrono::Duration::hours(168)));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `markstash` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod store;
pub mod types;
