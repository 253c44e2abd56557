// src/lib.rs

//! Kimsufi catalog watcher library.
//!
//! Parses the server listing and the availability feed into snapshots,
//! diffs consecutive snapshots and reports the changes.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
