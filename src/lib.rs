//! # REST Statistics Visualization Library
//!
//! `reststats` is a library for aggregating and visualizing record
//! collections served by a REST backend. It fetches two related collections
//! concurrently, joins them on a shared key field, groups and counts
//! client-side, and renders the result as a pie, bar, or line chart.
//!
//! ## Features
//!
//! - Concurrent fetching of a primary and secondary collection
//! - Pure join-and-aggregate core with dynamic field selectors
//! - Configurable handling of records with missing measure values
//! - Two interchangeable chart backends: a declarative ECharts description
//!   and a hand-drawn plotters rendering with hover hit-regions
//! - Stale-response protection for overlapping fetch cycles
//! - Caching of rendered charts
//!
//! ## Example
//!
//! ```no_run
//! use reststats::RestStatsApp;
//! use std::sync::{Arc, Mutex};
//! use eframe::NativeOptions;
//!
//! // Create a new application instance
//! let app = Arc::new(Mutex::new(RestStatsApp::default()));
//! let app_wrapper = reststats::app::AppWrapper { app };
//!
//! // Run the application with eframe
//! eframe::run_native(
//!     "REST Statistics",
//!     NativeOptions::default(),
//!     Box::new(|_cc| Ok(Box::new(app_wrapper))),
//! ).unwrap();
//! ```

pub mod aggregate;
pub mod app;
pub mod fetch;
pub mod plotting;
pub mod types;

// Re-export main types for convenience
pub use app::App as RestStatsApp;
pub use types::{Aggregation, ChartKind, ChartQuery, MissingValuePolicy, Record};
