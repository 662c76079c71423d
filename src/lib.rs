//! # Glance - ambient terminal dashboard
//!
//! A full-screen page with a clock, date, greeting, weather, traffic and a
//! quote, kept current by a once-per-second local tick and a periodic
//! remote fetch that degrades gracefully to the last good data when the
//! network goes away.
//!
//! ## Architecture
//!
//! The crate follows the ratatui component pattern:
//!
//! - [`tui`] - terminal wrapper emitting tick/render/input events
//! - [`action`] - the message enum dispatched through the app loop
//! - [`app`] - the event loop wiring events, actions and components
//! - [`components`] - the updater widget and the status indicators
//! - [`page`] - typed model of the rendered page
//! - [`discovery`] - heuristic binding of display regions to elements
//! - [`clock`] - wall-clock formatting and the greeting bands
//! - [`snapshot`] - the server payload and its display formatting
//! - [`fetch`] - the periodic remote refresh task

pub mod action;
pub mod app;
pub mod cli;
pub mod clock;
pub mod components;
pub mod config;
pub mod discovery;
pub mod fetch;
pub mod page;
pub mod snapshot;
pub mod tui;
pub mod utils;

/// Result type used throughout the library
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
