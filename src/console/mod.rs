//! Terminal console for the reporting reference datasets
//!
//! A header menu opens one management dialog per dataset. Each dialog is a
//! configuration-driven table with inline editing; backend calls run on
//! spawned tasks and report back to the UI loop as [`events::AppEvent`]s.

pub mod app;
pub mod components;
pub mod events;
pub mod handlers;
pub mod operations;
pub mod plain;
pub mod screens;
pub mod store;
pub mod table;
pub mod traits;
pub mod ui;

pub use app::App;
