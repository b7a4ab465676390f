//! Async operations run on behalf of the console screens

pub mod backend_tasks;

pub use backend_tasks::{BackendTasks, SaveRequest};
