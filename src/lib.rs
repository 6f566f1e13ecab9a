//! Client-side synchronization core for a live process console.
//!
//! [`stores`] hold the canonical process table and the user's query, column
//! and selection state; [`contract`] defines the source and action
//! boundaries; [`services`] provide a local sysinfo-backed source and
//! executor; [`api`] exposes both over HTTP.

pub mod api;
pub mod cli;
pub mod console;
pub mod contract;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;

pub use console::Console;
pub use error::{AppError, DiffError};
