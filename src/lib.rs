//! Track a fleet of boats and authorize maintenance spending against each boat's purchase price.
//!
//! Boats come from a headerless CSV source (see [`import`]), live in a [`model::Fleet`] for the
//! length of a run, and are saved to a JSON snapshot (see [`snapshot`]) under the fleet home.

mod backup;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod import;
mod menu;
pub mod model;
pub mod snapshot;
mod utils;


pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
