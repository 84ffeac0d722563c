pub mod config;
pub mod error;
pub mod ideate;
pub mod io;
pub mod journal;
pub mod paths;
pub mod plan;
pub mod qa;
pub mod store;

pub use error::{PlanError, Result};
