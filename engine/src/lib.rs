// Screening engine library root

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod report;
pub mod screening;

pub use error::{EngineError, Result};
