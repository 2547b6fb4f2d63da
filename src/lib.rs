// Core modules
pub mod backtest;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod risk;
pub mod scanner;
pub mod selector;
pub mod synthetic;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::*;
pub use selector::{ModeSelector, ModeSelectorConfig};
