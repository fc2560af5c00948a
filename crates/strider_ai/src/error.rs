//! Error types for the navigation controllers

use thiserror::Error;

use crate::config::ConfigError;

/// Navigation errors.
///
/// Stalls, lost targets and exhausted interaction retries are reported as
/// values ([`crate::TickOutcome`], [`crate::InteractionReport`]); only faults
/// that make a goal unrunnable surface here.
#[derive(Debug, Error)]
pub enum NavError {
    /// The fixed path to the interaction point is empty
    #[error("Path to the interaction target of goal '{goal}' is not defined")]
    MissingInteractionPath { goal: String },

    /// The interrupt watchdog thread is gone
    #[error("Interrupt watchdog is not running")]
    WatchdogStopped,

    /// Invalid or unreadable configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavError>;
