use crate::scenario::ScenarioError;
use std::{error::Error, fmt::Display};

/// Everything that can bring the monitor down.
#[derive(Debug)]
pub enum MonitorError {
    /// The terminal could not be driven.
    IOError(std::io::Error),
    /// The scenario could not be read or built.
    Scenario(ScenarioError),
}

impl Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::IOError(e) => write!(f, "terminal error: {}", e),
            MonitorError::Scenario(e) => write!(f, "{}", e),
        }
    }
}

impl Error for MonitorError {}

impl From<std::io::Error> for MonitorError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl From<ScenarioError> for MonitorError {
    fn from(value: ScenarioError) -> Self {
        Self::Scenario(value)
    }
}
