//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logging level of the front-end.
///
/// Levels are an open `i8` domain rather than a closed enum: the front-end
/// may hand the sink raw level values outside the named range, and the
/// severity mapper must stay total over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub i8);

impl LogLevel {
    pub const DEBUG: LogLevel = LogLevel(-1);
    pub const INFO: LogLevel = LogLevel(0);
    pub const WARN: LogLevel = LogLevel(1);
    pub const ERROR: LogLevel = LogLevel(2);
    /// Panics in development builds, errors in production.
    pub const DPANIC: LogLevel = LogLevel(3);
    pub const PANIC: LogLevel = LogLevel(4);
    pub const FATAL: LogLevel = LogLevel(5);

    pub fn to_str(&self) -> &'static str {
        match *self {
            LogLevel::DEBUG => "DEBUG",
            LogLevel::INFO => "INFO",
            LogLevel::WARN => "WARN",
            LogLevel::ERROR => "ERROR",
            LogLevel::DPANIC => "DPANIC",
            LogLevel::PANIC => "PANIC",
            LogLevel::FATAL => "FATAL",
            _ => "UNKNOWN",
        }
    }

    /// Raw integer value of the level.
    pub fn value(&self) -> i8 {
        self.0
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::INFO
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            "UNKNOWN" => write!(f, "LEVEL({})", self.0),
            s => write!(f, "{}", s),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::DEBUG),
            "INFO" => Ok(LogLevel::INFO),
            "WARN" | "WARNING" => Ok(LogLevel::WARN),
            "ERROR" => Ok(LogLevel::ERROR),
            "DPANIC" => Ok(LogLevel::DPANIC),
            "PANIC" => Ok(LogLevel::PANIC),
            "FATAL" => Ok(LogLevel::FATAL),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
