//! Logging configuration.
//!
//! The facade receives a [`LogConfig`] instead of tweaking a shared logger,
//! so request logging and HTTP-stack noise are controlled in one place.

use log::{Level, LevelFilter};

/// Modules of the HTTP stack whose output is pinned separately.
const TRANSPORT_MODULES: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

/// Explicit logging settings for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Default filter for this crate's own records.
    pub level: LevelFilter,

    /// Filter for the HTTP stack (reqwest, hyper).
    pub transport_level: LevelFilter,

    /// Level at which each outbound API request is logged.
    pub request_level: Level,
}

impl LogConfig {
    /// Builds a config from the number of `-v` flags given.
    ///
    /// - 0: warnings only, HTTP stack silenced to warnings
    /// - 1: info, requests logged
    /// - 2: debug
    /// - 3+: trace, including the HTTP stack
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        let transport_level = if verbose >= 3 {
            LevelFilter::Trace
        } else {
            LevelFilter::Warn
        };

        LogConfig {
            level,
            transport_level,
            request_level: Level::Info,
        }
    }

    /// Installs `env_logger` with these settings.
    ///
    /// `RUST_LOG` is applied last and therefore wins over the flags.
    pub fn init(&self) {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(self.level);
        for module in TRANSPORT_MODULES {
            builder.filter_module(module, self.transport_level);
        }
        builder.parse_default_env();
        // A second init (e.g. from tests) is harmless.
        let _ = builder.try_init();
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_verbosity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_quiet() {
        let config = LogConfig::default();
        assert_eq!(config.level, LevelFilter::Warn);
        assert_eq!(config.transport_level, LevelFilter::Warn);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(1).level, LevelFilter::Info);
        assert_eq!(LogConfig::from_verbosity(2).level, LevelFilter::Debug);
        assert_eq!(LogConfig::from_verbosity(2).transport_level, LevelFilter::Warn);
        assert_eq!(LogConfig::from_verbosity(5).transport_level, LevelFilter::Trace);
    }
}
