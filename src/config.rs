//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::timer::Kind;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "menubar-timer")]
#[command(about = "Independent count-up and countdown timers with an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Display refresh period in milliseconds
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_ms: u64,

    /// Create a countdown timer of this many seconds (repeatable)
    #[arg(long = "countdown", value_name = "SECS")]
    pub countdowns: Vec<f64>,

    /// Create a count-up timer stopping after this many seconds; `inf` never stops (repeatable)
    #[arg(long = "countup", value_name = "SECS")]
    pub countups: Vec<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// How often timers are reconciled for display
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    /// Timers to create at startup. Without any, a 10 second and a
    /// 1000 second countdown are created.
    pub fn initial_kinds(&self) -> Vec<Kind> {
        let kinds: Vec<Kind> = self
            .countdowns
            .iter()
            .map(|&total| Kind::count_down(total))
            .chain(self.countups.iter().map(|&limit| Kind::count_up_to(limit)))
            .collect();

        if kinds.is_empty() {
            vec![Kind::count_down(10.0), Kind::count_down(1000.0)]
        } else {
            kinds
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["menubar-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.refresh_interval(), Duration::from_millis(50));
        assert_eq!(
            config.initial_kinds(),
            vec![Kind::count_down(10.0), Kind::count_down(1000.0)]
        );
    }

    #[test]
    fn test_timer_flags() {
        let config = Config::try_parse_from([
            "menubar-timer",
            "--countdown",
            "90",
            "--countup",
            "inf",
            "--countup",
            "30",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.log_level(), "debug");
        assert_eq!(
            config.initial_kinds(),
            vec![Kind::count_down(90.0), Kind::count_up(), Kind::count_up_to(30.0)]
        );
    }

    #[test]
    fn test_zero_refresh_rejected() {
        assert!(Config::try_parse_from(["menubar-timer", "--refresh-ms", "0"]).is_err());
    }
}
