use std::path::PathBuf;
use std::process;

use canteenbot::Config;
use canteenbot::config::DEFAULT_CONFIG_PATH;
use clap::{Args, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Options shared by every canteenbot binary. All of them have defaults so
/// the binaries can be run from cron without arguments.
#[derive(Debug, Args)]
pub struct CommonArgs {
    #[arg(
        short = 'c',
        long = "config",
        env = "CANTEENBOT_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "Path to the JSON config file"
    )]
    pub config: PathBuf,

    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    pub log_level: LogLevel,
}

impl CommonArgs {
    pub fn init_logging(&self) {
        env_logger::Builder::new()
            .filter_level(self.log_level.clone().into())
            .init();
    }

    /// Loads the config or exits, before anything touches the network.
    pub fn load_config(&self) -> Config {
        Config::load(&self.config).unwrap_or_else(|e| {
            log::error!("Error loading config: {}", e);
            process::exit(1);
        })
    }
}

pub fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}
