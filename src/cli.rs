use crate::models::TemperatureUnit;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "weatherdash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// City to show on startup instead of the configured default
    #[arg(long)]
    pub city: Option<String>,

    /// Temperature unit (celsius or fahrenheit)
    #[arg(short, long, value_parser = parse_unit)]
    pub unit: Option<TemperatureUnit>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Validate config and test the WeatherAPI connection
    Check,
}

fn parse_unit(s: &str) -> Result<TemperatureUnit, String> {
    TemperatureUnit::from_str(s).ok_or_else(|| format!("unknown unit '{}'", s))
}
