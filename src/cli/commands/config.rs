//! `gearguard config` command - Configuration management
//!
//! Reads and writes the global config file. Works without a backend.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::core::config::DEFAULT_SERVER;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show the path to the configuration file
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Print the raw config file instead of effective values
    #[arg(long)]
    pub file: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., server, page_size)
    pub key: String,

    /// Value to set
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("server", "Backend base URL (default http://localhost:8000)"),
    (
        "default_format",
        "Default output format (yaml, json, tsv, csv, md, id)",
    ),
    ("page_size", "Rows fetched by list commands (1-1000, default 100)"),
    ("read_retries", "Retries for reads after a network failure (default 1)"),
    ("timeout_secs", "HTTP timeout in seconds (default 30)"),
    ("cache_ttl_secs", "Seconds a cached response stays fresh; 0 disables (default 300)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        check_key(key)?;
        match get_config_value(&config, key) {
            Some(v) => println!("{}", v),
            None => return Err(miette::miette!("Key '{}' is not set", key)),
        }
        return Ok(());
    }

    if args.file {
        let path = global_config_path()?;
        println!(
            "{} {}",
            style("Global config:").bold(),
            style(path.display()).dim()
        );
        println!();
        if path.exists() {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        } else {
            println!("{}", style("(not created)").dim());
        }
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        print_config_value(key, get_config_value(&config, key).as_deref());
    }
    println!();
    println!(
        "  {} {}",
        style("resolved server:").dim(),
        style(config.server()).dim()
    );

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. --server flag");
    println!("  2. Environment variables (GEARGUARD_SERVER, GEARGUARD_FORMAT, GEARGUARD_CACHE_TTL)");
    println!("  3. Global config (~/.config/gearguard/config.yaml)");

    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    check_key(&args.key)?;
    let value = parse_value(&args.key, &args.value)?;
    let config_path = global_config_path()?;

    let mut config_map = read_mapping(&config_path)?;
    config_map.insert(serde_yml::Value::String(args.key.clone()), value);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&serde_yml::Value::Mapping(config_map)).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    println!(
        "{} Set {} {} {}",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
    );
    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    check_key(&args.key)?;
    let config_path = global_config_path()?;

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let removed = config_map
        .remove(args.key.as_str())
        .is_some();
    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&serde_yml::Value::Mapping(config_map)).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    println!(
        "{} Removed {} from config",
        style("✓").green(),
        style(&args.key).cyan(),
    );
    Ok(())
}

fn run_path() -> Result<()> {
    let path = global_config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<16} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'gearguard config set <key> <value>' to set a value.").dim()
    );
    Ok(())
}

// Helper functions

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn check_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        return Ok(());
    }
    Err(miette::miette!(
        help = "run `gearguard config keys` to list valid keys",
        "Unknown config key '{}'",
        key
    ))
}

/// Numeric keys are stored as YAML numbers so the file still deserializes
fn parse_value(key: &str, raw: &str) -> Result<serde_yml::Value> {
    let raw = raw.trim();
    match key {
        "page_size" | "read_retries" | "timeout_secs" | "cache_ttl_secs" => raw
            .parse::<u64>()
            .map(|n| serde_yml::Value::Number(n.into()))
            .map_err(|_| miette::miette!("'{}' expects a whole number, got '{}'", key, raw)),
        "default_format" => match OutputFormat::from_str_ci(raw) {
            Some(_) => Ok(serde_yml::Value::String(raw.to_lowercase())),
            None => Err(miette::miette!("'{}' is not an output format", raw)),
        },
        "server" => {
            if !(raw.starts_with("http://") || raw.starts_with("https://")) {
                return Err(miette::miette!(
                    "server must start with http:// or https:// (e.g. {})",
                    DEFAULT_SERVER
                ));
            }
            Ok(serde_yml::Value::String(raw.trim_end_matches('/').to_string()))
        }
        _ => Ok(serde_yml::Value::String(raw.to_string())),
    }
}

fn read_mapping(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content) {
        Ok(serde_yml::Value::Mapping(map)) => Ok(map),
        // Empty or null file
        Ok(serde_yml::Value::Null) => Ok(serde_yml::Mapping::new()),
        Ok(_) | Err(_) => Err(miette::miette!(
            "Config file is not a YAML mapping: {}",
            path.display()
        )),
    }
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "server" => config.server.clone(),
        "default_format" => config.default_format.clone(),
        "page_size" => config.page_size.map(|v| v.to_string()),
        "read_retries" => config.read_retries.map(|v| v.to_string()),
        "timeout_secs" => config.timeout_secs.map(|v| v.to_string()),
        "cache_ttl_secs" => config.cache_ttl_secs.map(|v| v.to_string()),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_keys_stored_as_numbers() {
        let value = parse_value("page_size", "50").unwrap();
        assert_eq!(value, serde_yml::Value::Number(50u64.into()));
        assert!(parse_value("page_size", "fifty").is_err());
    }

    #[test]
    fn test_server_value_checked() {
        assert!(parse_value("server", "localhost:8000").is_err());
        assert_eq!(
            parse_value("server", "https://gg.example.com/").unwrap(),
            serde_yml::Value::String("https://gg.example.com".to_string())
        );
    }

    #[test]
    fn test_format_value_checked() {
        assert!(parse_value("default_format", "JSON").is_ok());
        assert!(parse_value("default_format", "xml").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(check_key("author").is_err());
        assert!(check_key("cache_ttl_secs").is_ok());
    }

    #[test]
    fn test_written_mapping_loads_as_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut map = serde_yml::Mapping::new();
        map.insert(
            serde_yml::Value::String("page_size".to_string()),
            parse_value("page_size", "25").unwrap(),
        );
        fs::write(&path, serde_yml::to_string(&serde_yml::Value::Mapping(map)).unwrap()).unwrap();

        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.page_size(), 25);
        assert_eq!(read_mapping(&path).unwrap().len(), 1);
    }
}
