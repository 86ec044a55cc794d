//! `repmat config` command - Configuration inspection
//!
//! Configuration is read-only from the CLI; edit the YAML files directly.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::PROJECT_CONFIG_FILE;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only project-level config
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str, &str)] = &[
    ("key_prefix", "REPMAT_KEY_PREFIX", "Context prefix of rendered selection keys"),
    ("currency", "REPMAT_CURRENCY", "Currency shown with prices"),
    ("warehouse", "REPMAT_WAREHOUSE", "Warehouse label shown in part details"),
    (
        "default_format",
        "REPMAT_FORMAT",
        "Default output format (yaml, json, tsv, etc.)",
    ),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        if !VALID_KEYS.iter().any(|(k, _, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                help = "run 'repmat config keys' to list known keys",
                "Unknown configuration key '{}'",
                key
            ));
        }
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    if args.project_only {
        return show_config_file("Project config:", Path::new(PROJECT_CONFIG_FILE));
    }
    if args.global_only {
        return show_config_file("Global config:", &get_global_config_path()?);
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&config).into_diagnostic()?);
        }
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();

            for (key, _, _) in VALID_KEYS {
                print_config_value(key, get_config_value(&config, key).as_deref());
            }

            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Environment variables (REPMAT_KEY_PREFIX, REPMAT_CURRENCY, ...)");
            println!("  2. Project config ({})", PROJECT_CONFIG_FILE);
            println!("  3. Global config (~/.config/repmat/config.yaml)");
        }
    }

    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = get_global_config_path()?;
    let project_path = PathBuf::from(PROJECT_CONFIG_FILE);

    println!("{}", style("Configuration file paths:").bold());
    println!();
    for (label, path) in [("Global:", &global_path), ("Project:", &project_path)] {
        println!("  {:<9} {}", style(label).cyan(), path.display());
        if path.exists() {
            println!("            {}", style("(exists)").green());
        } else {
            println!("            {}", style("(not created)").dim());
        }
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, env, description) in VALID_KEYS {
        println!(
            "  {:<16} {:<20} {}",
            style(key).cyan(),
            style(env).yellow(),
            style(description).dim()
        );
    }

    Ok(())
}

fn get_global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "key_prefix" => Some(config.key_prefix().to_string()),
        "currency" => Some(config.currency().to_string()),
        "warehouse" => config.warehouse.clone(),
        "default_format" => config.default_format.clone(),
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

fn show_config_file(title: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(title).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }

    Ok(())
}
