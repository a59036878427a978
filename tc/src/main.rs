//! tc - compile-once Handlebars template cache
//!
//! CLI entry point for rendering, listing, checking and wrapping templates.

use std::fs;
use std::io::Read;
use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::info;

use templatecache::cli::{Cli, Command};
use templatecache::config::Config;
use templatecache::{LayeredSource, TemplateCache, TemplateSource, script_block};

fn setup_logging(verbose: bool) -> Result<()> {
    // Logs go to stderr so rendered output on stdout stays clean
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if !cli.sources.is_empty() {
        config.override_sources(&cli.sources);
    }

    match cli.command {
        Command::Render { name, data } => cmd_render(&config, &name, data.as_deref()),
        Command::List => cmd_list(&config),
        Command::Check => cmd_check(&config),
        Command::Wrap { name, file, ember } => cmd_wrap(&config, &name, file.as_deref(), ember),
    }
}

/// Render one template to stdout
fn cmd_render(config: &Config, name: &str, data: Option<&Path>) -> Result<()> {
    let cache = config.build_cache()?;
    let context = match data {
        Some(path) => load_data(path)?,
        None => serde_json::json!({}),
    };

    let output = cache.render(name, &context)?;
    println!("{}", output);
    Ok(())
}

/// Print every resolvable template name
fn cmd_list(config: &Config) -> Result<()> {
    let source = config.build_source()?;
    let names = source.names()?;

    if names.is_empty() {
        println!("No templates found");
        println!("Sources searched: {}", source.describe());
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Compile everything, report per-template status
fn cmd_check(config: &Config) -> Result<()> {
    let cache: TemplateCache<LayeredSource> = config.build_cache()?;
    let failures = cache.preload()?;

    for name in cache.names() {
        println!("{} {}", "✓".green(), name);
    }
    for failure in &failures {
        println!("{} {}: {}", "✗".red(), failure.name, failure.error);
    }

    let total = cache.len() + failures.len();
    if failures.is_empty() {
        println!("{} templates compiled", total);
        Ok(())
    } else {
        Err(eyre!("{} of {} templates failed to compile", failures.len(), total))
    }
}

/// Print template source wrapped in a script block
fn cmd_wrap(config: &Config, name: &str, file: Option<&Path>, ember: bool) -> Result<()> {
    let body = match file {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read template from stdin")?;
            body
        }
    };

    let style = if ember {
        templatecache::ScriptStyle::Ember
    } else {
        config.markup.style()
    };
    println!("{}", script_block(name, &body, style)?);
    Ok(())
}

/// Load a render context; `.json` files as JSON, anything else as YAML
fn load_data(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path).context(format!("Failed to read data file {}", path.display()))?;

    let value = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&content).context("Failed to parse JSON data")?
    } else {
        serde_yaml::from_str(&content).context("Failed to parse YAML data")?
    };
    Ok(value)
}
