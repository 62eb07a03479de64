//! Amalgam CLI
//!
//! Command-line interface for merging a C/C++ library into a single header
//! and a single implementation file.

use amalgam_core::Config;
use amalgam_merge::{scan_undeclared, EmitReport, Pipeline};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "amalgam")]
#[command(author, version, about = "Single-file amalgamation tool for C/C++ libraries", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProjectArgs {
    /// Manifest/config file (YAML or JSON); the built-in catboost layout when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project root, overrides the config value
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,
}

impl ProjectArgs {
    fn load(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::builtin(),
        };
        if let Some(root) = &self.root {
            config.project_root = root.clone();
        }
        debug!("Using project root {}", config.project_root.display());
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the amalgamated header and source file
    Build {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output directory, overrides the config value
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Report format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check that every declared unit is readable, without writing anything
    Check {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// List library files that are not in the manifest
    Scan {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Print the effective configuration as YAML
    Manifest {
        #[command(flatten)]
        project: ProjectArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build {
            project,
            output,
            format,
        } => {
            let mut config = project.load()?;
            if let Some(output) = output {
                config.output.directory = output;
            }
            cmd_build(&config, &format)?;
        }
        Commands::Check { project } => {
            cmd_check(&project.load()?)?;
        }
        Commands::Scan { project } => {
            cmd_scan(&project.load()?)?;
        }
        Commands::Manifest { project } => {
            print!("{}", project.load()?.to_yaml()?);
        }
    }

    Ok(())
}

fn cmd_build(config: &Config, format: &str) -> Result<()> {
    let report = Pipeline::new(config).emit()?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        "text" => print_build_summary(&report),
        _ => bail!("Unknown format: {}", format),
    }

    Ok(())
}

fn print_build_summary(report: &EmitReport) {
    println!(
        "📦 Amalgamated {} header units, {} source units",
        report.header_units.len(),
        report.source_units.len()
    );
    println!("   Header: {}", report.header.display());
    println!("   Source: {}", report.source.display());
    println!();
    println!("📊 Summary:");
    println!("   Inlined files: {}", report.registry_size);
    println!("   Suppressed includes: {}", report.suppressed());
    println!("   Stripped #pragma once: {}", report.pragmas_stripped());

    let unmatched = report.unmatched();
    if !unmatched.is_empty() {
        println!();
        println!("⚠️  Local includes left in place:");
        for inc in unmatched {
            println!("   {}:{} \"{}\"", inc.unit, inc.line, inc.target);
        }
    }
}

fn cmd_check(config: &Config) -> Result<()> {
    let report = Pipeline::new(config).check();

    println!("🔍 Checking {} units under {}", config.manifest.len(), config.project_root.display());
    println!();

    println!("   Inlined files:");
    for name in &report.registry {
        println!("     {}", name);
    }

    for unit in &report.units {
        println!(
            "   ✓ {} ({} lines, {} suppressed, {} external)",
            unit.path, unit.lines, unit.suppressed, unit.external
        );
    }

    for inc in report.unmatched() {
        println!("   ⚠️  {}:{} local include \"{}\" is not inlined", inc.unit, inc.line, inc.target);
    }

    for path in &report.missing {
        println!("   ✗ {} (missing)", path.display());
    }

    for path in &report.invalid {
        println!("   ✗ {} (not valid UTF-8)", path.display());
    }

    if !report.is_ok() {
        bail!(
            "{} declared unit(s) cannot be read",
            report.missing.len() + report.invalid.len()
        );
    }

    Ok(())
}

fn cmd_scan(config: &Config) -> Result<()> {
    let undeclared = scan_undeclared(config);

    if undeclared.is_empty() {
        println!("  (All library files are declared)");
        return Ok(());
    }

    println!("📂 Files not in the manifest:");
    for path in &undeclared {
        println!("  {}", path.display());
    }

    Ok(())
}
