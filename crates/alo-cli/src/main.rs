// SPDX-License-Identifier: MIT

mod console;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde_json::json;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use alo_core::conflict::ConflictScanner;
use alo_core::discovery::DiscoveryManager;
use alo_core::install::{InstallOutcome, Installer, Operator};
use alo_core::livery::LiveryPair;
use alo_core::AircraftDir;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to import liveries from
    #[arg(short, long, env = "ALO_SOURCE")]
    source: Option<PathBuf>,

    /// Aircraft directory to import liveries into
    #[arg(short, long, env = "ALO_TARGET")]
    target: Option<PathBuf>,

    /// Assume yes for every confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report discovered liveries, validity and conflicts without installing
    Scan {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy liveries and merge their config entries (default)
    Install,
}

struct ConsoleOperator;

impl Operator for ConsoleOperator {
    fn say(&mut self, msg: &str) {
        println!("{msg}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let source = resolve_source(&cli, &mut input, &mut output)?;
    let pairs = DiscoveryManager::find_liveries(&source)?;

    let sim_types = DiscoveryManager::distinct_sim_types(&pairs);
    if sim_types.len() > 1 {
        bail!(
            "Multiple aircraft sim types detected in this directory ({}). \
             Processing multiple sim types is not supported.",
            sim_types.join(", ")
        );
    }

    match &cli.command {
        Some(Commands::Scan { json }) => scan(&cli, pairs, *json),
        Some(Commands::Install) | None => install(&cli, pairs, &mut input, &mut output),
    }
}

fn resolve_source<R: BufRead, W: Write>(
    cli: &Cli,
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf> {
    if let Some(source) = &cli.source {
        if !source.is_dir() {
            bail!("Source directory does not exist: {}", source.display());
        }
        return Ok(source.clone());
    }

    writeln!(output, "Please enter a directory to import the liveries from:")?;
    Ok(console::prompt_directory(
        input,
        output,
        |_, _: &mut W| Ok(true),
        false,
    )?)
}

/// Reports what a run would do, without touching anything.
fn scan(cli: &Cli, mut pairs: Vec<LiveryPair>, as_json: bool) -> Result<()> {
    // Conflicts can only be reported against a target; without one the
    // report covers discovery and validity.
    let mut scanned_target = None;
    if let Some(target_path) = &cli.target {
        if let Some(sim) = pairs.iter().find_map(|p| p.sim_type()) {
            let target = AircraftDir::new(target_path, &sim)?;
            ConflictScanner::scan(&target, &mut pairs)?;
            scanned_target = Some(target.root);
        }
    }

    let reports: Vec<_> = pairs.iter().map(|p| p.report()).collect();

    if as_json {
        let doc = json!({
            "target": scanned_target,
            "liveries": reports,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    for report in &reports {
        let status = if !report.valid {
            "[!]"
        } else if report.file_conflict || report.config_conflict {
            "[C]"
        } else {
            "[x]"
        };
        println!(
            "{status} {} (sim={}) {}",
            report.texture_folder_name.as_deref().unwrap_or("<no texture>"),
            report.sim_type.as_deref().unwrap_or("?"),
            report.source_dir.display()
        );
    }
    println!("{} liveries discovered.", reports.len());
    Ok(())
}

fn install<R: BufRead, W: Write>(
    cli: &Cli,
    pairs: Vec<LiveryPair>,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let (valid, invalid): (Vec<_>, Vec<_>) = pairs.into_iter().partition(|p| p.is_valid());

    if !invalid.is_empty() {
        writeln!(
            output,
            "{} liveries were invalid. Would you like to view these invalid pairs? (Y/N)",
            invalid.len()
        )?;
        if !cli.yes && console::read_yes_no(input, output, true)? {
            for pair in &invalid {
                writeln!(
                    output,
                    "Directory: {}\r\nConfig:\r\n{}\r\n",
                    pair.source_dir.display(),
                    pair.config_block().join("\r\n")
                )?;
            }
        }
    }

    if valid.is_empty() {
        bail!("No valid liveries found.");
    }

    writeln!(
        output,
        "Found {} valid liveries. Would you like to list these liveries? (Y/N)",
        valid.len()
    )?;
    if !cli.yes && console::read_yes_no(input, output, true)? {
        for pair in &valid {
            writeln!(output, "{}", pair.source_dir.display())?;
        }
    }

    let sim_type = match valid.iter().find_map(|p| p.sim_type()) {
        Some(sim) => sim,
        None => bail!("The livery config entries do not name a sim= aircraft type."),
    };

    let target = resolve_target(cli, &sim_type, input, output)?;

    let mut valid = valid;
    ConflictScanner::scan(&target, &mut valid)?;

    let conflicting: Vec<_> = valid.iter().filter(|p| p.has_conflict()).collect();
    if !conflicting.is_empty() {
        writeln!(
            output,
            "{} conflicts were detected. Do you wish to review these conflicts? (Y/N)",
            conflicting.len()
        )?;
        if !cli.yes && console::read_yes_no(input, output, true)? {
            for pair in &conflicting {
                writeln!(
                    output,
                    "{}: {}",
                    pair.texture_folder_name().unwrap_or_default(),
                    conflict_message(pair)
                )?;
            }
        }
    }

    if !cli.yes {
        writeln!(
            output,
            "Install {} liveries into {}? (Y/N)",
            valid.len(),
            target.root.display()
        )?;
        if !console::read_yes_no(input, output, true)? {
            writeln!(output, "Aborted.")?;
            return Ok(());
        }
    }

    let report = match Installer::new(&target).run(valid, &mut ConsoleOperator) {
        Ok(report) => report,
        Err(e) => {
            writeln!(
                output,
                "An error has occurred. Config file recovered from backup."
            )?;
            return Err(e.into());
        }
    };

    let installed = report
        .items
        .iter()
        .filter(|(_, o)| matches!(o, InstallOutcome::Installed { .. }))
        .count();
    writeln!(
        output,
        "Installation complete. {installed} of {} liveries added to the config (backup at {}).",
        report.items.len(),
        report.backup_path.display()
    )?;
    Ok(())
}

fn resolve_target<R: BufRead, W: Write>(
    cli: &Cli,
    sim_type: &str,
    input: &mut R,
    output: &mut W,
) -> Result<AircraftDir> {
    if let Some(target) = &cli.target {
        return Ok(AircraftDir::new(target, sim_type)?);
    }

    writeln!(output, "Please enter the directory to import the liveries to:")?;
    let path = console::prompt_directory(
        input,
        output,
        |p, out: &mut W| match AircraftDir::new(p, sim_type) {
            Ok(_) => Ok(true),
            Err(e) => {
                writeln!(out, "{e}\r\nPlease try again.")?;
                Ok(false)
            }
        },
        true,
    )?;
    Ok(AircraftDir::new(path, sim_type)?)
}

fn conflict_message(pair: &LiveryPair) -> &'static str {
    match (pair.file_conflict, pair.config_conflict) {
        (true, true) => "The livery is already installed. (Will ignore this livery upon installation)",
        (true, false) => "The texture directory already exists but is not configured. (Resolvable)",
        (false, true) => "The texture is configured but corresponding directory is missing. (Resolvable)",
        (false, false) => "No conflicts detected.",
    }
}
