//! Produce command implementation
//!
//! Turns the database into OpenMPT pattern text. Unset options fall back to
//! the config file; a line count of 0 there means "ask", and a run count of 0
//! means "ask whether to produce again after each pattern".

use anyhow::{Context, Result};
use colored::Colorize;
use noterand_core::produce::{create_rng, produce, produce_run, ProductionSettings, Run};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::Workspace;
use crate::prompt::{FileMode, Prompter};

/// Command-line options for `produce`.
#[derive(Debug, Clone, Default)]
pub struct ProduceOptions {
    pub lines: Option<usize>,
    pub runs: Option<usize>,
    pub seed: Option<u32>,
    pub out: Option<PathBuf>,
    pub overwrite: bool,
}

/// Run the produce command
///
/// # Returns
/// Exit code: 0 success (including when the user declines every file)
pub fn run(
    workspace: &Workspace,
    options: &ProduceOptions,
    prompter: &mut impl Prompter,
) -> Result<ExitCode> {
    let db = workspace.load()?;
    let config = &workspace.config.production;

    let default = options.out.as_ref().unwrap_or(&config.filename);
    let Some(path) = prompter.choose_destination_file(
        "Enter the name of a file to write the tracker notes to.",
        FileMode::Write,
        Some(default.as_path()),
        options.overwrite || config.overwrite,
    )?
    else {
        println!("{} Nothing produced", "!".yellow());
        return Ok(ExitCode::SUCCESS);
    };

    let seed = options.seed.unwrap_or_else(rand::random);
    println!("{} {}", "Seed:".cyan().bold(), seed);
    let mut rng = create_rng(seed);

    let lines = options.lines.or((config.lines > 0).then_some(config.lines));
    let runs = options.runs.unwrap_or(config.runs);

    if runs == 0 {
        loop {
            let lines = lines_wanted(lines, prompter)?;
            let run = produce_run(&db, lines, &mut rng);
            write_run(&path, &run.text, run.channels_used, lines)?;
            report_warnings(&run);
            if !prompter.ask_yes_no("Repeat? Y/N")? {
                break;
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let lines = lines_wanted(lines, prompter)?;
    let production = produce(&db, ProductionSettings { lines, runs }, &mut rng);
    for (index, text) in production.runs.iter().enumerate() {
        let target = numbered(&path, index + 1, runs);
        write_run(&target, text, production.channels_used, lines)?;
    }
    for warning in &production.warnings {
        eprintln!("{} {}", "!".yellow(), warning);
    }
    Ok(ExitCode::SUCCESS)
}

fn lines_wanted(configured: Option<usize>, prompter: &mut impl Prompter) -> Result<usize> {
    if let Some(lines) = configured {
        println!("Automatically writing {} lines.", lines);
        return Ok(lines);
    }
    let lines =
        prompter.ask_bounded_number("Enter how many lines you want to generate.", 1, None, false)?;
    Ok(lines as usize)
}

/// `path` for a single run; `stem-N.ext` for each of several runs.
fn numbered(path: &Path, index: usize, runs: usize) -> PathBuf {
    if runs <= 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(extension) => format!("{}-{}.{}", stem, index, extension.to_string_lossy()),
        None => format!("{}-{}", stem, index),
    };
    path.with_file_name(name)
}

fn write_run(path: &Path, text: &str, channels: usize, lines: usize) -> Result<()> {
    fs::write(path, text)
        .with_context(|| format!("Failed to write pattern file: {}", path.display()))?;
    if channels == 0 {
        eprintln!(
            "{} No active channels; {} holds only the header",
            "!".yellow(),
            path.display()
        );
    }
    println!(
        "{} Wrote {} lines x {} channels to {}",
        "SUCCESS".green().bold(),
        lines,
        channels,
        path.display()
    );
    Ok(())
}

fn report_warnings(run: &Run) {
    for warning in &run.warnings {
        eprintln!("{} {}", "!".yellow(), warning);
    }
}
