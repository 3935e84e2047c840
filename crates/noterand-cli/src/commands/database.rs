//! Whole-database commands: init, merge and wipe.

use anyhow::{Context, Result};
use colored::Colorize;
use noterand_core::{Database, MergeMode};
use std::path::Path;
use std::process::ExitCode;

use super::Workspace;
use crate::prompt::{FileMode, Prompter};

/// Run the init command
///
/// Writes an empty database, or the configured `database.load` file
/// appended to one, to a file the user confirms.
pub fn init(workspace: &Workspace, prompter: &mut impl Prompter) -> Result<ExitCode> {
    let Some(path) = prompter.choose_destination_file(
        "Enter a name for the database file.",
        FileMode::Write,
        Some(workspace.path.as_path()),
        workspace.config.database.overwrite,
    )?
    else {
        println!("{} No database written", "!".yellow());
        return Ok(ExitCode::SUCCESS);
    };

    let mut db = Database::new();
    if let Some(load) = &workspace.config.database.load {
        db.load_merge(load, MergeMode::Append)
            .with_context(|| format!("Failed to load database: {}", load.display()))?;
        println!(
            "{} {} structures from {}",
            "Loaded:".cyan().bold(),
            db.all_ids().len(),
            load.display()
        );
    }

    Workspace::new(&path, workspace.config.clone()).save(&db)?;
    println!(
        "{} Created database: {}",
        "SUCCESS".green().bold(),
        path.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run the merge command
///
/// # Arguments
/// * `file` - Database file to load
/// * `mode` - Replace this database or append to it
pub fn merge(workspace: &Workspace, file: &Path, mode: MergeMode) -> Result<ExitCode> {
    let mut db = workspace.load()?;
    db.load_merge(file, mode)
        .with_context(|| format!("Failed to load database: {}", file.display()))?;
    workspace.save(&db)?;

    let verb = match mode {
        MergeMode::Replace => "Replaced with",
        MergeMode::Append => "Appended",
    };
    println!(
        "{} {} {} ({} structures now)",
        "SUCCESS".green().bold(),
        verb,
        file.display(),
        db.all_ids().len()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run the wipe command, asking first unless `yes` is set.
pub fn wipe(workspace: &Workspace, yes: bool, prompter: &mut impl Prompter) -> Result<ExitCode> {
    let mut db = workspace.load()?;
    let prompt = format!(
        "Remove all {} structures from {}? Y/N",
        db.all_ids().len(),
        workspace.path.display()
    );
    if !yes && !prompter.ask_yes_no(&prompt)? {
        println!("{} Nothing removed", "!".yellow());
        return Ok(ExitCode::SUCCESS);
    }
    db.wipe();
    workspace.save(&db)?;

    println!("{} Database wiped", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}
