//! Check command implementation
//!
//! Verifies that every link in the database file is recorded on both sides.

use anyhow::{Context, Result};
use colored::Colorize;
use noterand_core::{persist, PersistError};
use std::process::ExitCode;

use super::Workspace;

/// Run the check command
///
/// # Returns
/// Exit code: 0 consistent, 1 problems found
pub fn run(workspace: &Workspace) -> Result<ExitCode> {
    println!(
        "{} {}",
        "Checking:".cyan().bold(),
        workspace.path.display()
    );

    let problems = match persist::load(&workspace.path) {
        Ok(db) => {
            println!(
                "{} {} structures, all links consistent",
                "SUCCESS".green().bold(),
                db.all_ids().len()
            );
            return Ok(ExitCode::SUCCESS);
        }
        Err(PersistError::BrokenLinks(problems)) => problems,
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to load database: {}", workspace.path.display()))
        }
    };

    for problem in &problems {
        println!("  {} {}", "x".red(), problem);
    }
    println!(
        "{} {} link problem(s) found",
        "FAILED".red().bold(),
        problems.len()
    );
    Ok(ExitCode::from(1))
}
