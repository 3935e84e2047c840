//! Structure commands: add, edit, remove, copy, toggle and move.

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use noterand_core::summary::summary;
use noterand_core::{Database, Scope, StructureId, StructureKind};
use std::process::ExitCode;

use super::{fields, Workspace};
use crate::cli_args::FieldArgs;

/// `id` followed by its one-line summary.
pub(crate) fn describe(db: &Database, id: StructureId) -> String {
    match summary(db, id) {
        Some(text) => format!("{} {}", id.to_string().bold(), text),
        None => id.to_string(),
    }
}

/// Run the add command
///
/// # Arguments
/// * `workspace` - Database file and settings
/// * `kind` - Kind of structure to create
/// * `scope` - Graph to add it to
/// * `fields` - Field values; unset fields take their defaults
pub fn add(
    workspace: &Workspace,
    kind: StructureKind,
    scope: Scope,
    fields: &FieldArgs,
) -> Result<ExitCode> {
    let structure = fields::build(kind, fields)?;
    let mut db = workspace.load()?;
    let id = db.insert(scope, structure)?;
    workspace.save(&db)?;

    println!("{} Added {}", "SUCCESS".green().bold(), describe(&db, id));
    Ok(ExitCode::SUCCESS)
}

pub fn edit(workspace: &Workspace, id: StructureId, fields: &FieldArgs) -> Result<ExitCode> {
    if fields.given().is_empty() {
        bail!("Nothing to change for {}; pass at least one field", id);
    }
    let mut db = workspace.load()?;
    fields::apply(&mut db, id, fields)?;
    workspace.save(&db)?;

    println!("{} Edited {}", "SUCCESS".green().bold(), describe(&db, id));
    Ok(ExitCode::SUCCESS)
}

/// Run the remove command
///
/// Every id is checked before anything is removed.
pub fn remove(workspace: &Workspace, ids: &[StructureId]) -> Result<ExitCode> {
    let mut db = workspace.load()?;
    let scopes = ids
        .iter()
        .map(|id| {
            db.scope_of(*id)
                .map(|scope| (*id, scope))
                .ok_or_else(|| anyhow!("No such structure: {}", id))
        })
        .collect::<Result<Vec<_>>>()?;
    for (id, scope) in scopes {
        db.remove(scope, id)?;
        println!("  {} {}", "-".red(), id);
    }
    workspace.save(&db)?;

    println!("{} Removed {} structure(s)", "SUCCESS".green().bold(), ids.len());
    Ok(ExitCode::SUCCESS)
}

pub fn copy(workspace: &Workspace, id: StructureId) -> Result<ExitCode> {
    let mut db = workspace.load()?;
    let copy = db.duplicate(id)?;
    workspace.save(&db)?;

    println!(
        "{} Copied {} to {}",
        "SUCCESS".green().bold(),
        id,
        describe(&db, copy)
    );
    Ok(ExitCode::SUCCESS)
}

/// Run the toggle command, flipping a Channel's mute flag.
pub fn toggle(workspace: &Workspace, id: StructureId) -> Result<ExitCode> {
    let StructureId::Channel(channel) = id else {
        bail!("Only Channels can be muted; {} is a {}", id, id.kind().name());
    };
    let mut db = workspace.load()?;
    let muted = db.toggle_muted(channel)?;
    workspace.save(&db)?;

    let state = if muted { "muted" } else { "unmuted" };
    println!("{} {} is now {}", "SUCCESS".green().bold(), id, state);
    Ok(ExitCode::SUCCESS)
}

/// Run the move command. The structure keeps its id and its links.
pub fn move_to(workspace: &Workspace, id: StructureId, scope: Scope) -> Result<ExitCode> {
    let mut db = workspace.load()?;
    db.move_to(id, scope)?;
    workspace.save(&db)?;

    println!(
        "{} Moved {} to the {} database",
        "SUCCESS".green().bold(),
        id,
        scope
    );
    Ok(ExitCode::SUCCESS)
}
