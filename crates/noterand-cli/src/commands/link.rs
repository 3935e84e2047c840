//! Link and unlink commands

use anyhow::Result;
use colored::Colorize;
use noterand_core::{link, LinkError, ParentId, StructureId};
use std::process::ExitCode;

use super::Workspace;

fn parent_id(id: StructureId) -> Result<ParentId, LinkError> {
    ParentId::try_from(id).map_err(LinkError::NotAParent)
}

/// Run the link command
///
/// # Arguments
/// * `parent` - Channel or Instrument to attach to
/// * `children` - Structures to attach, in order
pub fn attach(
    workspace: &Workspace,
    parent: StructureId,
    children: &[StructureId],
) -> Result<ExitCode> {
    let parent = parent_id(parent)?;
    let mut db = workspace.load()?;
    let created = link::attach(&mut db, parent, children)?;
    workspace.save(&db)?;

    if created == 0 {
        println!("{} Already linked to {}", "SUCCESS".green().bold(), parent);
    } else {
        println!(
            "{} Linked {} structure(s) to {}",
            "SUCCESS".green().bold(),
            created,
            parent
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub fn detach(workspace: &Workspace, parent: StructureId, child: StructureId) -> Result<ExitCode> {
    let parent = parent_id(parent)?;
    let mut db = workspace.load()?;
    if !link::detach(&mut db, parent, child)? {
        println!("{} {} is not linked to {}", "!".yellow(), child, parent);
        return Ok(ExitCode::SUCCESS);
    }
    workspace.save(&db)?;

    println!(
        "{} Unlinked {} from {}",
        "SUCCESS".green().bold(),
        child,
        parent
    );
    Ok(ExitCode::SUCCESS)
}
