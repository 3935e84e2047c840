//! List and show commands

use anyhow::{bail, Result};
use colored::Colorize;
use noterand_core::model::{Effect, Instrument, Octave, Offset, Volume};
use noterand_core::summary::{paginate, PAGE_LENGTH};
use noterand_core::{Database, Scope, StructureId, StructureKind};
use std::process::ExitCode;

use super::structure::describe;
use super::Workspace;

/// Ids of the requested kinds in one graph, kinds in listing order.
fn listed(db: &Database, scope: Scope, kind: Option<StructureKind>) -> Vec<StructureId> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => StructureKind::all().to_vec(),
    };
    kinds
        .into_iter()
        .flat_map(|kind| db.list(scope, kind))
        .collect()
}

/// Run the list command
///
/// # Arguments
/// * `kind` - Only this kind, or every kind
/// * `scope` - Graph to list
/// * `page` - One-based page of [`PAGE_LENGTH`] entries
pub fn list(
    workspace: &Workspace,
    kind: Option<StructureKind>,
    scope: Scope,
    page: usize,
) -> Result<ExitCode> {
    let db = workspace.load()?;
    let ids = listed(&db, scope, kind);
    let pages = paginate(&ids, PAGE_LENGTH);
    let Some(entries) = page.checked_sub(1).and_then(|index| pages.get(index)) else {
        bail!("There is no page {}; the listing has {} page(s)", page, pages.len());
    };

    let what = kind.map_or("Structures".to_string(), |kind| kind.counted(ids.len()));
    println!(
        "{} {} in the {} database (page {}/{})",
        ids.len().to_string().cyan().bold(),
        what,
        scope,
        page,
        pages.len()
    );
    for id in entries {
        println!("  {}", describe(&db, *id));
    }
    Ok(ExitCode::SUCCESS)
}

/// Structures linked to `id`, grouped by role.
pub fn linked(db: &Database, id: StructureId) -> Vec<(&'static str, Vec<StructureId>)> {
    fn ids<I: Copy + Into<StructureId>>(items: impl IntoIterator<Item = I>) -> Vec<StructureId> {
        items.into_iter().map(Into::into).collect()
    }

    match id {
        StructureId::Channel(id) => db
            .channel(id)
            .map(|channel| {
                vec![
                    ("Instruments", ids(channel.instruments.pool.members().iter().copied())),
                    ("Volumes", ids(channel.volumes.pool.members().iter().copied())),
                    ("Effects", ids(channel.effects.pool.members().iter().copied())),
                ]
            })
            .unwrap_or_default(),
        StructureId::Instrument(id) => db
            .get::<Instrument>(id)
            .map(|instrument| {
                vec![
                    ("Octaves", ids(instrument.octaves.members().iter().copied())),
                    ("Volumes", ids(instrument.volumes.members().iter().copied())),
                    ("Offset", ids(instrument.offset())),
                    ("Used by", ids(instrument.used_by().iter().copied())),
                ]
            })
            .unwrap_or_default(),
        StructureId::Octave(id) => db
            .get::<Octave>(id)
            .map(|octave| vec![("Used by", ids(octave.used_by().iter().copied()))])
            .unwrap_or_default(),
        StructureId::Volume(id) => db
            .get::<Volume>(id)
            .map(|volume| {
                let users = volume.used_by();
                let mut used_by = ids(users.channels().iter().copied());
                used_by.extend(ids(users.instruments().iter().copied()));
                vec![("Used by", used_by)]
            })
            .unwrap_or_default(),
        StructureId::Effect(id) => db
            .get::<Effect>(id)
            .map(|effect| vec![("Used by", ids(effect.used_by().iter().copied()))])
            .unwrap_or_default(),
        StructureId::Offset(id) => db
            .get::<Offset>(id)
            .map(|offset| vec![("Used by", ids(offset.used_by().iter().copied()))])
            .unwrap_or_default(),
    }
}

/// Run the show command
pub fn show(workspace: &Workspace, id: StructureId) -> Result<ExitCode> {
    let db = workspace.load()?;
    if !db.contains(id) {
        bail!("No such structure: {}", id);
    }

    println!("{}", describe(&db, id));
    for (role, members) in linked(&db, id) {
        if members.is_empty() {
            continue;
        }
        println!("{}", format!("{}:", role).cyan().bold());
        for member in members {
            println!("  {}", describe(&db, member));
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use noterand_core::model::Channel;
    use noterand_core::{link, ParentId};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn linked_database() -> (Database, StructureId, StructureId, StructureId) {
        let mut db = Database::new();
        let channel = db.add_channel(Channel::default());
        let instrument = db.add(Scope::Root, Instrument::new(1).unwrap());
        let volume = db.add(Scope::Globals, Volume::full('v').unwrap());
        link::attach(&mut db, ParentId::Channel(channel), &[instrument.into(), volume.into()])
            .unwrap();
        link::attach(&mut db, ParentId::Instrument(instrument), &[volume.into()]).unwrap();
        (db, channel.into(), instrument.into(), volume.into())
    }

    #[test]
    fn test_listed_by_scope_and_kind() {
        let (db, channel, instrument, volume) = linked_database();
        assert_eq!(listed(&db, Scope::Root, None), vec![channel, instrument]);
        assert_eq!(listed(&db, Scope::Globals, None), vec![volume]);
        assert_eq!(
            listed(&db, Scope::Root, Some(StructureKind::Volume)),
            Vec::<StructureId>::new()
        );
    }

    #[test]
    fn test_linked_groups() {
        let (db, channel, instrument, volume) = linked_database();
        assert_eq!(
            linked(&db, channel),
            vec![
                ("Instruments", vec![instrument]),
                ("Volumes", vec![volume]),
                ("Effects", vec![]),
            ]
        );
        assert_eq!(linked(&db, volume), vec![("Used by", vec![channel, instrument])]);
    }

    #[test]
    fn test_list_pages() {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("db.json"), Config::default());
        let mut db = Database::new();
        for _ in 0..12 {
            db.add_channel(Channel::default());
        }
        workspace.save(&db).unwrap();

        assert_eq!(list(&workspace, None, Scope::Root, 2).unwrap(), ExitCode::SUCCESS);
        assert!(list(&workspace, None, Scope::Root, 3).is_err());
        assert!(list(&workspace, None, Scope::Root, 0).is_err());
        assert_eq!(list(&workspace, None, Scope::Globals, 1).unwrap(), ExitCode::SUCCESS);
    }
}
