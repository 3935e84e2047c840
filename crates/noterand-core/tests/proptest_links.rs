//! Property-based tests for link symmetry and spacing countdowns.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p noterand-core --test proptest_links
//! ```

use proptest::prelude::*;

use noterand_core::model::{Channel, Effect, Instrument, Octave, Offset, Range, Volume};
use noterand_core::produce::{create_rng, Countdown};
use noterand_core::{link, Database, ParentId, Scope, StructureId, StructureKind};

// ============================================================================
// 1. Link Symmetry
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Attach(usize, Vec<usize>),
    Detach(usize, usize),
    DetachAll(usize),
    Remove(usize),
    Move(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..16usize, prop::collection::vec(0..16usize, 1..4)).prop_map(|(p, c)| Op::Attach(p, c)),
        (0..16usize, 0..16usize).prop_map(|(p, c)| Op::Detach(p, c)),
        (0..16usize).prop_map(Op::DetachAll),
        (0..16usize).prop_map(Op::Remove),
        (0..16usize).prop_map(Op::Move),
    ]
}

/// Sixteen structures, a few of every kind, spread over both graphs.
fn populated() -> (Database, Vec<StructureId>) {
    let mut db = Database::new();
    let mut ids = Vec::new();
    for i in 0..3u32 {
        let scope = if i == 2 { Scope::Globals } else { Scope::Root };
        ids.push(db.add_channel(Channel::default()).into());
        ids.push(db.add(scope, Instrument::new(i + 1).unwrap()).into());
        ids.push(db.add(scope, Octave::default()).into());
        ids.push(db.add(scope, Volume::full('v').unwrap()).into());
        ids.push(db.add(scope, Effect::new('A', Range::default()).unwrap()).into());
    }
    ids.push(db.add(Scope::Root, Offset::default()).into());
    (db, ids)
}

fn apply(db: &mut Database, ids: &[StructureId], op: &Op) {
    match op {
        Op::Attach(parent, children) => {
            if let Ok(parent) = ParentId::try_from(ids[*parent]) {
                let children: Vec<StructureId> = children.iter().map(|c| ids[*c]).collect();
                let _ = link::attach(db, parent, &children);
            }
        }
        Op::Detach(parent, child) => {
            if let Ok(parent) = ParentId::try_from(ids[*parent]) {
                let _ = link::detach(db, parent, ids[*child]);
            }
        }
        Op::DetachAll(index) => {
            let _ = link::detach_all(db, ids[*index]);
        }
        Op::Remove(index) => {
            if let Some(scope) = db.scope_of(ids[*index]) {
                db.remove(scope, ids[*index]).unwrap();
            }
        }
        Op::Move(index) => {
            let id = ids[*index];
            if id.kind() != StructureKind::Channel {
                let target = match db.scope_of(id) {
                    Some(Scope::Root) => Scope::Globals,
                    _ => Scope::Root,
                };
                let _ = db.move_to(id, target);
            }
        }
    }
}

proptest! {
    /// Any sequence of link and database edits leaves the links symmetric.
    #[test]
    fn links_stay_symmetric(ops in prop::collection::vec(op(), 0..40)) {
        let (mut db, ids) = populated();
        for op in &ops {
            apply(&mut db, &ids, op);
            let problems = link::check(&db);
            prop_assert!(problems.is_empty(), "after {:?}: {:?}", op, problems);
        }
    }

    /// Repeating an attach never changes member lists.
    #[test]
    fn attach_is_idempotent(children in prop::collection::vec(0..16usize, 1..6)) {
        let (mut db, ids) = populated();
        let parent = ParentId::try_from(ids[0]).unwrap();
        let children: Vec<StructureId> = children
            .iter()
            .map(|c| ids[*c])
            .filter(|c| link::check_compatible(parent.kind(), c.kind()).is_ok())
            .collect();
        link::attach(&mut db, parent, &children).unwrap();
        let once = db.clone();
        prop_assert_eq!(link::attach(&mut db, parent, &children), Ok(0));
        prop_assert_eq!(db, once);
    }
}

// ============================================================================
// 2. Spacing Bounds
// ============================================================================

proptest! {
    /// A countdown reseeds within its spacing and fires exactly when it was
    /// at zero before the tick.
    #[test]
    fn countdown_stays_in_spacing(low in 0u32..20, extra in 0u32..20, seed in any::<u32>()) {
        let spacing = Range::new(low, low + extra);
        let mut rng = create_rng(seed);
        let mut countdown = Countdown::armed();
        for _ in 0..200 {
            let before = countdown.remaining();
            let fired = countdown.tick(spacing, &mut rng);
            prop_assert_eq!(fired, before == 0);
            if fired {
                prop_assert!(spacing.contains(countdown.remaining()));
            } else {
                prop_assert_eq!(countdown.remaining(), before - 1);
            }
        }
    }
}
