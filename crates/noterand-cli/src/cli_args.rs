//! CLI argument definitions for the noterand command-line interface.
//!
//! All `#[derive(Parser)]`, `#[derive(Subcommand)]` and `#[derive(Args)]`
//! types are defined here, keeping `main.rs` focused on dispatch logic.

use clap::{Args, Parser, Subcommand};
use noterand_core::model::Range;
use noterand_core::{MergeMode, Scope, StructureId, StructureKind};
use std::path::PathBuf;

/// noterand - Randomized OpenMPT pattern text from a linked structure database
#[derive(Parser)]
#[command(name = "noterand")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file (default: from config, else noterand-db.json)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (default: noterand.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty database file
    Init,

    /// Add a structure (channel, instrument, octave, volume, effect, offset)
    Add {
        /// Kind of structure to add
        kind: StructureKind,

        /// Add to the globals database instead of the root database
        #[arg(long)]
        globals: bool,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Change fields of an existing structure
    Edit {
        /// Structure to edit, e.g. `instrument:4`
        id: StructureId,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Attach children to a Channel or Instrument
    Link {
        /// Channel or Instrument to attach to
        parent: StructureId,

        /// Structures to attach, in order
        #[arg(required = true)]
        children: Vec<StructureId>,
    },

    /// Detach one child from a Channel or Instrument
    Unlink {
        parent: StructureId,
        child: StructureId,
    },

    /// Remove structures, severing all their links
    Remove {
        #[arg(required = true)]
        ids: Vec<StructureId>,
    },

    /// List structures with a one-line summary each
    List {
        /// Only this kind (default: every kind)
        kind: Option<StructureKind>,

        /// List the globals database instead of the root database
        #[arg(long)]
        globals: bool,

        /// Page of ten entries to show, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show one structure and what it is linked to
    Show { id: StructureId },

    /// Mute or unmute a Channel
    Toggle { channel: StructureId },

    /// Move a structure between the root and globals databases
    Move {
        id: StructureId,

        /// Destination database (root or globals)
        #[arg(long)]
        to: Scope,
    },

    /// Copy a structure's settings into a new, unlinked structure
    Copy { id: StructureId },

    /// Load another database file into this one
    Merge {
        file: PathBuf,

        /// replace: the file supersedes this database; append: add its structures
        #[arg(long, default_value = "append")]
        mode: MergeMode,
    },

    /// Remove every structure
    Wipe {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Produce randomized pattern text
    Produce {
        /// Lines per pattern (default: from config, else ask)
        #[arg(long)]
        lines: Option<usize>,

        /// Patterns to produce (default: from config, else ask after each)
        #[arg(long)]
        runs: Option<usize>,

        /// Seed for reproducible output (default: random, printed)
        #[arg(long)]
        seed: Option<u32>,

        /// Pattern file (default: from config, else output.txt)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Overwrite an existing pattern file without asking
        #[arg(long)]
        overwrite: bool,
    },

    /// Verify that every link is recorded on both sides
    Check,
}

/// Structure fields for `add` and `edit`. Each applies to some kinds only.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldArgs {
    /// Instrument number, 1-255
    #[arg(long)]
    pub number: Option<u32>,

    /// Octave pitch index, 0-9
    #[arg(long)]
    pub pitch: Option<u32>,

    /// Octave pitch classes, e.g. `C-,C#,D` (default: all twelve)
    #[arg(long, value_delimiter = ',')]
    pub pitches: Option<Vec<String>>,

    /// Volume or Effect command character
    #[arg(long)]
    pub code: Option<char>,

    /// Value range `LOW:HIGH` or a single value; `0x` for hex
    #[arg(long, value_parser = parse_range)]
    pub range: Option<Range>,

    /// Offset sample areas `LOW:HIGH`, 0-F
    #[arg(long, value_parser = parse_range)]
    pub sample_area: Option<Range>,

    /// Channel lines between instrument draws
    #[arg(long, value_parser = parse_range)]
    pub instrument_spacing: Option<Range>,

    /// Channel lines between volume draws
    #[arg(long, value_parser = parse_range)]
    pub volume_spacing: Option<Range>,

    /// Channel lines between effect draws
    #[arg(long, value_parser = parse_range)]
    pub effect_spacing: Option<Range>,

    /// Draw Instruments from the globals database too (channels)
    #[arg(long)]
    pub instrument_globals: Option<bool>,

    /// Draw Octaves from the globals database too (instruments)
    #[arg(long)]
    pub octave_globals: Option<bool>,

    /// Draw Volumes from the globals database too (channels, instruments)
    #[arg(long)]
    pub volume_globals: Option<bool>,

    /// Draw Effects from the globals database too (channels)
    #[arg(long)]
    pub effect_globals: Option<bool>,

    /// Fill empty columns with `.` so pasting overwrites (channels)
    #[arg(long)]
    pub overwrite: Option<bool>,

    /// Skip this channel when producing (channels)
    #[arg(long)]
    pub muted: Option<bool>,
}

fn parse_value(text: &str) -> Result<u32, String> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| format!("invalid number: {:?}", text))
}

/// Parses `LOW:HIGH` or a single value into an inclusive range.
pub fn parse_range(s: &str) -> Result<Range, String> {
    let (low, high) = match s.split_once(':') {
        Some((low, high)) => (parse_value(low)?, parse_value(high)?),
        None => {
            let value = parse_value(s)?;
            (value, value)
        }
    };
    if high < low {
        return Err(format!("range {} ends below its start", s));
    }
    Ok(Range::new(low, high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use noterand_core::{ChannelId, InstrumentId};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("2:6"), Ok(Range::new(2, 6)));
        assert_eq!(parse_range("0x40:0x80"), Ok(Range::new(0x40, 0x80)));
        assert_eq!(parse_range("7"), Ok(Range::single(7)));
        assert!(parse_range("6:2").is_err());
        assert!(parse_range("a:b").is_err());
    }

    #[test]
    fn test_cli_parses_add_with_fields() {
        let cli = Cli::try_parse_from([
            "noterand",
            "add",
            "volume",
            "--globals",
            "--code",
            "p",
            "--range",
            "16:48",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                kind,
                globals,
                fields,
            } => {
                assert_eq!(kind, StructureKind::Volume);
                assert!(globals);
                assert_eq!(fields.code, Some('p'));
                assert_eq!(fields.range, Some(Range::new(16, 48)));
                assert_eq!(fields.number, None);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_cli_parses_link() {
        let cli = Cli::try_parse_from(["noterand", "link", "channel:1", "ins:2", "instrument:5"])
            .unwrap();
        match cli.command {
            Commands::Link { parent, children } => {
                assert_eq!(parent, StructureId::from(ChannelId(1)));
                assert_eq!(
                    children,
                    vec![
                        StructureId::from(InstrumentId(2)),
                        StructureId::from(InstrumentId(5)),
                    ]
                );
            }
            _ => panic!("expected link command"),
        }
    }

    #[test]
    fn test_cli_requires_children_for_link() {
        assert!(Cli::try_parse_from(["noterand", "link", "channel:1"]).is_err());
        assert!(Cli::try_parse_from(["noterand", "link", "banana:1", "ins:2"]).is_err());
    }

    #[test]
    fn test_cli_parses_produce_with_globals() {
        let cli = Cli::try_parse_from([
            "noterand",
            "produce",
            "--lines",
            "64",
            "--seed",
            "42",
            "--db",
            "songs.json",
            "--overwrite",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("songs.json")));
        match cli.command {
            Commands::Produce {
                lines,
                runs,
                seed,
                out,
                overwrite,
            } => {
                assert_eq!(lines, Some(64));
                assert_eq!(runs, None);
                assert_eq!(seed, Some(42));
                assert_eq!(out, None);
                assert!(overwrite);
            }
            _ => panic!("expected produce command"),
        }
    }

    #[test]
    fn test_cli_parses_bool_fields() {
        let cli = Cli::try_parse_from([
            "noterand",
            "edit",
            "channel:3",
            "--overwrite",
            "false",
            "--instrument-spacing",
            "1:4",
        ])
        .unwrap();
        match cli.command {
            Commands::Edit { id, fields } => {
                assert_eq!(id, StructureId::from(ChannelId(3)));
                assert_eq!(fields.overwrite, Some(false));
                assert_eq!(fields.instrument_spacing, Some(Range::new(1, 4)));
            }
            _ => panic!("expected edit command"),
        }
    }

    #[test]
    fn test_cli_parses_move_and_merge() {
        let cli = Cli::try_parse_from(["noterand", "move", "oct:3", "--to", "globals"]).unwrap();
        assert!(matches!(cli.command, Commands::Move { to: Scope::Globals, .. }));

        let cli = Cli::try_parse_from(["noterand", "merge", "other.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Merge { mode: MergeMode::Append, .. }));
    }
}
