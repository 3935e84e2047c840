//! noterand CLI - Command-line interface for randomized tracker patterns
//!
//! This binary edits a linked structure database and produces OpenMPT
//! pattern text from it.

use clap::Parser;
use noterand_core::Scope;
use std::process::ExitCode;

// Use modules from the library crate
use noterand_cli::cli_args::{Cli, Commands};
use noterand_cli::commands::{self, produce::ProduceOptions, Workspace};
use noterand_cli::prompt::TerminalPrompter;

fn scope(globals: bool) -> Scope {
    if globals {
        Scope::Globals
    } else {
        Scope::Root
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let workspace = Workspace::resolve(cli.db.as_deref(), cli.config.as_deref());
    let mut prompter = TerminalPrompter::stdio();

    let result = match cli.command {
        Commands::Init => commands::database::init(&workspace, &mut prompter),
        Commands::Add {
            kind,
            globals,
            fields,
        } => commands::structure::add(&workspace, kind, scope(globals), &fields),
        Commands::Edit { id, fields } => commands::structure::edit(&workspace, id, &fields),
        Commands::Link { parent, children } => {
            commands::link::attach(&workspace, parent, &children)
        }
        Commands::Unlink { parent, child } => commands::link::detach(&workspace, parent, child),
        Commands::Remove { ids } => commands::structure::remove(&workspace, &ids),
        Commands::List {
            kind,
            globals,
            page,
        } => commands::list::list(&workspace, kind, scope(globals), page),
        Commands::Show { id } => commands::list::show(&workspace, id),
        Commands::Toggle { channel } => commands::structure::toggle(&workspace, channel),
        Commands::Move { id, to } => commands::structure::move_to(&workspace, id, to),
        Commands::Copy { id } => commands::structure::copy(&workspace, id),
        Commands::Merge { file, mode } => commands::database::merge(&workspace, &file, mode),
        Commands::Wipe { yes } => commands::database::wipe(&workspace, yes, &mut prompter),
        Commands::Produce {
            lines,
            runs,
            seed,
            out,
            overwrite,
        } => {
            let options = ProduceOptions {
                lines,
                runs,
                seed,
                out,
                overwrite,
            };
            commands::produce::run(&workspace, &options, &mut prompter)
        }
        Commands::Check => commands::check::run(&workspace),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
