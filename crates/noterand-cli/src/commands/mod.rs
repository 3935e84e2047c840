//! CLI command implementations

pub mod check;
pub mod database;
pub mod fields;
pub mod link;
pub mod list;
pub mod produce;
pub mod structure;

mod workspace;

pub use workspace::Workspace;
