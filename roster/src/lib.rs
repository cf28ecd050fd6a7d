//! # Roster Library
//!
//! This crate handles the identity side of the export flow: importing a
//! course roster from CSV and matching the name displayed in the grading UI
//! against a roster name.
//!
//! Two import shapes are supported (see [`parser`]): the Canvas gradebook
//! export (header row, named columns) and a legacy headerless 4-column
//! layout. Name comparison (see [`name_match`]) tolerates UI truncation
//! markers and "Last, First" ordering.

pub mod name_match;
pub mod parser;
pub mod types;

pub use name_match::{canonicalize_name, names_match};
pub use parser::{RosterParseResult, parse_roster};
pub use types::RosterEntry;
