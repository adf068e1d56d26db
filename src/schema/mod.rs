//! The tool-collection schema and everything derived from it.
//!
//! `tools/schema.json` is the only description of a tool entry in the
//! project. This module loads it once and derives both consumers from the
//! same document: a runtime validator (`ToolValidator`) and the static type
//! declaration emitted for the UI (`derive_entry_type`). Nothing else in the
//! crate spells out the entry shape by hand.

pub mod loader;
pub mod strict;
pub mod typegen;
pub mod validator;

pub use loader::ToolSchema;
pub use typegen::{TypegenOptions, derive_entry_type};
pub use validator::{ToolValidator, Violation};
