//! Tool catalog assembly.
//!
//! `collector` turns the files under `tools/` into tagged entries, `merge`
//! enforces name uniqueness and produces the sorted `MergedCatalog` that the
//! UI imports, and `collate` defines the name ordering.

pub mod collate;
pub mod collector;
pub mod merge;
pub mod model;

pub use collate::compare_names;
pub use collector::{CollectedEntries, collect_entries, discover_tool_files, strip_schema_hint};
pub use merge::{MergeOutcome, MergedCatalog, merge_entries};
pub use model::{EntryOrigin, ToolEntry};
