//! Client-side helpers for `designboard_cli`: the HTTP client and terminal rendering.

pub mod connectivity;
pub mod outputformatter;

pub use connectivity::{FilesClient, DEFAULT_BASE_URL};
pub use outputformatter::{print_records, print_tree, render_records, render_tree};
