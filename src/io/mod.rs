//! External interfaces: dataset loading and result export.
//!
//! The search core never touches the filesystem; these collaborators
//! own the CSV boundary in both directions.

pub mod export;
pub mod loader;

pub use export::{render_results, write_results, ExportError};
pub use loader::{
    load_matrix, load_sections, load_tas, read_matrix, read_sections, read_tas, LoadError,
};
