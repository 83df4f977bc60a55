//! # OpenSilicon I/O
//!
//! Readers and writers for the files an extraction run consumes and
//! produces: the layout database, router output, project metadata with its
//! extraction settings, and the JSON result document.

pub mod error;
pub mod output;
pub mod project;
pub mod routes;

pub use error::{IoError, Result};
pub use output::{write_outcomes, NetOutcome};
pub use project::{load_database, ProjectMeta, ProjectSettings};
pub use routes::{NetRoute, RouteFile};
