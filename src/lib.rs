#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod document;
pub mod ingest;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use document::{DocumentError, GraphDocument};
pub use ingest::{GeneratedGraph, IngestError, ingest_ai_response};
pub use ir::{Edge, LayoutPreference, Node, ViewMode, validate_connection};
pub use layout::{Layouter, reapply_layout};
