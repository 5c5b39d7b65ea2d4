//! File I/O for documents and property files.
//!
//! This module loads documents and property mappings from JSON or YAML files
//! (optionally gzipped) and saves enriched properties back with atomic writes
//! and optional backups.

pub mod loader;
pub mod saver;
