//! Saving enriched properties.
//!
//! Properties are written atomically (temp file, then rename) as pretty
//! printed JSON, or YAML when the target name ends in `.yaml` / `.yml`. A
//! `.gz` target is gzip compressed.

use super::loader::PropertiesFormat;
use crate::config::OutputConfig;
use crate::document::node::PropertyMap;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes properties as JSON with the given indentation.
pub fn to_json_string(properties: &PropertyMap, indent_size: usize) -> Result<String> {
    let indent = " ".repeat(indent_size);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    properties
        .serialize(&mut serializer)
        .context("Failed to serialize properties")?;
    String::from_utf8(buffer).context("Serialized properties are not UTF-8")
}

/// Saves properties to a file, creating a `.bak` copy of an existing file
/// first when `output.create_backup` is set.
///
/// # Examples
///
/// ```no_run
/// use docs_enricher::config::OutputConfig;
/// use docs_enricher::document::node::PropertyMap;
/// use docs_enricher::file::saver::save_properties;
///
/// save_properties("enriched.json", &PropertyMap::new(), &OutputConfig::default()).unwrap();
/// ```
pub fn save_properties<P: AsRef<Path>>(
    path: P,
    properties: &PropertyMap,
    output: &OutputConfig,
) -> Result<()> {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    let should_compress = name.ends_with(".gz");

    if output.create_backup && path.exists() {
        create_backup(path)?;
    }

    let mut text = match PropertiesFormat::from_name(&name) {
        PropertiesFormat::Json => to_json_string(properties, output.indent_size)?,
        PropertiesFormat::Yaml => {
            serde_yaml::to_string(properties).context("Failed to serialize properties")?
        }
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    write_file_atomic(path, text.as_bytes(), should_compress)
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup(path: &Path) -> Result<()> {
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Writes data to a temp file next to `path`, then renames it into place.
fn write_file_atomic(path: &Path, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;
    Ok(())
}
