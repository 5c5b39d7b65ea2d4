//! Property file loading.
//!
//! Documents and property files are JSON or YAML mappings, optionally gzip
//! compressed. The format is chosen from the file name (`.yaml` / `.yml` is
//! YAML, anything else JSON, with a trailing `.gz` ignored); gzip is detected
//! from the content's magic bytes.

use crate::document::node::PropertyMap;
use crate::document::parsed::{Document, ParsedDocument};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Serialization format of a properties file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertiesFormat {
    Json,
    Yaml,
}

impl PropertiesFormat {
    /// Determines the format from a file name.
    ///
    /// Examples:
    /// - `people.json` → Json
    /// - `people.yaml.gz` → Yaml
    /// - `people` → Json
    pub fn from_name(name: &str) -> Self {
        let base = name.strip_suffix(".gz").unwrap_or(name);
        if base.ends_with(".yaml") || base.ends_with(".yml") {
            PropertiesFormat::Yaml
        } else {
            PropertiesFormat::Json
        }
    }
}

/// Parses a properties mapping from text.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON/YAML or its root is not a
/// mapping.
pub fn parse_properties(content: &str, format: PropertiesFormat) -> Result<PropertyMap> {
    match format {
        PropertiesFormat::Json => {
            serde_json::from_str(content).context("Failed to parse JSON properties")
        }
        PropertiesFormat::Yaml => {
            if content.trim().is_empty() {
                return Ok(PropertyMap::new());
            }
            serde_yaml::from_str(content).context("Failed to parse YAML properties")
        }
    }
}

/// Parses raw (possibly gzipped) bytes read from a source named `name`.
pub fn parse_properties_bytes(name: &str, bytes: &[u8]) -> Result<PropertyMap> {
    let content = decode_bytes(bytes)?;
    parse_properties(&content, PropertiesFormat::from_name(name))
}

/// Loads a properties mapping from a file.
///
/// # Examples
///
/// ```no_run
/// use docs_enricher::file::loader::load_properties_file;
///
/// let defaults = load_properties_file("defaults.json").unwrap();
/// ```
pub fn load_properties_file<P: AsRef<Path>>(path: P) -> Result<PropertyMap> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_properties_bytes(&path.to_string_lossy(), &bytes)
        .with_context(|| format!("Invalid properties file {}", path.display()))
}

/// Loads a document from a file: the raw bytes are kept as the original
/// document and the parsed mapping becomes its properties.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let properties = parse_properties_bytes(&name, &bytes)
        .with_context(|| format!("Invalid document {}", path.display()))?;
    Ok(ParsedDocument::new(Document::new(name, bytes), properties))
}

/// Loads a JSON document from standard input.
pub fn load_document_from_stdin() -> Result<ParsedDocument> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let properties = parse_properties_bytes("stdin", &buffer)
        .context("Failed to parse document from stdin")?;
    Ok(ParsedDocument::new(Document::new("stdin", buffer), properties))
}

/// Returns the UTF-8 text of the bytes, decompressing gzip content
/// (magic bytes 0x1f 0x8b) first.
fn decode_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes)
    } else {
        String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 in properties")
    }
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped properties - data may be corrupted")?;
    Ok(content)
}
