//! Finder backed by JSON/YAML property files.
//!
//! The file to load is determined by:
//!
//! - `file_name_selector` - optional selector choosing a dynamic file name from
//!   the lookup keys
//! - `file_suffix` - suffix appended to dynamic file names (default `.json`)
//! - `file_path` - parent folder for dynamic file names, or the complete file
//!   path when no name selector is set
//!
//! When `property_selector` is set, it selects a value from the lookup keys
//! which in turn names the section of the loaded file to return. Otherwise the
//! whole file is returned.

use super::error::FinderError;
use super::DocumentPropertiesFinder;
use crate::document::node::{PropertyMap, PropertyValue, ValueKind};
use crate::file::loader::parse_properties_bytes;
use crate::selector::{Selector, SelectorError};
use std::fs;
use std::io;
use std::path::Path;

/// Where property files are read from.
pub trait PropertiesSource: Send + Sync {
    /// Returns the content of `name` (inside `parent` when given), or `None`
    /// if there is no such file.
    fn read(&self, parent: Option<&str>, name: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Reads property files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemSource;

impl PropertiesSource for FileSystemSource {
    fn read(&self, parent: Option<&str>, name: &str) -> io::Result<Option<Vec<u8>>> {
        let path = match parent {
            Some(parent) => Path::new(parent).join(name),
            None => Path::new(name).to_path_buf(),
        };
        if !path.is_file() {
            return Ok(None);
        }
        fs::read(&path).map(Some)
    }
}

pub struct FileDocumentPropertiesFinder {
    source: Box<dyn PropertiesSource>,
    file_path: Option<String>,
    file_name_selector: Option<Selector>,
    file_suffix: Option<String>,
    property_selector: Option<Selector>,
}

impl Default for FileDocumentPropertiesFinder {
    fn default() -> Self {
        Self::new(FileSystemSource)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn optional_selector(expression: &str) -> Result<Option<Selector>, SelectorError> {
    if expression.is_empty() {
        Ok(None)
    } else {
        Selector::parse(expression).map(Some)
    }
}

impl FileDocumentPropertiesFinder {
    pub fn new(source: impl PropertiesSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            file_path: None,
            file_name_selector: None,
            file_suffix: Some(".json".to_string()),
            property_selector: None,
        }
    }

    /// Static file path, or the parent folder of dynamic file names.
    pub fn with_file_path(mut self, file_path: &str) -> Self {
        self.file_path = non_empty(file_path);
        self
    }

    pub fn with_file_name_selector(mut self, selector: &str) -> Result<Self, SelectorError> {
        self.file_name_selector = optional_selector(selector)?;
        Ok(self)
    }

    /// An empty suffix disables the suffix.
    pub fn with_file_suffix(mut self, suffix: &str) -> Self {
        self.file_suffix = non_empty(suffix);
        self
    }

    pub fn with_property_selector(mut self, selector: &str) -> Result<Self, SelectorError> {
        self.property_selector = optional_selector(selector)?;
        Ok(self)
    }

    /// Works out `(parent, file name)` for the given lookup keys.
    fn locate(&self, lookup_keys: &PropertyMap) -> Option<(Option<String>, String)> {
        let dynamic_name = self
            .file_name_selector
            .as_ref()
            .and_then(|selector| selector.select_value(lookup_keys))
            .filter(|value| !value.is_null());

        match dynamic_name {
            Some(value) => {
                let mut name = value.to_string();
                if let Some(suffix) = &self.file_suffix {
                    name.push_str(suffix);
                }
                Some((self.file_path.clone(), name))
            }
            None => self.file_path.clone().map(|path| (None, path)),
        }
    }

    fn select_section(
        &self,
        selector: &Selector,
        lookup_keys: &PropertyMap,
        properties: PropertyMap,
    ) -> Result<PropertyMap, FinderError> {
        let Some(value) = selector
            .select_value(lookup_keys)
            .filter(|value| !value.is_null())
        else {
            return Ok(PropertyMap::new());
        };

        let section = Selector::parse(&value.to_string())?;
        Ok(match section.select_value_of_kind(ValueKind::Object, &properties) {
            Some(PropertyValue::Object(map)) => map.clone(),
            _ => PropertyMap::new(),
        })
    }
}

impl DocumentPropertiesFinder for FileDocumentPropertiesFinder {
    fn find_properties(&self, lookup_keys: &PropertyMap) -> Result<PropertyMap, FinderError> {
        let Some((parent, name)) = self.locate(lookup_keys) else {
            tracing::debug!("no properties file could be determined from the lookup keys");
            return Ok(PropertyMap::new());
        };

        let display_name = match &parent {
            Some(parent) => format!("{}/{}", parent.trim_end_matches('/'), name),
            None => name.clone(),
        };

        let bytes = self
            .source
            .read(parent.as_deref(), &name)
            .map_err(|source| FinderError::Io {
                name: display_name.clone(),
                source,
            })?;
        let Some(bytes) = bytes else {
            tracing::debug!(file = %display_name, "properties file not found");
            return Ok(PropertyMap::new());
        };

        let properties =
            parse_properties_bytes(&name, &bytes).map_err(|source| FinderError::Parse {
                name: display_name.clone(),
                source,
            })?;
        tracing::debug!(file = %display_name, properties = properties.len(), "loaded properties file");

        match &self.property_selector {
            None => Ok(properties),
            Some(selector) => self.select_section(selector, lookup_keys, properties),
        }
    }
}
