//! Drivers reading one mapping file per class (`Entities.User.dcm.yml`).

use super::{collect_files, MappingDriver, MappingFormat};
use crate::error::{OrmError, OrmResult};
use std::path::{Path, PathBuf};

/// Finds mapping files by class name under a set of paths.
///
/// A class `Entities\User` maps to the file `Entities.User<extension>`
/// directly inside one of the paths.
#[derive(Debug, Clone)]
pub struct FileLocator {
    paths: Vec<PathBuf>,
    extension: &'static str,
}

impl FileLocator {
    pub fn new(paths: Vec<PathBuf>, extension: &'static str) -> Self {
        Self { paths, extension }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }

    /// Path of the mapping file for `class_name`
    pub fn find_mapping_file(&self, class_name: &str) -> OrmResult<PathBuf> {
        let file_name = format!("{}{}", class_name.replace('\\', "."), self.extension);
        self.paths
            .iter()
            .map(|path| path.join(&file_name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                OrmError::mapping(format!("No mapping file found named '{}' for class '{}'", file_name, class_name))
            })
    }

    /// Every class with a mapping file under the paths
    pub fn all_class_names(&self) -> OrmResult<Vec<String>> {
        let mut classes = Vec::new();
        for path in &self.paths {
            for file in collect_files(path, self.extension)? {
                if let Some(class) = self.class_name_of(&file) {
                    classes.push(class);
                }
            }
        }
        classes.sort();
        classes.dedup();
        Ok(classes)
    }

    fn class_name_of(&self, file: &Path) -> Option<String> {
        let name = file.file_name()?.to_str()?;
        let stem = name.strip_suffix(self.extension)?;
        if stem.is_empty() {
            return None;
        }
        Some(stem.replace('.', "\\"))
    }
}

/// YAML mapping files (`*.dcm.yml`)
#[derive(Debug, Clone)]
pub struct YamlDriver {
    locator: FileLocator,
}

impl YamlDriver {
    pub const DEFAULT_FILE_EXTENSION: &'static str = ".dcm.yml";

    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            locator: FileLocator::new(paths, Self::DEFAULT_FILE_EXTENSION),
        }
    }

    pub fn locator(&self) -> &FileLocator {
        &self.locator
    }

    /// Parsed mapping element for one class
    pub fn load_mapping(&self, class_name: &str) -> OrmResult<serde_yaml::Value> {
        let file = self.locator.find_mapping_file(class_name)?;
        let text = std::fs::read_to_string(&file)?;
        let mut document: serde_yaml::Value = serde_yaml::from_str(&text)?;

        document
            .get_mut(class_name)
            .map(std::mem::take)
            .ok_or_else(|| {
                OrmError::mapping(format!("'{}' does not hold a mapping for '{}'", file.display(), class_name))
            })
    }
}

impl MappingDriver for YamlDriver {
    fn format(&self) -> MappingFormat {
        MappingFormat::Yaml
    }

    fn paths(&self) -> &[PathBuf] {
        self.locator.paths()
    }

    fn file_extension(&self) -> &str {
        self.locator.extension()
    }

    fn all_class_names(&self) -> OrmResult<Vec<String>> {
        self.locator.all_class_names()
    }
}

/// XML mapping files (`*.dcm.xml`)
#[derive(Debug, Clone)]
pub struct XmlDriver {
    locator: FileLocator,
}

impl XmlDriver {
    pub const DEFAULT_FILE_EXTENSION: &'static str = ".dcm.xml";

    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            locator: FileLocator::new(paths, Self::DEFAULT_FILE_EXTENSION),
        }
    }

    pub fn locator(&self) -> &FileLocator {
        &self.locator
    }
}

impl MappingDriver for XmlDriver {
    fn format(&self) -> MappingFormat {
        MappingFormat::Xml
    }

    fn paths(&self) -> &[PathBuf] {
        self.locator.paths()
    }

    fn file_extension(&self) -> &str {
        self.locator.extension()
    }

    fn all_class_names(&self) -> OrmResult<Vec<String>> {
        self.locator.all_class_names()
    }
}

/// PHP mapping files (`*.php`)
#[derive(Debug, Clone)]
pub struct PhpDriver {
    locator: FileLocator,
}

impl PhpDriver {
    pub const DEFAULT_FILE_EXTENSION: &'static str = ".php";

    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            locator: FileLocator::new(paths, Self::DEFAULT_FILE_EXTENSION),
        }
    }

    pub fn locator(&self) -> &FileLocator {
        &self.locator
    }
}

impl MappingDriver for PhpDriver {
    fn format(&self) -> MappingFormat {
        MappingFormat::Php
    }

    fn paths(&self) -> &[PathBuf] {
        self.locator.paths()
    }

    fn file_extension(&self) -> &str {
        self.locator.extension()
    }

    fn all_class_names(&self) -> OrmResult<Vec<String>> {
        self.locator.all_class_names()
    }
}
