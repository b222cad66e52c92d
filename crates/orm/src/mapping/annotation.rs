use super::{collect_files, MappingDriver, MappingFormat};
use crate::error::OrmResult;
use std::path::{Path, PathBuf};

/// Markers that make a source file an entity (or mapped superclass)
const ENTITY_MARKERS: [&str; 2] = ["@Entity", "@MappedSuperclass"];

/// Default driver: mapping is declared by annotations inside the entity
/// sources themselves.
///
/// Class names follow the directory layout below each path, so
/// `<path>/Entities/User.php` is `Entities\User`.
#[derive(Debug, Clone)]
pub struct AnnotationDriver {
    paths: Vec<PathBuf>,
}

impl AnnotationDriver {
    pub const DEFAULT_FILE_EXTENSION: &'static str = ".php";

    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    fn class_name_of(root: &Path, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(root).ok()?;
        let stem = relative.to_str()?.strip_suffix(Self::DEFAULT_FILE_EXTENSION)?;
        Some(stem.replace(std::path::MAIN_SEPARATOR, "\\"))
    }
}

impl MappingDriver for AnnotationDriver {
    fn format(&self) -> MappingFormat {
        MappingFormat::Annotation
    }

    fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn file_extension(&self) -> &str {
        Self::DEFAULT_FILE_EXTENSION
    }

    fn all_class_names(&self) -> OrmResult<Vec<String>> {
        let mut classes = Vec::new();
        for root in &self.paths {
            for file in collect_files(root, Self::DEFAULT_FILE_EXTENSION)? {
                let source = std::fs::read_to_string(&file)?;
                if !ENTITY_MARKERS.iter().any(|marker| source.contains(marker)) {
                    continue;
                }
                if let Some(class) = Self::class_name_of(root, &file) {
                    classes.push(class);
                }
            }
        }
        classes.sort();
        classes.dedup();
        Ok(classes)
    }
}
