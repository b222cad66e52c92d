//! Mapping drivers: where entity-to-table mapping definitions live and how
//! they are found.

pub mod annotation;
pub mod file;

pub use annotation::AnnotationDriver;
pub use file::{FileLocator, PhpDriver, XmlDriver, YamlDriver};

use crate::error::{OrmError, OrmResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Format a mapping driver reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingFormat {
    Annotation,
    Yaml,
    Xml,
    Php,
}

impl MappingFormat {
    pub fn name(&self) -> &'static str {
        match self {
            MappingFormat::Annotation => "annotation",
            MappingFormat::Yaml => "yaml",
            MappingFormat::Xml => "xml",
            MappingFormat::Php => "php",
        }
    }
}

impl std::fmt::Display for MappingFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reads entity mapping definitions from a set of paths
pub trait MappingDriver: Send + Sync {
    /// Format of the mapping sources
    fn format(&self) -> MappingFormat;

    /// Paths the driver reads from, as configured
    fn paths(&self) -> &[PathBuf];

    /// Suffix of the files holding mapping definitions
    fn file_extension(&self) -> &str;

    /// Names of every mapped class found under the paths
    fn all_class_names(&self) -> OrmResult<Vec<String>>;
}

impl std::fmt::Debug for dyn MappingDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingDriver")
            .field("format", &self.format())
            .field("paths", &self.paths())
            .finish()
    }
}

/// Collect every file under `root` whose name ends with `suffix`, recursively.
/// Symbolic links below the root are listed but never descended into.
pub(crate) fn collect_files(root: &Path, suffix: &str) -> OrmResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(OrmError::mapping(format!(
            "Mapping path '{}' is not a readable directory",
            root.display()
        )));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(|e| {
            OrmError::mapping(format!("Failed to scan '{}': {}", root.display(), e))
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.file_name().to_str().map_or(false, |n| n.ends_with(suffix)) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(MappingFormat::Annotation.name(), "annotation");
        assert_eq!(MappingFormat::Yaml.to_string(), "yaml");
        assert_eq!(MappingFormat::Xml.name(), "xml");
        assert_eq!(MappingFormat::Php.name(), "php");
    }

    #[test]
    fn test_collect_files_recurses() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("A.dcm.yml"), "").unwrap();
        std::fs::write(dir.path().join("nested/B.dcm.yml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = collect_files(dir.path(), ".dcm.yml").unwrap();
        assert_eq!(files.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_files_does_not_follow_symlink_loops() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.dcm.yml"), "").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let files = collect_files(dir.path(), ".dcm.yml").unwrap();
        assert_eq!(files, vec![dir.path().join("A.dcm.yml")]);
    }

    #[test]
    fn test_collect_files_missing_dir() {
        let err = collect_files(Path::new("/definitely/not/here"), ".php").unwrap_err();
        assert!(matches!(err, OrmError::Mapping(_)));
    }
}
