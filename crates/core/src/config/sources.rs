//! Loading resource options bundles from YAML or JSON files.

use crate::config::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Supported on-disk formats for an options bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsFormat {
    Yaml,
    Json,
}

impl OptionsFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "yml" | "yaml" => Ok(OptionsFormat::Yaml),
            "json" => Ok(OptionsFormat::Json),
            _ => Err(ConfigError::invalid_value(
                "options file",
                path.display().to_string(),
                "a .yml, .yaml or .json file",
            )),
        }
    }
}

impl std::fmt::Display for OptionsFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsFormat::Yaml => write!(f, "yaml"),
            OptionsFormat::Json => write!(f, "json"),
        }
    }
}

fn parse_tree(text: &str, format: OptionsFormat) -> Result<serde_json::Value, ConfigError> {
    let tree: serde_json::Value = match format {
        OptionsFormat::Yaml => serde_yaml::from_str(text)?,
        OptionsFormat::Json => serde_json::from_str(text)?,
    };
    Ok(tree)
}

/// Parse an options bundle from text
pub fn parse_options<T: DeserializeOwned>(text: &str, format: OptionsFormat) -> Result<T, ConfigError> {
    let tree = parse_tree(text, format)?;
    Ok(serde_json::from_value(tree)?)
}

/// Load an options bundle from a file, picking the format from its extension
pub fn load_options<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = OptionsFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    tracing::debug!("Loading {} options from {}", format, path.display());
    parse_options(&text, format)
}

/// Load one top-level section of an application config file.
///
/// Application config files usually host options for several resources
/// side by side; `section` selects the one a resource reads.
pub fn load_section<T: DeserializeOwned>(path: impl AsRef<Path>, section: &str) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = OptionsFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    let mut tree = parse_tree(&text, format)?;

    let value = tree
        .get_mut(section)
        .map(serde_json::Value::take)
        .ok_or_else(|| {
            ConfigError::missing_required(
                section,
                format!("Add a '{}' section to {}", section, path.display()),
            )
        })?;

    tracing::debug!("Loaded section '{}' from {}", section, path.display());
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        paths: Vec<String>,
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OptionsFormat::from_path(Path::new("a.yml")).unwrap(), OptionsFormat::Yaml);
        assert_eq!(OptionsFormat::from_path(Path::new("a.YAML")).unwrap(), OptionsFormat::Yaml);
        assert_eq!(OptionsFormat::from_path(Path::new("a.json")).unwrap(), OptionsFormat::Json);
        assert!(matches!(
            OptionsFormat::from_path(Path::new("a.ini")),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml: Sample = parse_options("name: app\npaths: [/a, /b]\n", OptionsFormat::Yaml).unwrap();
        let json: Sample = parse_options(r#"{"name":"app","paths":["/a","/b"]}"#, OptionsFormat::Json).unwrap();
        assert_eq!(yaml, json);
        assert_eq!(yaml.paths, vec!["/a", "/b"]);
    }

    #[test]
    fn test_load_options_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "name: from-file").unwrap();

        let sample: Sample = load_options(file.path()).unwrap();
        assert_eq!(sample.name, "from-file");
        assert!(sample.paths.is_empty());
    }

    #[test]
    fn test_load_section() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"other": {{"x": 1}}, "doctrine2": {{"name": "orm"}}}}"#).unwrap();

        let sample: Sample = load_section(file.path(), "doctrine2").unwrap();
        assert_eq!(sample.name, "orm");

        let missing: Result<Sample, _> = load_section(file.path(), "session");
        assert!(matches!(missing, Err(ConfigError::MissingRequired { .. })));
    }
}
