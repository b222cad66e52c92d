//! Options bundle read by [`OrmResource`](crate::resource::OrmResource)

use crate::connection::ConnectionParams;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// A single path or a list of paths, kept in the shape it was written in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathList {
    One(String),
    Many(Vec<String>),
}

impl PathList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            PathList::One(path) => vec![path.clone()],
            PathList::Many(paths) => paths.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PathList::Many(paths) if paths.is_empty())
    }
}

impl Default for PathList {
    fn default() -> Self {
        PathList::Many(Vec::new())
    }
}

impl From<&PathList> for Value {
    fn from(list: &PathList) -> Self {
        match list {
            PathList::One(path) => Value::from(path.as_str()),
            PathList::Many(paths) => Value::from(paths.clone()),
        }
    }
}

/// Reads a selector keyword; a value that is not a string counts as absent
fn keyword<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(keyword)) => Ok(Some(keyword)),
        Some(other) => {
            warn!("Ignoring non-string keyword {}, using the default", other);
            Ok(None)
        }
    }
}

/// `metadata.*` options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataOptions {
    /// `yaml`, `xml`, `php`; anything else selects annotations
    #[serde(default, deserialize_with = "keyword")]
    pub driver: Option<String>,

    #[serde(default)]
    pub mapping_paths: PathList,

    #[serde(default)]
    pub entities_paths: PathList,
}

/// `proxy.*` options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyOptions {
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default)]
    pub namespace: Option<String>,
}

/// Full options bundle of the ORM resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrmOptions {
    #[serde(default)]
    pub metadata: MetadataOptions,

    /// `apc`, `memcache`, `xcache`; anything else selects the array cache
    #[serde(default, deserialize_with = "keyword")]
    pub cache: Option<String>,

    #[serde(default)]
    pub proxy: ProxyOptions,

    #[serde(default)]
    pub connection: ConnectionParams,
}
