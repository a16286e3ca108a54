//! Block state and item identifier tables for one protocol version.

pub mod table;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use table::MappingTable;

/// Name of the block state every table must contain, without properties.
pub const AIR_NAME: &str = "minecraft:air";

/// A single block state property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    String(String),
}

pub type Properties = BTreeMap<String, PropertyValue>;

/// A block identified by name and property values, independent of any version's runtime IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub name: String,
    #[serde(default)]
    pub properties: Properties,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Properties::new(),
        }
    }

    pub fn with(mut self, key: &str, value: PropertyValue) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Cannot read mapping file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid mapping JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Mapping has no minecraft:air state")]
    MissingAir,
    #[error("Block state {name} listed twice (runtime IDs {first} and {second})")]
    DuplicateState { name: String, first: u32, second: u32 },
    #[error("Item {name} listed twice")]
    DuplicateItem { name: String },
}

/// Read-only lookups between one version's numeric identifiers and names.
///
/// Implementations are built once at startup and shared between connections.
pub trait Mapping: Send + Sync {
    /// Runtime ID of the block state with `name` and `properties`.
    fn state_to_runtime_id(&self, name: &str, properties: &Properties) -> Option<u32>;

    fn runtime_id_to_state(&self, runtime_id: u32) -> Option<&BlockState>;

    fn item_id_by_name(&self, name: &str) -> Option<i32>;

    fn item_name_by_id(&self, id: i32) -> Option<&str>;

    /// Runtime ID of air, used whenever a block lookup misses.
    fn air_runtime_id(&self) -> u32;
}
