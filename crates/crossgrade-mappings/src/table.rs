use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{BlockState, Mapping, MappingError, Properties, AIR_NAME};

#[derive(Deserialize)]
struct ItemEntry {
    name: String,
    id: i32,
}

#[derive(Deserialize)]
struct MappingFile {
    blocks: Vec<BlockState>,
    #[serde(default)]
    items: Vec<ItemEntry>,
}

/// A mapping loaded from JSON. A block's runtime ID is its position in the block list.
#[derive(Debug, Clone)]
pub struct MappingTable {
    blocks: Vec<BlockState>,
    states: HashMap<String, Vec<(Properties, u32)>>,
    items_by_name: HashMap<String, i32>,
    items_by_id: HashMap<i32, String>,
    air: u32,
}

impl MappingTable {
    /// Builds a table from block states in runtime ID order and `(name, id)` item pairs.
    pub fn new(
        blocks: Vec<BlockState>,
        items: impl IntoIterator<Item = (String, i32)>,
    ) -> Result<Self, MappingError> {
        let mut states: HashMap<String, Vec<(Properties, u32)>> = HashMap::new();
        for (id, state) in blocks.iter().enumerate() {
            let id = id as u32;
            let variants = states.entry(state.name.clone()).or_default();
            if let Some((_, first)) = variants.iter().find(|(p, _)| *p == state.properties) {
                return Err(MappingError::DuplicateState {
                    name: state.name.clone(),
                    first: *first,
                    second: id,
                });
            }
            variants.push((state.properties.clone(), id));
        }

        let air = states
            .get(AIR_NAME)
            .and_then(|v| v.iter().find(|(p, _)| p.is_empty()))
            .map(|(_, id)| *id)
            .ok_or(MappingError::MissingAir)?;

        let mut items_by_name = HashMap::new();
        let mut items_by_id = HashMap::new();
        for (name, id) in items {
            if items_by_name.insert(name.clone(), id).is_some() {
                return Err(MappingError::DuplicateItem { name });
            }
            items_by_id.insert(id, name);
        }

        Ok(Self {
            blocks,
            states,
            items_by_name,
            items_by_id,
            air,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        let file: MappingFile = serde_json::from_str(json)?;
        Self::new(file.blocks, file.items.into_iter().map(|i| (i.name, i.id)))
    }

    /// Loads a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_json(&contents)?;
        debug!(
            "Loaded {} block states and {} items from {}",
            table.block_count(),
            table.item_count(),
            path.display()
        );
        Ok(table)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn item_count(&self) -> usize {
        self.items_by_name.len()
    }
}

impl Mapping for MappingTable {
    fn state_to_runtime_id(&self, name: &str, properties: &Properties) -> Option<u32> {
        self.states
            .get(name)?
            .iter()
            .find(|(p, _)| p == properties)
            .map(|(_, id)| *id)
    }

    fn runtime_id_to_state(&self, runtime_id: u32) -> Option<&BlockState> {
        self.blocks.get(runtime_id as usize)
    }

    fn item_id_by_name(&self, name: &str) -> Option<i32> {
        self.items_by_name.get(name).copied()
    }

    fn item_name_by_id(&self, id: i32) -> Option<&str> {
        self.items_by_id.get(&id).map(String::as_str)
    }

    fn air_runtime_id(&self) -> u32 {
        self.air
    }
}
