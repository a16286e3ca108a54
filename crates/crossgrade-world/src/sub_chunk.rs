use crate::PalettedStorage;

/// A 16x16x16 section of a chunk column with one or more block layers.
///
/// Layer 0 holds regular blocks and layer 1 holds liquids sharing a cell with them.
/// Layers are created on demand, filled with air.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubChunk {
    air: u32,
    layers: Vec<PalettedStorage>,
}

impl SubChunk {
    pub fn new(air: u32) -> Self {
        Self {
            air,
            layers: Vec::new(),
        }
    }

    pub(crate) fn with_layers(air: u32, layers: Vec<PalettedStorage>) -> Self {
        Self { air, layers }
    }

    pub fn air(&self) -> u32 {
        self.air
    }

    pub fn layers(&self) -> &[PalettedStorage] {
        &self.layers
    }

    /// Mutable access to a layer, adding air layers up to `layer` if needed.
    pub fn layer_mut(&mut self, layer: usize) -> &mut PalettedStorage {
        while self.layers.len() <= layer {
            self.layers.push(PalettedStorage::uniform(self.air));
        }
        &mut self.layers[layer]
    }

    pub fn block(&self, x: u8, y: u8, z: u8, layer: usize) -> u32 {
        self.layers
            .get(layer)
            .map_or(self.air, |storage| storage.at(x, y, z))
    }

    pub fn set_block(&mut self, x: u8, y: u8, z: u8, layer: usize, runtime_id: u32) {
        if layer >= self.layers.len() && runtime_id == self.air {
            return;
        }
        self.layer_mut(layer).set(x, y, z, runtime_id);
    }

    /// True if every layer holds only air.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|layer| layer.is_uniform(self.air))
    }

    /// Copy of this sub chunk in another ID space. Layer indices and cell positions are kept.
    pub fn remapped(&self, air: u32, mut f: impl FnMut(u32) -> u32) -> SubChunk {
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                let mut layer = layer.clone();
                layer.remap(&mut f);
                layer
            })
            .collect();
        SubChunk { air, layers }
    }

    /// Removes trailing layers that hold only air.
    pub fn compact(&mut self) {
        while self
            .layers
            .last()
            .is_some_and(|layer| layer.is_uniform(self.air))
        {
            self.layers.pop();
        }
        for layer in &mut self.layers {
            layer.compact();
        }
    }
}
