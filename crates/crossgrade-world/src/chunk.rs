use crate::{PalettedStorage, SubChunk};

/// Inclusive vertical bounds of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightRange {
    pub min: i32,
    pub max: i32,
}

impl HeightRange {
    /// y from -64 to 319: 24 sub chunks.
    pub const OVERWORLD: HeightRange = HeightRange { min: -64, max: 319 };

    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn height(&self) -> i32 {
        self.max - self.min + 1
    }

    pub fn sub_chunk_count(&self) -> usize {
        (self.height() >> 4) as usize
    }

    /// Absolute sub chunk y of the lowest sub chunk.
    pub fn min_sub_chunk_y(&self) -> i32 {
        self.min >> 4
    }
}

/// A full column of sub chunks plus one biome storage per sub chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    range: HeightRange,
    air: u32,
    sub: Vec<SubChunk>,
    biomes: Vec<PalettedStorage>,
}

impl Chunk {
    /// An all-air chunk with every biome set to 0.
    pub fn new(air: u32, range: HeightRange) -> Self {
        let count = range.sub_chunk_count();
        Self {
            range,
            air,
            sub: (0..count).map(|_| SubChunk::new(air)).collect(),
            biomes: (0..count).map(|_| PalettedStorage::uniform(0)).collect(),
        }
    }

    pub fn range(&self) -> HeightRange {
        self.range
    }

    pub fn air(&self) -> u32 {
        self.air
    }

    pub fn sub(&self) -> &[SubChunk] {
        &self.sub
    }

    pub fn sub_mut(&mut self) -> &mut [SubChunk] {
        &mut self.sub
    }

    pub fn biomes(&self) -> &[PalettedStorage] {
        &self.biomes
    }

    pub(crate) fn biomes_mut(&mut self) -> &mut [PalettedStorage] {
        &mut self.biomes
    }

    /// Index into `sub()` of the sub chunk holding absolute `y`.
    pub fn sub_index(&self, y: i32) -> usize {
        ((y - self.range.min) >> 4) as usize
    }

    pub fn block(&self, x: u8, y: i32, z: u8, layer: usize) -> u32 {
        if y < self.range.min || y > self.range.max {
            return self.air;
        }
        self.sub[self.sub_index(y)].block(x, (y & 15) as u8, z, layer)
    }

    pub fn set_block(&mut self, x: u8, y: i32, z: u8, layer: usize, runtime_id: u32) {
        if y < self.range.min || y > self.range.max {
            return;
        }
        let index = self.sub_index(y);
        self.sub[index].set_block(x, (y & 15) as u8, z, layer, runtime_id);
    }

    pub fn biome(&self, x: u8, y: i32, z: u8) -> u32 {
        let y = y.clamp(self.range.min, self.range.max);
        self.biomes[self.sub_index(y)].at(x, (y & 15) as u8, z)
    }

    pub fn set_biome(&mut self, x: u8, y: i32, z: u8, biome: u32) {
        if y < self.range.min || y > self.range.max {
            return;
        }
        let index = self.sub_index(y);
        self.biomes[index].set(x, (y & 15) as u8, z, biome);
    }

    /// Highest y in the column with a non-air block in layer 0, or the range minimum.
    pub fn highest_block(&self, x: u8, z: u8) -> i32 {
        for (index, sub) in self.sub.iter().enumerate().rev() {
            if sub.is_empty() {
                continue;
            }
            for y in (0..16u8).rev() {
                if sub.block(x, y, z, 0) != self.air {
                    return self.range.min + (index as i32) * 16 + y as i32;
                }
            }
        }
        self.range.min
    }

    /// Index of the highest sub chunk that holds anything other than air.
    pub fn highest_filled_sub_chunk(&self) -> Option<usize> {
        self.sub.iter().rposition(|sub| !sub.is_empty())
    }
}
