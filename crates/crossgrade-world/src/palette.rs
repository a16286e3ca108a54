use std::collections::HashMap;

use crossgrade_protocol_core::Io;

use crate::ChunkError;

/// Number of cells in a 16x16x16 storage.
pub const STORAGE_SIZE: usize = 4096;
/// Bit widths a storage may be encoded with.
pub const ALLOWED_BITS: [u8; 9] = [0, 1, 2, 3, 4, 5, 6, 8, 16];
/// Header width marking a biome storage that repeats the previous one.
pub const BITS_SAME_AS_PREVIOUS: u8 = 0x7f;

/// Flat index of a cell. The network layout is XZY.
#[inline]
pub fn cell_index(x: u8, y: u8, z: u8) -> usize {
    ((x as usize & 15) << 8) | ((z as usize & 15) << 4) | (y as usize & 15)
}

/// A 16x16x16 grid of values stored as palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettedStorage {
    palette: Vec<u32>,
    indices: Box<[u16; STORAGE_SIZE]>,
}

impl PalettedStorage {
    /// A storage where every cell holds `value`.
    pub fn uniform(value: u32) -> Self {
        Self {
            palette: vec![value],
            indices: Box::new([0u16; STORAGE_SIZE]),
        }
    }

    /// Builds a storage from cell values in XZY order.
    pub fn from_values(values: &[u32; STORAGE_SIZE]) -> Self {
        let mut palette = Vec::new();
        let mut palette_map = HashMap::new();
        let mut indices = Box::new([0u16; STORAGE_SIZE]);
        for (i, &value) in values.iter().enumerate() {
            let idx = *palette_map.entry(value).or_insert_with(|| {
                palette.push(value);
                palette.len() - 1
            });
            indices[i] = idx as u16;
        }
        Self { palette, indices }
    }

    pub fn palette(&self) -> &[u32] {
        &self.palette
    }

    pub fn at(&self, x: u8, y: u8, z: u8) -> u32 {
        self.palette[self.indices[cell_index(x, y, z)] as usize]
    }

    pub fn set(&mut self, x: u8, y: u8, z: u8, value: u32) {
        let idx = match self.palette.iter().position(|&v| v == value) {
            Some(idx) => idx,
            None => {
                if self.palette.len() >= STORAGE_SIZE {
                    self.compact();
                }
                self.palette.push(value);
                self.palette.len() - 1
            }
        };
        self.indices[cell_index(x, y, z)] = idx as u16;
    }

    /// True if every cell holds `value`.
    pub fn is_uniform(&self, value: u32) -> bool {
        if self.palette.len() == 1 {
            return self.palette[0] == value;
        }
        self.indices
            .iter()
            .all(|&idx| self.palette[idx as usize] == value)
    }

    /// Replaces every value through `f`, merging entries that end up equal.
    pub fn remap(&mut self, mut f: impl FnMut(u32) -> u32) {
        for value in &mut self.palette {
            *value = f(*value);
        }
        self.compact();
    }

    /// Drops palette entries no cell refers to and merges duplicates.
    pub fn compact(&mut self) {
        let mut values = [0u32; STORAGE_SIZE];
        for (value, &idx) in values.iter_mut().zip(self.indices.iter()) {
            *value = self.palette[idx as usize];
        }
        *self = Self::from_values(&values);
    }

    /// Smallest allowed width that can address every palette entry.
    pub fn bits_per_block(&self) -> u8 {
        let len = self.palette.len();
        ALLOWED_BITS
            .iter()
            .copied()
            .find(|&bits| (1usize << bits) >= len)
            .unwrap_or(16)
    }

    /// Reads one runtime-ID storage. `Ok(None)` is returned for the "same as previous" header.
    pub fn decode(io: &mut dyn Io) -> Result<Option<Self>, ChunkError> {
        let mut header = 0u8;
        io.u8(&mut header)?;
        if header & 1 == 0 {
            return Err(ChunkError::DiskPersistence);
        }
        let bits = header >> 1;
        if bits == BITS_SAME_AS_PREVIOUS {
            return Ok(None);
        }
        if !ALLOWED_BITS.contains(&bits) {
            return Err(ChunkError::UnsupportedBitsPerBlock(bits));
        }

        if bits == 0 {
            let mut value = 0i32;
            io.varint32(&mut value)?;
            return Ok(Some(Self::uniform(value as u32)));
        }

        let per_word = 32 / bits as usize;
        let mut words = vec![0u32; STORAGE_SIZE.div_ceil(per_word)];
        for word in &mut words {
            io.u32(word)?;
        }

        let mut count = 0i32;
        io.varint32(&mut count)?;
        if count <= 0 || count as usize > STORAGE_SIZE {
            return Err(ChunkError::InvalidPaletteSize(count));
        }
        let mut palette = vec![0u32; count as usize];
        for value in &mut palette {
            let mut v = 0i32;
            io.varint32(&mut v)?;
            *value = v as u32;
        }

        let mask = (1u32 << bits) - 1;
        let mut indices = Box::new([0u16; STORAGE_SIZE]);
        for (i, slot) in indices.iter_mut().enumerate() {
            let shift = (i % per_word) * bits as usize;
            let idx = ((words[i / per_word] >> shift) & mask) as u16;
            if idx as usize >= palette.len() {
                return Err(ChunkError::PaletteIndexOutOfRange {
                    index: idx,
                    len: palette.len(),
                });
            }
            *slot = idx;
        }

        Ok(Some(Self { palette, indices }))
    }

    /// Writes the storage with the smallest width its palette allows.
    pub fn encode(&self, io: &mut dyn Io) -> Result<(), ChunkError> {
        let bits = self.bits_per_block();
        io.u8(&mut (bits << 1 | 1))?;

        if bits == 0 {
            io.varint32(&mut (self.palette[0] as i32))?;
            return Ok(());
        }

        let per_word = 32 / bits as usize;
        let mut words = vec![0u32; STORAGE_SIZE.div_ceil(per_word)];
        for (i, &idx) in self.indices.iter().enumerate() {
            words[i / per_word] |= (idx as u32) << ((i % per_word) * bits as usize);
        }
        for word in &mut words {
            io.u32(word)?;
        }

        io.varint32(&mut (self.palette.len() as i32))?;
        for &value in &self.palette {
            io.varint32(&mut (value as i32))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use crossgrade_protocol_core::{Reader, Writer};
    use proptest::prelude::*;

    fn encode(storage: &PalettedStorage) -> Vec<u8> {
        let mut buf = BytesMut::new();
        storage.encode(&mut Writer::new(&mut buf)).unwrap();
        buf.to_vec()
    }

    fn decode(bytes: &[u8]) -> PalettedStorage {
        let mut reader = Reader::new(bytes);
        let storage = PalettedStorage::decode(&mut reader).unwrap().unwrap();
        assert_eq!(reader.remaining(), 0);
        storage
    }

    #[test]
    fn test_uniform_storage_has_no_words() {
        let bytes = encode(&PalettedStorage::uniform(7));
        // header 0<<1|1, then varint32(7) zig-zagged to 14.
        assert_eq!(bytes, vec![0x01, 0x0e]);
        assert_eq!(decode(&bytes).at(3, 4, 5), 7);
    }

    #[test]
    fn test_three_bit_word_count() {
        let mut values = [0u32; STORAGE_SIZE];
        for (i, v) in values.iter_mut().enumerate() {
            *v = (i % 5) as u32;
        }
        let storage = PalettedStorage::from_values(&values);
        assert_eq!(storage.bits_per_block(), 3);
        // 10 cells per word: 410 words, header byte, count and 5 entries.
        let bytes = encode(&storage);
        assert_eq!(bytes.len(), 1 + 410 * 4 + 1 + 5);
        assert_eq!(decode(&bytes), storage);
    }

    #[test]
    fn test_bits_round_up_to_allowed_width() {
        let mut values = [0u32; STORAGE_SIZE];
        for (i, v) in values.iter_mut().enumerate() {
            *v = (i % 100) as u32;
        }
        // 100 entries need 7 bits, which is not a valid width.
        assert_eq!(PalettedStorage::from_values(&values).bits_per_block(), 8);
    }

    #[test]
    fn test_cell_index_is_xzy() {
        assert_eq!(cell_index(1, 0, 0), 256);
        assert_eq!(cell_index(0, 0, 1), 16);
        assert_eq!(cell_index(0, 1, 0), 1);

        let mut storage = PalettedStorage::uniform(0);
        storage.set(1, 2, 3, 9);
        let bytes = encode(&storage);
        let decoded = decode(&bytes);
        assert_eq!(decoded.at(1, 2, 3), 9);
        assert_eq!(decoded.at(3, 2, 1), 0);
    }

    #[test]
    fn test_previous_reference_header() {
        let bytes = [BITS_SAME_AS_PREVIOUS << 1 | 1];
        let mut reader = Reader::new(&bytes);
        assert!(PalettedStorage::decode(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_headers() {
        let mut reader = Reader::new(&[7 << 1 | 1]);
        assert!(matches!(
            PalettedStorage::decode(&mut reader),
            Err(ChunkError::UnsupportedBitsPerBlock(7))
        ));

        let mut reader = Reader::new(&[1 << 1]);
        assert!(matches!(
            PalettedStorage::decode(&mut reader),
            Err(ChunkError::DiskPersistence)
        ));
    }

    #[test]
    fn test_index_past_palette_is_rejected() {
        let mut buf = BytesMut::new();
        let mut w = Writer::new(&mut buf);
        w.u8(&mut (1 << 1 | 1)).unwrap();
        // Every cell points at index 1.
        for _ in 0..128 {
            let mut word = u32::MAX;
            w.u32(&mut word).unwrap();
        }
        w.varint32(&mut 1).unwrap();
        w.varint32(&mut 5).unwrap();
        let mut reader = Reader::new(&buf);
        assert!(matches!(
            PalettedStorage::decode(&mut reader),
            Err(ChunkError::PaletteIndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_remap_merges_entries() {
        let mut storage = PalettedStorage::uniform(1);
        storage.set(0, 0, 0, 2);
        storage.set(0, 1, 0, 3);
        storage.remap(|v| if v == 3 { 2 } else { v * 10 });
        assert_eq!(storage.palette().len(), 2);
        assert_eq!(storage.at(0, 0, 0), 20);
        assert_eq!(storage.at(0, 1, 0), 2);
        assert_eq!(storage.at(15, 15, 15), 10);
    }

    proptest! {
        #[test]
        fn test_storage_round_trip(
            distinct in 1usize..300,
            seed in proptest::collection::vec(any::<u32>(), STORAGE_SIZE),
        ) {
            let mut values = [0u32; STORAGE_SIZE];
            for (v, s) in values.iter_mut().zip(seed) {
                *v = s % distinct as u32;
            }
            let storage = PalettedStorage::from_values(&values);
            let decoded = decode(&encode(&storage));
            for x in 0..16 {
                for z in 0..16 {
                    for y in 0..16 {
                        prop_assert_eq!(decoded.at(x, y, z), values[cell_index(x, y, z)]);
                    }
                }
            }
        }
    }
}
