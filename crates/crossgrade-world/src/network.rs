use bytes::BytesMut;
use crossgrade_protocol_core::{Io, Reader, Writer};

use crate::{Chunk, ChunkError, HeightRange, PalettedStorage, SubChunk, BITS_SAME_AS_PREVIOUS};

/// Sub chunk version written by the encoder. It carries the sub chunk's y index.
pub const SUB_CHUNK_VERSION: u8 = 9;

/// Decodes one sub chunk. The second value is the index into the range's sub chunks
/// when the version carries one.
pub fn decode_sub_chunk(
    io: &mut dyn Io,
    air: u32,
    range: HeightRange,
) -> Result<(SubChunk, Option<usize>), ChunkError> {
    let mut version = 0u8;
    io.u8(&mut version)?;

    let mut index = None;
    let layer_count = match version {
        1 => 1,
        8 | 9 => {
            let mut count = 0u8;
            io.u8(&mut count)?;
            if version == 9 {
                let mut y = 0i8;
                io.i8(&mut y)?;
                let relative = y as i32 - range.min_sub_chunk_y();
                if relative < 0 || relative as usize >= range.sub_chunk_count() {
                    return Err(ChunkError::SubChunkIndexOutOfRange(y as i32));
                }
                index = Some(relative as usize);
            }
            count
        }
        other => return Err(ChunkError::UnknownSubChunkVersion(other)),
    };

    let mut layers = Vec::with_capacity(layer_count as usize);
    for _ in 0..layer_count {
        let storage =
            PalettedStorage::decode(io)?.ok_or(ChunkError::UnexpectedPreviousReference)?;
        layers.push(storage);
    }
    Ok((SubChunk::with_layers(air, layers), index))
}

/// Encodes a sub chunk as version 9 at position `index` of the range.
pub fn encode_sub_chunk(
    io: &mut dyn Io,
    sub: &SubChunk,
    range: HeightRange,
    index: usize,
) -> Result<(), ChunkError> {
    let mut version = SUB_CHUNK_VERSION;
    io.u8(&mut version)?;
    io.u8(&mut (sub.layers().len() as u8))?;
    io.i8(&mut ((index as i32 + range.min_sub_chunk_y()) as i8))?;
    for layer in sub.layers() {
        layer.encode(io)?;
    }
    Ok(())
}

/// Decodes `count` sub chunks followed by the biome storages of a level chunk payload.
///
/// Returns the chunk and the number of bytes consumed. Whatever follows is
/// left to the caller.
pub fn network_decode(
    payload: &[u8],
    count: usize,
    air: u32,
    range: HeightRange,
) -> Result<(Chunk, usize), ChunkError> {
    let max = range.sub_chunk_count();
    if count > max {
        return Err(ChunkError::TooManySubChunks { count, max });
    }

    let mut reader = Reader::new(payload);
    let mut chunk = Chunk::new(air, range);
    for i in 0..count {
        let (sub, index) = decode_sub_chunk(&mut reader, air, range)?;
        chunk.sub_mut()[index.unwrap_or(i)] = sub;
    }

    let mut last: Option<PalettedStorage> = None;
    for i in 0..max {
        let storage = match PalettedStorage::decode(&mut reader)? {
            Some(storage) => storage,
            None => last.clone().ok_or(ChunkError::FirstBiomeReferencesPrevious)?,
        };
        last = Some(storage.clone());
        chunk.biomes_mut()[i] = storage;
    }

    Ok((chunk, payload.len() - reader.remaining()))
}

/// Encodes every sub chunk up to the highest non-empty one, then all biome storages.
///
/// Returns the bytes and the number of sub chunks written.
pub fn network_encode(chunk: &Chunk) -> Result<(BytesMut, usize), ChunkError> {
    let count = chunk.highest_filled_sub_chunk().map_or(0, |index| index + 1);

    let mut buf = BytesMut::new();
    let mut writer = Writer::new(&mut buf);
    for (index, sub) in chunk.sub()[..count].iter().enumerate() {
        encode_sub_chunk(&mut writer, sub, chunk.range(), index)?;
    }

    let biomes = chunk.biomes();
    for (i, storage) in biomes.iter().enumerate() {
        if i > 0 && biomes[i - 1] == *storage {
            writer.u8(&mut (BITS_SAME_AS_PREVIOUS << 1 | 1))?;
        } else {
            storage.encode(&mut writer)?;
        }
    }

    Ok((buf, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::Rng;

    const RANGE: HeightRange = HeightRange::OVERWORLD;

    fn uniform_biomes(w: &mut Writer, mut biome: i32) {
        w.u8(&mut 1).unwrap();
        w.varint32(&mut biome).unwrap();
        for _ in 1..RANGE.sub_chunk_count() {
            w.u8(&mut (BITS_SAME_AS_PREVIOUS << 1 | 1)).unwrap();
        }
    }

    #[test]
    fn test_decode_version_8_places_by_order() {
        let mut buf = BytesMut::new();
        let mut w = Writer::new(&mut buf);
        for mut id in [3, 4] {
            w.u8(&mut 8).unwrap();
            w.u8(&mut 1).unwrap();
            w.u8(&mut 1).unwrap();
            w.varint32(&mut id).unwrap();
        }
        uniform_biomes(&mut w, 2);
        w.bytes(&mut vec![0xaa, 0xbb]).unwrap();

        let (chunk, consumed) = network_decode(&buf, 2, 0, RANGE).unwrap();
        assert_eq!(consumed, buf.len() - 2);
        assert_eq!(chunk.block(0, -64, 0, 0), 3);
        assert_eq!(chunk.block(0, -48, 0, 0), 4);
        assert_eq!(chunk.block(0, -32, 0, 0), 0);
        assert_eq!(chunk.biome(5, 200, 5), 2);
    }

    #[test]
    fn test_decode_version_9_uses_y_index() {
        let mut chunk = Chunk::new(0, RANGE);
        chunk.set_block(1, 64, 1, 0, 12);
        let (payload, count) = network_encode(&chunk).unwrap();
        // y 64 lives in absolute sub chunk 4, index 8 of the range.
        assert_eq!(count, 9);
        assert_eq!(payload[0], SUB_CHUNK_VERSION);
        assert_eq!(payload[2] as i8, -4);

        let (decoded, consumed) = network_decode(&payload, count, 0, RANGE).unwrap();
        assert_eq!(consumed, payload.len());
        assert_eq!(decoded.block(1, 64, 1, 0), 12);
        assert_eq!(decoded.highest_block(1, 1), 64);
    }

    #[test]
    fn test_decode_version_1() {
        let mut buf = BytesMut::new();
        let mut w = Writer::new(&mut buf);
        w.u8(&mut 1).unwrap();
        w.u8(&mut 1).unwrap();
        w.varint32(&mut 6).unwrap();
        let (sub, index) = decode_sub_chunk(&mut Reader::new(&buf), 0, RANGE).unwrap();
        assert_eq!(index, None);
        assert_eq!(sub.layers().len(), 1);
        assert_eq!(sub.block(9, 9, 9, 0), 6);
    }

    #[test]
    fn test_sub_chunk_errors() {
        let bytes = [2u8, 0];
        assert!(matches!(
            decode_sub_chunk(&mut Reader::new(&bytes), 0, RANGE),
            Err(ChunkError::UnknownSubChunkVersion(2))
        ));

        let bytes = [9u8, 0, 40];
        assert!(matches!(
            decode_sub_chunk(&mut Reader::new(&bytes), 0, RANGE),
            Err(ChunkError::SubChunkIndexOutOfRange(40))
        ));

        let bytes = [8u8, 1];
        assert!(matches!(
            decode_sub_chunk(&mut Reader::new(&bytes), 0, RANGE),
            Err(ChunkError::Codec(_))
        ));
    }

    #[test]
    fn test_first_biome_cannot_reference_previous() {
        let bytes = [BITS_SAME_AS_PREVIOUS << 1 | 1];
        assert!(matches!(
            network_decode(&bytes, 0, 0, RANGE),
            Err(ChunkError::FirstBiomeReferencesPrevious)
        ));
    }

    #[test]
    fn test_too_many_sub_chunks() {
        assert!(matches!(
            network_decode(&[], 25, 0, RANGE),
            Err(ChunkError::TooManySubChunks { count: 25, max: 24 })
        ));
    }

    #[test]
    fn test_empty_chunk_writes_only_biomes() {
        let chunk = Chunk::new(0, RANGE);
        let (payload, count) = network_encode(&chunk).unwrap();
        assert_eq!(count, 0);
        // One uniform storage, then 23 "same as previous" headers.
        assert_eq!(payload.len(), 2 + 23);
    }

    #[test]
    fn test_random_chunk_round_trip() {
        let mut rng = rand::thread_rng();
        let mut chunk = Chunk::new(0, RANGE);
        for _ in 0..2000 {
            let x = rng.gen_range(0..16);
            let z = rng.gen_range(0..16);
            let y = rng.gen_range(-64..=319);
            chunk.set_block(x, y, z, rng.gen_range(0..2), rng.gen_range(0..600));
            chunk.set_biome(x, y, z, rng.gen_range(0..40));
        }
        let (payload, count) = network_encode(&chunk).unwrap();
        let (decoded, _) = network_decode(&payload, count, 0, RANGE).unwrap();
        for x in 0..16 {
            for z in 0..16 {
                for y in RANGE.min..=RANGE.max {
                    for layer in 0..2 {
                        assert_eq!(decoded.block(x, y, z, layer), chunk.block(x, y, z, layer));
                    }
                    assert_eq!(decoded.biome(x, y, z), chunk.biome(x, y, z));
                }
            }
        }
    }

    proptest! {
        #[test]
        fn test_sub_chunk_count_tracks_highest_block(
            blocks in proptest::collection::vec((0u8..16, -64i32..320, 0u8..16, 1u32..50), 0..64),
        ) {
            let mut chunk = Chunk::new(0, RANGE);
            for &(x, y, z, id) in &blocks {
                chunk.set_block(x, y, z, 0, id);
            }
            let (payload, count) = network_encode(&chunk).unwrap();
            let expected = blocks
                .iter()
                .map(|&(_, y, _, _)| chunk.sub_index(y) + 1)
                .max()
                .unwrap_or(0);
            prop_assert_eq!(count, expected);

            let (decoded, consumed) = network_decode(&payload, count, 0, RANGE).unwrap();
            prop_assert_eq!(consumed, payload.len());
            for &(x, y, z, _) in &blocks {
                prop_assert_eq!(decoded.block(x, y, z, 0), chunk.block(x, y, z, 0));
            }
        }
    }
}
