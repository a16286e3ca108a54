use std::collections::HashMap;

use bytes::BytesMut;
use crossgrade_protocol_core::{
    ClientCacheMissResponse, LevelChunk, Reader, SubChunk as SubChunkPacket, Writer,
    SUB_CHUNK_RESULT_SUCCESS,
};
use crossgrade_world::{
    decode_sub_chunk, encode_sub_chunk, network_decode, network_encode, Chunk, ChunkError,
    HeightRange, SUB_CHUNK_VERSION,
};
use tracing::error;

use super::{Conversion, Translator};

const DIMENSION_NETHER: i32 = 1;
const DIMENSION_END: i32 = 2;

/// Vertical range the terrain of `dimension` is encoded over.
pub fn dimension_range(dimension: i32) -> HeightRange {
    match dimension {
        DIMENSION_NETHER => HeightRange::new(0, 127),
        DIMENSION_END => HeightRange::new(0, 255),
        _ => HeightRange::OVERWORLD,
    }
}

/// Wraps `f` so it runs once per distinct ID.
fn memoize(mut f: impl FnMut(u32) -> u32) -> impl FnMut(u32) -> u32 {
    let mut seen = HashMap::new();
    move |id| *seen.entry(id).or_insert_with(|| f(id))
}

/// Re-encodes a level chunk payload holding `count` sub chunks into another ID space.
///
/// Every layer cell goes through `remap`. Biomes are carried over at the highest
/// block of each column. Bytes the decoder did not consume are appended unchanged.
/// Returns the payload and the number of sub chunks it now holds.
pub fn reencode_level_chunk(
    payload: &[u8],
    count: usize,
    range: HeightRange,
    source_air: u32,
    target_air: u32,
    remap: impl FnMut(u32) -> u32,
) -> Result<(Vec<u8>, usize), ChunkError> {
    let mut remap = memoize(remap);
    let (source, consumed) = network_decode(payload, count, source_air, range)?;

    let mut target = Chunk::new(target_air, range);
    for (to, from) in target.sub_mut().iter_mut().zip(source.sub()) {
        *to = from.remapped(target_air, &mut remap);
    }
    for x in 0..16u8 {
        for z in 0..16u8 {
            let y = source.highest_block(x, z);
            target.set_biome(x, y, z, source.biome(x, y, z));
        }
    }

    let (encoded, written) = network_encode(&target)?;
    let mut out = encoded.to_vec();
    out.extend_from_slice(&payload[consumed..]);
    Ok((out, written))
}

/// Re-encodes one serialised sub chunk into another ID space.
///
/// The sub chunk keeps the y index it was sent with; versions without one are
/// written at `fallback_index`. Trailing bytes are appended unchanged.
pub fn reencode_sub_chunk(
    payload: &[u8],
    range: HeightRange,
    fallback_index: usize,
    source_air: u32,
    target_air: u32,
    remap: impl FnMut(u32) -> u32,
) -> Result<Vec<u8>, ChunkError> {
    let mut reader = Reader::new(payload);
    let (sub, index) = decode_sub_chunk(&mut reader, source_air, range)?;
    let consumed = payload.len() - reader.remaining();

    let mut sub = sub.remapped(target_air, memoize(remap));
    sub.compact();

    let mut buf = BytesMut::new();
    encode_sub_chunk(
        &mut Writer::new(&mut buf),
        &sub,
        range,
        index.unwrap_or(fallback_index),
    )?;
    buf.extend_from_slice(&payload[consumed..]);
    Ok(buf.to_vec())
}

/// Recodes the terrain of a level chunk in place. Request-mode chunks carry no
/// terrain and cached chunks send theirs as blobs; both are left alone. On a
/// decode failure the packet keeps its original payload.
pub fn recode_level_chunk(pk: &mut LevelChunk, t: &Translator, conversion: Conversion) {
    if !pk.carries_terrain() || pk.cache_enabled {
        return;
    }
    let result = reencode_level_chunk(
        &pk.raw_payload,
        pk.sub_chunk_count as usize,
        dimension_range(pk.dimension),
        t.source_air(conversion),
        t.target_air(conversion),
        |id| t.remap_block(conversion, id),
    );
    match result {
        Ok((payload, count)) => {
            pk.raw_payload = payload;
            pk.sub_chunk_count = count as u32;
        }
        Err(e) => error!(
            "Cannot recode level chunk at {:?}, forwarding it as is: {}",
            pk.position, e
        ),
    }
}

/// Recodes every successful entry of a sub chunk packet. Entries either all
/// change or, if any fails to decode, none do.
pub fn recode_sub_chunks(pk: &mut SubChunkPacket, t: &Translator, conversion: Conversion) {
    if pk.cache_enabled {
        return;
    }
    let range = dimension_range(pk.dimension);
    let mut payloads = Vec::with_capacity(pk.entries.len());
    for entry in &pk.entries {
        if entry.result != SUB_CHUNK_RESULT_SUCCESS {
            payloads.push(None);
            continue;
        }
        let fallback = pk
            .position
            .y
            .checked_add(entry.offset[1] as i32)
            .and_then(|y| y.checked_sub(range.min_sub_chunk_y()))
            .and_then(|index| usize::try_from(index).ok())
            .unwrap_or(0);
        let recoded = reencode_sub_chunk(
            &entry.raw_payload,
            range,
            fallback,
            t.source_air(conversion),
            t.target_air(conversion),
            |id| t.remap_block(conversion, id),
        );
        match recoded {
            Ok(payload) => payloads.push(Some(payload)),
            Err(e) => {
                error!(
                    "Cannot recode sub chunk at {:?} (y offset {}), forwarding the packet as is: {}",
                    pk.position, entry.offset[1], e
                );
                return;
            }
        }
    }
    for (entry, payload) in pk.entries.iter_mut().zip(payloads) {
        if let Some(payload) = payload {
            entry.raw_payload = payload;
        }
    }
}

/// Recodes cached blobs that hold a sub chunk. Blobs carry no position, so sub
/// chunks without a y index are written at the bottom of the overworld.
pub fn recode_cache_blobs(pk: &mut ClientCacheMissResponse, t: &Translator, conversion: Conversion) {
    let mut payloads = Vec::with_capacity(pk.blobs.len());
    for blob in &pk.blobs {
        if !matches!(blob.payload.first(), Some(&v) if v == SUB_CHUNK_VERSION || v == 8) {
            payloads.push(None);
            continue;
        }
        let recoded = reencode_sub_chunk(
            &blob.payload,
            HeightRange::OVERWORLD,
            0,
            t.source_air(conversion),
            t.target_air(conversion),
            |id| t.remap_block(conversion, id),
        );
        match recoded {
            Ok(payload) => payloads.push(Some(payload)),
            Err(e) => {
                error!(
                    "Cannot recode cache blob {:x}, forwarding the response as is: {}",
                    blob.hash, e
                );
                return;
            }
        }
    }
    for (blob, payload) in pk.blobs.iter_mut().zip(payloads) {
        if let Some(payload) = payload {
            blob.payload = payload;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::tests::translator;
    use crossgrade_protocol_core::{
        CacheBlob, Io, SubChunkEntry, SUB_CHUNK_REQUEST_MODE_LIMITED, SUB_CHUNK_RESULT_SUCCESS_ALL_AIR,
    };
    use crossgrade_types::{ChunkPos, SubChunkPos};
    use crossgrade_world::SubChunk;
    use proptest::prelude::*;

    const RANGE: HeightRange = HeightRange::OVERWORLD;
    // Air is 0 in the legacy table and 1 in the latest one.
    const LEGACY_AIR: u32 = 0;
    const LATEST_AIR: u32 = 1;

    fn encode_sub(sub: &SubChunk, index: usize) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_sub_chunk(&mut Writer::new(&mut buf), sub, RANGE, index).unwrap();
        buf.to_vec()
    }

    #[test]
    fn test_level_chunk_is_remapped_cell_by_cell() {
        let t = translator();
        let mut chunk = Chunk::new(LEGACY_AIR, RANGE);
        chunk.set_block(0, -64, 0, 0, 1);
        chunk.set_block(15, 100, 15, 0, 2);
        chunk.set_block(15, 100, 15, 1, 4);
        let (payload, count) = network_encode(&chunk).unwrap();

        let (out, written) = reencode_level_chunk(
            &payload,
            count,
            RANGE,
            LEGACY_AIR,
            LATEST_AIR,
            |id| t.upgrade_block(id),
        )
        .unwrap();
        assert_eq!(written, count);

        let (upgraded, consumed) = network_decode(&out, written, LATEST_AIR, RANGE).unwrap();
        assert_eq!(consumed, out.len());
        assert_eq!(upgraded.block(0, -64, 0, 0), 2);
        assert_eq!(upgraded.block(15, 100, 15, 0), 4);
        assert_eq!(upgraded.block(15, 100, 15, 1), 5);
        assert_eq!(upgraded.block(3, 3, 3, 0), LATEST_AIR);
    }

    #[test]
    fn test_trailing_bytes_survive() {
        let t = translator();
        let mut chunk = Chunk::new(LEGACY_AIR, RANGE);
        chunk.set_block(1, 0, 1, 0, 1);
        let (payload, count) = network_encode(&chunk).unwrap();
        let mut payload = payload.to_vec();
        // border block count 0, then a block entity blob.
        payload.extend_from_slice(&[0, 0x0a, 0x00, 0x00]);

        let (out, _) = reencode_level_chunk(
            &payload,
            count,
            RANGE,
            LEGACY_AIR,
            LATEST_AIR,
            |id| t.upgrade_block(id),
        )
        .unwrap();
        assert_eq!(&out[out.len() - 4..], &[0, 0x0a, 0x00, 0x00]);
    }

    #[test]
    fn test_count_shrinks_when_top_sub_chunk_becomes_air() {
        let t = translator();
        let mut chunk = Chunk::new(LEGACY_AIR, RANGE);
        chunk.set_block(0, 0, 0, 0, 1);
        // 9_999 has no legacy state and turns into air.
        chunk.set_block(0, 200, 0, 0, 9_999);
        let (payload, count) = network_encode(&chunk).unwrap();

        let (_, written) = reencode_level_chunk(
            &payload,
            count,
            RANGE,
            LEGACY_AIR,
            LATEST_AIR,
            |id| t.upgrade_block(id),
        )
        .unwrap();
        assert!(written < count);
        assert_eq!(written, chunk.sub_index(0) + 1);
    }

    #[test]
    fn test_biome_is_carried_at_highest_block() {
        let t = translator();
        let mut chunk = Chunk::new(LEGACY_AIR, RANGE);
        chunk.set_block(4, 70, 4, 0, 1);
        chunk.set_biome(4, 70, 4, 21);
        let (payload, count) = network_encode(&chunk).unwrap();

        let (out, written) = reencode_level_chunk(
            &payload,
            count,
            RANGE,
            LEGACY_AIR,
            LATEST_AIR,
            |id| t.upgrade_block(id),
        )
        .unwrap();
        let (upgraded, _) = network_decode(&out, written, LATEST_AIR, RANGE).unwrap();
        assert_eq!(upgraded.biome(4, 70, 4), 21);
    }

    #[test]
    fn test_level_chunk_decode_failure_keeps_packet() {
        let t = translator();
        let mut pk = LevelChunk {
            position: ChunkPos::new(1, 2),
            sub_chunk_count: 1,
            raw_payload: vec![7, 7, 7],
            ..Default::default()
        };
        let before = pk.clone();
        recode_level_chunk(&mut pk, &t, Conversion::Upgrade);
        assert_eq!(pk, before);
    }

    #[test]
    fn test_request_mode_chunk_is_untouched() {
        let t = translator();
        let mut pk = LevelChunk {
            sub_chunk_count: SUB_CHUNK_REQUEST_MODE_LIMITED,
            highest_sub_chunk: 4,
            raw_payload: vec![1, 2, 3],
            ..Default::default()
        };
        let before = pk.clone();
        recode_level_chunk(&mut pk, &t, Conversion::Upgrade);
        assert_eq!(pk, before);
    }

    #[test]
    fn test_sub_chunk_entries() {
        let t = translator();
        let mut sub = SubChunk::new(LATEST_AIR);
        sub.set_block(2, 2, 2, 0, 2);
        // A liquid layer that only holds air is dropped after compaction.
        sub.layer_mut(1);

        let mut pk = SubChunkPacket {
            position: SubChunkPos::new(0, 4, 0),
            entries: vec![
                SubChunkEntry {
                    offset: [0, 1, 0],
                    result: SUB_CHUNK_RESULT_SUCCESS,
                    raw_payload: encode_sub(&sub, 9),
                    ..Default::default()
                },
                SubChunkEntry {
                    offset: [0, 2, 0],
                    result: SUB_CHUNK_RESULT_SUCCESS_ALL_AIR,
                    raw_payload: vec![9, 9],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        recode_sub_chunks(&mut pk, &t, Conversion::Downgrade);

        let mut reader = Reader::new(&pk.entries[0].raw_payload);
        let (down, index) = decode_sub_chunk(&mut reader, LEGACY_AIR, RANGE).unwrap();
        assert_eq!(index, Some(9));
        assert_eq!(down.layers().len(), 1);
        assert_eq!(down.block(2, 2, 2, 0), 1);
        assert_eq!(down.block(0, 0, 0, 0), LEGACY_AIR);
        assert_eq!(pk.entries[1].raw_payload, vec![9, 9]);
    }

    #[test]
    fn test_one_bad_entry_leaves_every_entry() {
        let t = translator();
        let mut sub = SubChunk::new(LEGACY_AIR);
        sub.set_block(0, 0, 0, 0, 1);
        let good = encode_sub(&sub, 4);
        let mut pk = SubChunkPacket {
            entries: vec![
                SubChunkEntry {
                    result: SUB_CHUNK_RESULT_SUCCESS,
                    raw_payload: good.clone(),
                    ..Default::default()
                },
                SubChunkEntry {
                    result: SUB_CHUNK_RESULT_SUCCESS,
                    raw_payload: vec![3, 0],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        recode_sub_chunks(&mut pk, &t, Conversion::Upgrade);
        assert_eq!(pk.entries[0].raw_payload, good);
    }

    #[test]
    fn test_cache_blobs_only_recode_sub_chunks() {
        let t = translator();
        let mut sub = SubChunk::new(LEGACY_AIR);
        sub.set_block(0, 0, 0, 0, 1);
        let mut pk = ClientCacheMissResponse {
            blobs: vec![
                CacheBlob {
                    hash: 1,
                    payload: encode_sub(&sub, 3),
                },
                CacheBlob {
                    hash: 2,
                    // A uniform biome storage.
                    payload: vec![1, 4],
                },
            ],
        };
        recode_cache_blobs(&mut pk, &t, Conversion::Upgrade);

        let mut reader = Reader::new(&pk.blobs[0].payload);
        let (up, index) = decode_sub_chunk(&mut reader, LATEST_AIR, RANGE).unwrap();
        assert_eq!(index, Some(3));
        assert_eq!(up.block(0, 0, 0, 0), 2);
        assert_eq!(pk.blobs[1].payload, vec![1, 4]);
    }

    #[test]
    fn test_version_1_blob_is_written_at_fallback() {
        let t = translator();
        let mut buf = BytesMut::new();
        let mut w = Writer::new(&mut buf);
        w.u8(&mut 1).unwrap();
        w.u8(&mut 1).unwrap();
        w.varint32(&mut 1).unwrap();

        let out = reencode_sub_chunk(&buf, RANGE, 6, LEGACY_AIR, LATEST_AIR, |id| {
            t.upgrade_block(id)
        })
        .unwrap();
        assert_eq!(out[0], SUB_CHUNK_VERSION);
        assert_eq!(out[2] as i8, 6 + RANGE.min_sub_chunk_y() as i8);
    }

    #[test]
    fn test_biome_follows_source_top_block() {
        let t = translator();
        let mut chunk = Chunk::new(LEGACY_AIR, RANGE);
        // Legacy grass has no latest counterpart and becomes air, so the
        // column's top drops from y 20 to the stone at y 10.
        chunk.set_block(0, 10, 0, 0, 1);
        chunk.set_block(0, 20, 0, 0, 3);
        chunk.set_biome(0, 10, 0, 5);
        chunk.set_biome(0, 20, 0, 7);
        let (payload, count) = network_encode(&chunk).unwrap();

        let (up, up_count) = reencode_level_chunk(
            &payload, count, RANGE, LEGACY_AIR, LATEST_AIR, |id| t.upgrade_block(id),
        )
        .unwrap();
        let (latest, _) = network_decode(&up, up_count, LATEST_AIR, RANGE).unwrap();
        assert_eq!(latest.highest_block(0, 0), 10);
        assert_eq!(latest.biome(0, 20, 0), 7);
        assert_eq!(latest.biome(0, 10, 0), 0);

        // Going back down the carry reads the new top, which never had a biome.
        let (down, down_count) = reencode_level_chunk(
            &up, up_count, RANGE, LATEST_AIR, LEGACY_AIR, |id| t.downgrade_block(id),
        )
        .unwrap();
        let (back, _) = network_decode(&down, down_count, LEGACY_AIR, RANGE).unwrap();
        assert_eq!(back.highest_block(0, 0), 10);
        assert_eq!(back.biome(0, 10, 0), 0);
        assert_eq!(back.biome(0, 20, 0), 0);
    }

    #[test]
    fn test_extreme_positions_fall_back_to_bottom() {
        let t = translator();
        let mut buf = BytesMut::new();
        let mut w = Writer::new(&mut buf);
        w.u8(&mut 1).unwrap();
        w.u8(&mut 1).unwrap();
        w.varint32(&mut 1).unwrap();

        for (y, offset) in [(i32::MAX, 1i8), (i32::MIN, -1), (i32::MIN, 0)] {
            let mut pk = SubChunkPacket {
                position: SubChunkPos::new(0, y, 0),
                entries: vec![SubChunkEntry {
                    offset: [0, offset, 0],
                    result: SUB_CHUNK_RESULT_SUCCESS,
                    raw_payload: buf.to_vec(),
                    ..Default::default()
                }],
                ..Default::default()
            };
            recode_sub_chunks(&mut pk, &t, Conversion::Upgrade);
            let out = &pk.entries[0].raw_payload;
            assert_eq!(out[0], SUB_CHUNK_VERSION);
            assert_eq!(out[2] as i8, RANGE.min_sub_chunk_y() as i8);
        }
    }

    #[test]
    fn test_dimension_ranges() {
        assert_eq!(dimension_range(0).sub_chunk_count(), 24);
        assert_eq!(dimension_range(1).sub_chunk_count(), 8);
        assert_eq!(dimension_range(2).sub_chunk_count(), 16);
    }

    proptest! {
        #[test]
        fn test_terrain_round_trip(
            cells in proptest::collection::vec(
                (0u8..16, -64i32..320, 0u8..16, 0usize..2, prop::sample::select(vec![1u32, 2, 4])),
                1..200,
            ),
            biomes in proptest::collection::vec(1u32..64, 256),
        ) {
            let t = translator();
            let mut chunk = Chunk::new(LEGACY_AIR, RANGE);
            for &(x, y, z, layer, id) in &cells {
                chunk.set_block(x, y, z, layer, id);
            }
            for (i, &biome) in biomes.iter().enumerate() {
                let (x, z) = ((i / 16) as u8, (i % 16) as u8);
                let y = chunk.highest_block(x, z);
                chunk.set_biome(x, y, z, biome);
            }
            let (payload, count) = network_encode(&chunk).unwrap();

            let (up, up_count) = reencode_level_chunk(
                &payload, count, RANGE, LEGACY_AIR, LATEST_AIR, |id| t.upgrade_block(id),
            ).unwrap();
            let (down, down_count) = reencode_level_chunk(
                &up, up_count, RANGE, LATEST_AIR, LEGACY_AIR, |id| t.downgrade_block(id),
            ).unwrap();

            let (back, _) = network_decode(&down, down_count, LEGACY_AIR, RANGE).unwrap();
            for &(x, y, z, layer, _) in &cells {
                prop_assert_eq!(back.block(x, y, z, layer), chunk.block(x, y, z, layer));
            }
            for x in 0..16u8 {
                for z in 0..16u8 {
                    let y = chunk.highest_block(x, z);
                    prop_assert_eq!(back.highest_block(x, z), y);
                    prop_assert_eq!(back.biome(x, y, z), biomes[x as usize * 16 + z as usize]);
                }
            }
        }
    }
}
