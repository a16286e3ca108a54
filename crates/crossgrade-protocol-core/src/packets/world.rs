use crate::codec::{func_slice, func_slice_u32, optional, slice, CodecResult, Io, Marshal};
use crossgrade_nbt::NbtValue;
use crossgrade_types::{BlockPos, ChunkPos, SubChunkPos, Vec3};

/// Sub-chunk count sentinel: the client requests every sub-chunk separately.
pub const SUB_CHUNK_REQUEST_MODE_LIMITLESS: u32 = u32::MAX;
/// Sub-chunk count sentinel: sub-chunks are requested up to `highest_sub_chunk`.
pub const SUB_CHUNK_REQUEST_MODE_LIMITED: u32 = u32::MAX - 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelChunk {
    pub position: ChunkPos,
    pub dimension: i32,
    pub sub_chunk_count: u32,
    /// Only sent in limited request mode.
    pub highest_sub_chunk: u16,
    pub cache_enabled: bool,
    pub blob_hashes: Vec<u64>,
    pub raw_payload: Vec<u8>,
}

impl LevelChunk {
    /// Codes everything after the position and dimension. Layouts that lack the
    /// dimension share this tail.
    pub fn marshal_tail(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.sub_chunk_count)?;
        if self.sub_chunk_count == SUB_CHUNK_REQUEST_MODE_LIMITED {
            io.u16(&mut self.highest_sub_chunk)?;
        }
        io.bool(&mut self.cache_enabled)?;
        if self.cache_enabled {
            func_slice(io, &mut self.blob_hashes, |io, h| io.u64(h))?;
        }
        io.byte_slice(&mut self.raw_payload)
    }

    /// Whether the payload carries terrain, rather than leaving sub-chunks to be requested.
    pub fn carries_terrain(&self) -> bool {
        self.sub_chunk_count != SUB_CHUNK_REQUEST_MODE_LIMITLESS
            && self.sub_chunk_count != SUB_CHUNK_REQUEST_MODE_LIMITED
    }
}

impl Marshal for LevelChunk {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.chunk_pos(&mut self.position)?;
        io.varint32(&mut self.dimension)?;
        self.marshal_tail(io)
    }
}

pub const SUB_CHUNK_RESULT_SUCCESS: u8 = 1;
pub const SUB_CHUNK_RESULT_CHUNK_NOT_FOUND: u8 = 2;
pub const SUB_CHUNK_RESULT_INVALID_DIMENSION: u8 = 3;
pub const SUB_CHUNK_RESULT_PLAYER_NOT_FOUND: u8 = 4;
pub const SUB_CHUNK_RESULT_INDEX_OUT_OF_BOUNDS: u8 = 5;
pub const SUB_CHUNK_RESULT_SUCCESS_ALL_AIR: u8 = 6;

pub const HEIGHT_MAP_DATA_NONE: u8 = 0;
pub const HEIGHT_MAP_DATA_HAS_DATA: u8 = 1;
pub const HEIGHT_MAP_DATA_TOO_HIGH: u8 = 2;
pub const HEIGHT_MAP_DATA_TOO_LOW: u8 = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubChunkEntry {
    pub offset: [i8; 3],
    pub result: u8,
    pub raw_payload: Vec<u8>,
    pub height_map_type: u8,
    /// 256 values when `height_map_type` is `HEIGHT_MAP_DATA_HAS_DATA`.
    pub height_map_data: Vec<i8>,
    /// Only sent when the blob cache is enabled.
    pub blob_hash: u64,
}

impl SubChunkEntry {
    fn marshal_with(&mut self, io: &mut dyn Io, cache_enabled: bool) -> CodecResult<()> {
        for o in self.offset.iter_mut() {
            io.i8(o)?;
        }
        io.u8(&mut self.result)?;
        if self.result != SUB_CHUNK_RESULT_SUCCESS_ALL_AIR || !cache_enabled {
            io.byte_slice(&mut self.raw_payload)?;
        }
        io.u8(&mut self.height_map_type)?;
        if self.height_map_type == HEIGHT_MAP_DATA_HAS_DATA {
            if io.reads() {
                self.height_map_data = vec![0; 256];
            } else if self.height_map_data.len() != 256 {
                return Err(io.invalid_value(
                    "height map data",
                    format!("expected 256 values, got {}", self.height_map_data.len()),
                ));
            }
            for h in self.height_map_data.iter_mut() {
                io.i8(h)?;
            }
        }
        if cache_enabled {
            io.u64(&mut self.blob_hash)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubChunk {
    pub cache_enabled: bool,
    pub dimension: i32,
    pub position: SubChunkPos,
    pub entries: Vec<SubChunkEntry>,
}

impl Marshal for SubChunk {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.bool(&mut self.cache_enabled)?;
        io.varint32(&mut self.dimension)?;
        io.sub_chunk_pos(&mut self.position)?;
        let cache_enabled = self.cache_enabled;
        func_slice_u32(io, &mut self.entries, |io, e| {
            e.marshal_with(io, cache_enabled)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheBlob {
    pub hash: u64,
    pub payload: Vec<u8>,
}

impl Marshal for CacheBlob {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u64(&mut self.hash)?;
        io.byte_slice(&mut self.payload)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientCacheMissResponse {
    pub blobs: Vec<CacheBlob>,
}

impl Marshal for ClientCacheMissResponse {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        slice(io, &mut self.blobs)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBlock {
    pub position: BlockPos,
    pub new_block_runtime_id: u32,
    pub flags: u32,
    pub layer: u32,
}

impl Marshal for UpdateBlock {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.ublock_pos(&mut self.position)?;
        io.varuint32(&mut self.new_block_runtime_id)?;
        io.varuint32(&mut self.flags)?;
        io.varuint32(&mut self.layer)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBlockSynced {
    pub position: BlockPos,
    pub new_block_runtime_id: u32,
    pub flags: u32,
    pub layer: u32,
    pub entity_unique_id: u64,
    pub transition_type: u64,
}

impl Marshal for UpdateBlockSynced {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.ublock_pos(&mut self.position)?;
        io.varuint32(&mut self.new_block_runtime_id)?;
        io.varuint32(&mut self.flags)?;
        io.varuint32(&mut self.layer)?;
        io.varuint64(&mut self.entity_unique_id)?;
        io.varuint64(&mut self.transition_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockChangeEntry {
    pub block_pos: BlockPos,
    pub block_runtime_id: u32,
    pub flags: u32,
    pub synced_update_entity_unique_id: u64,
    pub synced_update_type: u32,
}

impl Marshal for BlockChangeEntry {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.ublock_pos(&mut self.block_pos)?;
        io.varuint32(&mut self.block_runtime_id)?;
        io.varuint32(&mut self.flags)?;
        io.varuint64(&mut self.synced_update_entity_unique_id)?;
        io.varuint32(&mut self.synced_update_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSubChunkBlocks {
    pub position: SubChunkPos,
    pub blocks: Vec<BlockChangeEntry>,
    /// Changes to the second (liquid) layer.
    pub extra: Vec<BlockChangeEntry>,
}

impl Marshal for UpdateSubChunkBlocks {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.sub_chunk_pos(&mut self.position)?;
        slice(io, &mut self.blocks)?;
        slice(io, &mut self.extra)
    }
}

pub const LEVEL_EVENT_PARTICLES_DESTROY_BLOCK: i32 = 2001;
pub const LEVEL_EVENT_PARTICLES_CRACK_BLOCK: i32 = 2014;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelEvent {
    pub event_type: i32,
    pub position: Vec3,
    pub event_data: i32,
}

impl LevelEvent {
    /// Whether `event_data` holds a block runtime ID.
    pub fn carries_block(&self) -> bool {
        matches!(
            self.event_type,
            LEVEL_EVENT_PARTICLES_DESTROY_BLOCK | LEVEL_EVENT_PARTICLES_CRACK_BLOCK
        )
    }
}

impl Marshal for LevelEvent {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.event_type)?;
        io.vec3(&mut self.position)?;
        io.varint32(&mut self.event_data)
    }
}

pub const SOUND_EVENT_ITEM_USE_ON: u32 = 0;
pub const SOUND_EVENT_HIT: u32 = 1;
pub const SOUND_EVENT_PLACE: u32 = 6;
pub const SOUND_EVENT_LAND: u32 = 35;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSoundEvent {
    pub sound_type: u32,
    pub position: Vec3,
    pub extra_data: i32,
    pub entity_type: String,
    pub baby_mob: bool,
    pub disable_relative_volume: bool,
}

impl LevelSoundEvent {
    /// Whether `extra_data` holds a block runtime ID.
    pub fn carries_block(&self) -> bool {
        matches!(
            self.sound_type,
            SOUND_EVENT_ITEM_USE_ON | SOUND_EVENT_HIT | SOUND_EVENT_PLACE | SOUND_EVENT_LAND
        )
    }
}

impl Marshal for LevelSoundEvent {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.sound_type)?;
        io.vec3(&mut self.position)?;
        io.varint32(&mut self.extra_data)?;
        io.string(&mut self.entity_type)?;
        io.bool(&mut self.baby_mob)?;
        io.bool(&mut self.disable_relative_volume)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeDimension {
    pub dimension: i32,
    pub position: Vec3,
    pub respawn: bool,
    pub loading_screen_id: Option<u32>,
}

impl Marshal for ChangeDimension {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.dimension)?;
        io.vec3(&mut self.position)?;
        io.bool(&mut self.respawn)?;
        optional(io, &mut self.loading_screen_id, |io, id| io.u32(id))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LecternUpdate {
    pub page: u8,
    pub page_count: u8,
    pub position: BlockPos,
}

impl Marshal for LecternUpdate {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.page)?;
        io.u8(&mut self.page_count)?;
        io.block_pos(&mut self.position)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentStructureFeature {
    pub current_feature: String,
}

impl Marshal for CurrentStructureFeature {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.current_feature)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JigsawStructureData {
    pub structure_data: NbtValue,
}

impl Marshal for JigsawStructureData {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.nbt(&mut self.structure_data)
    }
}
