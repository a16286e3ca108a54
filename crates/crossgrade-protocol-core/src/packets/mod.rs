//! The latest (712) packet catalogue.
//!
//! Only packets whose layout changed in a supported older version, or that
//! carry block and item identifiers, are modelled. Every other packet travels as
//! `LatestPacket::Unknown` with its raw payload.

pub mod entity;
pub mod game;
pub mod ids;
pub mod interface;
pub mod inventory;
pub mod player;
pub mod world;

use bytes::BytesMut;

use crate::codec::{CodecError, CodecResult, Io, Marshal, Reader, Writer};
use crate::direction::Direction;
use crate::pool::Pool;

pub use entity::*;
pub use game::*;
pub use interface::*;
pub use inventory::*;
pub use player::*;
pub use world::*;

macro_rules! latest_packets {
    ($($variant:ident = $id:path,)*) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum LatestPacket {
            $($variant($variant),)*
            /// A packet without a model, kept as its raw payload.
            Unknown { id: u32, payload: Vec<u8> },
        }

        impl LatestPacket {
            pub fn id(&self) -> u32 {
                match self {
                    $(LatestPacket::$variant(_) => $id,)*
                    LatestPacket::Unknown { id, .. } => *id,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(LatestPacket::$variant(_) => stringify!($variant),)*
                    LatestPacket::Unknown { .. } => "Unknown",
                }
            }
        }

        impl Marshal for LatestPacket {
            fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
                match self {
                    $(LatestPacket::$variant(pk) => pk.marshal(io),)*
                    LatestPacket::Unknown { payload, .. } => io.bytes(payload),
                }
            }
        }

        $(
            impl From<$variant> for LatestPacket {
                fn from(pk: $variant) -> Self {
                    LatestPacket::$variant(pk)
                }
            }
        )*
    };
}

latest_packets! {
    Disconnect = ids::DISCONNECT,
    ResourcePacksInfo = ids::RESOURCE_PACKS_INFO,
    ResourcePackStack = ids::RESOURCE_PACK_STACK,
    Text = ids::TEXT,
    StartGame = ids::START_GAME,
    AddPlayer = ids::ADD_PLAYER,
    AddActor = ids::ADD_ACTOR,
    AddItemActor = ids::ADD_ITEM_ACTOR,
    UpdateBlock = ids::UPDATE_BLOCK,
    LevelEvent = ids::LEVEL_EVENT,
    MobEffect = ids::MOB_EFFECT,
    InventoryTransaction = ids::INVENTORY_TRANSACTION,
    MobEquipment = ids::MOB_EQUIPMENT,
    MobArmourEquipment = ids::MOB_ARMOUR_EQUIPMENT,
    SetActorData = ids::SET_ACTOR_DATA,
    SetActorMotion = ids::SET_ACTOR_MOTION,
    SetActorLink = ids::SET_ACTOR_LINK,
    ContainerClose = ids::CONTAINER_CLOSE,
    InventoryContent = ids::INVENTORY_CONTENT,
    InventorySlot = ids::INVENTORY_SLOT,
    CraftingData = ids::CRAFTING_DATA,
    LevelChunk = ids::LEVEL_CHUNK,
    ChangeDimension = ids::CHANGE_DIMENSION,
    PlayerList = ids::PLAYER_LIST,
    AvailableCommands = ids::AVAILABLE_COMMANDS,
    StopSound = ids::STOP_SOUND,
    SetTitle = ids::SET_TITLE,
    UpdateBlockSynced = ids::UPDATE_BLOCK_SYNCED,
    LevelSoundEvent = ids::LEVEL_SOUND_EVENT,
    LecternUpdate = ids::LECTERN_UPDATE,
    ClientCacheMissResponse = ids::CLIENT_CACHE_MISS_RESPONSE,
    PlayerAuthInput = ids::PLAYER_AUTH_INPUT,
    CreativeContent = ids::CREATIVE_CONTENT,
    ItemStackRequest = ids::ITEM_STACK_REQUEST,
    ItemStackResponse = ids::ITEM_STACK_RESPONSE,
    UpdatePlayerGameType = ids::UPDATE_PLAYER_GAME_TYPE,
    CorrectPlayerMovePrediction = ids::CORRECT_PLAYER_MOVE_PREDICTION,
    UpdateSubChunkBlocks = ids::UPDATE_SUB_CHUNK_BLOCKS,
    SubChunk = ids::SUB_CHUNK,
    CodeBuilderSource = ids::CODE_BUILDER_SOURCE,
    CameraInstruction = ids::CAMERA_INSTRUCTION,
    SetHud = ids::SET_HUD,
    ClientBoundCloseForm = ids::CLIENT_BOUND_CLOSE_FORM,
    ServerBoundLoadingScreen = ids::SERVER_BOUND_LOADING_SCREEN,
    JigsawStructureData = ids::JIGSAW_STRUCTURE_DATA,
    CurrentStructureFeature = ids::CURRENT_STRUCTURE_FEATURE,
    ServerBoundDiagnostics = ids::SERVER_BOUND_DIAGNOSTICS,
}

fn new<T: Default + Into<LatestPacket>>() -> LatestPacket {
    T::default().into()
}

/// The latest pool for packets travelling in `direction`.
pub fn latest_pool(direction: Direction) -> Pool<LatestPacket> {
    match direction {
        Direction::Serverbound => Pool::new()
            .with(ids::DISCONNECT, new::<Disconnect>)
            .with(ids::TEXT, new::<Text>)
            .with(ids::INVENTORY_TRANSACTION, new::<InventoryTransaction>)
            .with(ids::MOB_EQUIPMENT, new::<MobEquipment>)
            .with(ids::MOB_ARMOUR_EQUIPMENT, new::<MobArmourEquipment>)
            .with(ids::CONTAINER_CLOSE, new::<ContainerClose>)
            .with(ids::LEVEL_SOUND_EVENT, new::<LevelSoundEvent>)
            .with(ids::LECTERN_UPDATE, new::<LecternUpdate>)
            .with(ids::PLAYER_AUTH_INPUT, new::<PlayerAuthInput>)
            .with(ids::ITEM_STACK_REQUEST, new::<ItemStackRequest>)
            .with(ids::CODE_BUILDER_SOURCE, new::<CodeBuilderSource>)
            .with(ids::SERVER_BOUND_LOADING_SCREEN, new::<ServerBoundLoadingScreen>)
            .with(ids::SERVER_BOUND_DIAGNOSTICS, new::<ServerBoundDiagnostics>),
        Direction::Clientbound => Pool::new()
            .with(ids::DISCONNECT, new::<Disconnect>)
            .with(ids::RESOURCE_PACKS_INFO, new::<ResourcePacksInfo>)
            .with(ids::RESOURCE_PACK_STACK, new::<ResourcePackStack>)
            .with(ids::TEXT, new::<Text>)
            .with(ids::START_GAME, new::<StartGame>)
            .with(ids::ADD_PLAYER, new::<AddPlayer>)
            .with(ids::ADD_ACTOR, new::<AddActor>)
            .with(ids::ADD_ITEM_ACTOR, new::<AddItemActor>)
            .with(ids::UPDATE_BLOCK, new::<UpdateBlock>)
            .with(ids::LEVEL_EVENT, new::<LevelEvent>)
            .with(ids::MOB_EFFECT, new::<MobEffect>)
            .with(ids::MOB_EQUIPMENT, new::<MobEquipment>)
            .with(ids::MOB_ARMOUR_EQUIPMENT, new::<MobArmourEquipment>)
            .with(ids::SET_ACTOR_DATA, new::<SetActorData>)
            .with(ids::SET_ACTOR_MOTION, new::<SetActorMotion>)
            .with(ids::SET_ACTOR_LINK, new::<SetActorLink>)
            .with(ids::CONTAINER_CLOSE, new::<ContainerClose>)
            .with(ids::INVENTORY_CONTENT, new::<InventoryContent>)
            .with(ids::INVENTORY_SLOT, new::<InventorySlot>)
            .with(ids::CRAFTING_DATA, new::<CraftingData>)
            .with(ids::LEVEL_CHUNK, new::<LevelChunk>)
            .with(ids::CHANGE_DIMENSION, new::<ChangeDimension>)
            .with(ids::PLAYER_LIST, new::<PlayerList>)
            .with(ids::AVAILABLE_COMMANDS, new::<AvailableCommands>)
            .with(ids::STOP_SOUND, new::<StopSound>)
            .with(ids::SET_TITLE, new::<SetTitle>)
            .with(ids::UPDATE_BLOCK_SYNCED, new::<UpdateBlockSynced>)
            .with(ids::LEVEL_SOUND_EVENT, new::<LevelSoundEvent>)
            .with(ids::CLIENT_CACHE_MISS_RESPONSE, new::<ClientCacheMissResponse>)
            .with(ids::CREATIVE_CONTENT, new::<CreativeContent>)
            .with(ids::ITEM_STACK_RESPONSE, new::<ItemStackResponse>)
            .with(ids::UPDATE_PLAYER_GAME_TYPE, new::<UpdatePlayerGameType>)
            .with(ids::CORRECT_PLAYER_MOVE_PREDICTION, new::<CorrectPlayerMovePrediction>)
            .with(ids::UPDATE_SUB_CHUNK_BLOCKS, new::<UpdateSubChunkBlocks>)
            .with(ids::SUB_CHUNK, new::<SubChunk>)
            .with(ids::CAMERA_INSTRUCTION, new::<CameraInstruction>)
            .with(ids::SET_HUD, new::<SetHud>)
            .with(ids::CLIENT_BOUND_CLOSE_FORM, new::<ClientBoundCloseForm>)
            .with(ids::JIGSAW_STRUCTURE_DATA, new::<JigsawStructureData>)
            .with(ids::CURRENT_STRUCTURE_FEATURE, new::<CurrentStructureFeature>),
    }
}

/// Decodes `payload` into `pk`, requiring every byte to be consumed.
pub fn read_body<P: Marshal>(
    pk: &mut P,
    id: u32,
    payload: &[u8],
    enable_limits: bool,
) -> CodecResult<()> {
    let mut reader = Reader::new(payload).with_limits(enable_limits);
    pk.marshal(&mut reader)?;
    match reader.remaining() {
        0 => Ok(()),
        left => Err(CodecError::TrailingBytes(left, id)),
    }
}

/// Encodes the body of `pk`, without the packet ID.
pub fn write_body<P: Marshal>(pk: &mut P) -> CodecResult<BytesMut> {
    let mut buf = BytesMut::new();
    pk.marshal(&mut Writer::new(&mut buf))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_entries_match_packet_ids() {
        for direction in [Direction::Serverbound, Direction::Clientbound] {
            let pool = latest_pool(direction);
            for id in pool.ids() {
                let pk = pool.create(id).unwrap();
                assert_eq!(pk.id(), id, "{} registered under {}", pk.name(), id);
            }
        }
    }

    #[test]
    fn test_removed_packets_only_in_expected_pools() {
        let client = latest_pool(Direction::Serverbound);
        let server = latest_pool(Direction::Clientbound);
        assert!(client.contains(ids::SERVER_BOUND_DIAGNOSTICS));
        assert!(!server.contains(ids::SERVER_BOUND_DIAGNOSTICS));
        assert!(server.contains(ids::SET_HUD));
        assert!(!client.contains(ids::SET_HUD));
    }

    #[test]
    fn test_unknown_packet_keeps_payload() {
        let mut pk = LatestPacket::Unknown {
            id: 200,
            payload: vec![1, 2, 3],
        };
        let buf = write_body(&mut pk).unwrap();
        let mut back = LatestPacket::Unknown {
            id: 200,
            payload: Vec::new(),
        };
        read_body(&mut back, 200, &buf, false).unwrap();
        assert_eq!(back, pk);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut pk = latest_pool(Direction::Clientbound)
            .create(ids::STOP_SOUND)
            .unwrap();
        // empty name, stop_all, stop_music_legacy, then one stray byte
        let err = read_body(&mut pk, ids::STOP_SOUND, &[0, 1, 0, 9], false).unwrap_err();
        assert!(matches!(err, CodecError::TrailingBytes(1, ids::STOP_SOUND)));
    }
}
