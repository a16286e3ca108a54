//! Protocol 662, game version 1.20.70.
//!
//! Only server packets changed after this version; client packets pass
//! straight on to 671.

use crossgrade_protocol_core as latest;
use crossgrade_protocol_core::{
    ids, CodecResult, Direction, Io, LatestPacket, Marshal, Pool, RecipeLayout,
};
use crossgrade_types::BlockPos;

use crate::protocol::{ConnContext, Version};
use crate::v671::{self, V671};

/// Recipes without unlocking requirements or the shaped symmetry flag.
pub const RECIPE_LAYOUT: RecipeLayout = RecipeLayout {
    unlocking_requirement: false,
    assume_symmetry: false,
};

/// A synced block update whose entity ID is signed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBlockSynced {
    pub position: BlockPos,
    pub new_block_runtime_id: u32,
    pub flags: u32,
    pub layer: u32,
    pub entity_unique_id: i64,
    pub transition_type: u64,
}

impl Marshal for UpdateBlockSynced {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.ublock_pos(&mut self.position)?;
        io.varuint32(&mut self.new_block_runtime_id)?;
        io.varuint32(&mut self.flags)?;
        io.varuint32(&mut self.layer)?;
        io.varint64(&mut self.entity_unique_id)?;
        io.varuint64(&mut self.transition_type)
    }
}

impl From<latest::UpdateBlockSynced> for UpdateBlockSynced {
    fn from(pk: latest::UpdateBlockSynced) -> Self {
        UpdateBlockSynced {
            position: pk.position,
            new_block_runtime_id: pk.new_block_runtime_id,
            flags: pk.flags,
            layer: pk.layer,
            entity_unique_id: pk.entity_unique_id as i64,
            transition_type: pk.transition_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePlayerGameType {
    pub game_type: i32,
    pub player_unique_id: i64,
}

impl Marshal for UpdatePlayerGameType {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.game_type)?;
        io.varint64(&mut self.player_unique_id)
    }
}

crate::packet::legacy_packets! {
    ResourcePackStack(latest::ResourcePackStack) = ids::RESOURCE_PACK_STACK => |pk, io| {
        pk.marshal_with(io, false)
    },
    CraftingData(latest::CraftingData) = ids::CRAFTING_DATA => |pk, io| {
        pk.marshal_with(io, RECIPE_LAYOUT)
    },
    UpdateBlockSynced(UpdateBlockSynced) = ids::UPDATE_BLOCK_SYNCED => |pk, io| pk.marshal(io),
    UpdatePlayerGameType(UpdatePlayerGameType) = ids::UPDATE_PLAYER_GAME_TYPE => |pk, io| {
        pk.marshal(io)
    },
}

impl From<Packet> for crate::Packet {
    fn from(pk: Packet) -> Self {
        crate::Packet::V662(pk)
    }
}

fn new<T: Default + Into<Packet>>() -> crate::Packet {
    crate::Packet::V662(T::default().into())
}

pub struct V662;

impl Version for V662 {
    const ID: i32 = 662;
    const NAME: &'static str = "1.20.70";

    fn pool(direction: Direction) -> Pool<crate::Packet> {
        let pool = V671::pool(direction);
        match direction {
            Direction::Serverbound => pool,
            Direction::Clientbound => pool
                .with(ids::RESOURCE_PACK_STACK, new::<latest::ResourcePackStack>)
                .with(ids::CRAFTING_DATA, new::<latest::CraftingData>)
                .with(ids::UPDATE_BLOCK_SYNCED, new::<UpdateBlockSynced>)
                .with(ids::UPDATE_PLAYER_GAME_TYPE, new::<UpdatePlayerGameType>),
        }
    }

    fn upgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        V671::upgrade(pks, ctx)
    }

    fn downgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        let pks = V671::downgrade(pks, ctx)?;
        Ok(pks.into_iter().map(downgrade).collect())
    }
}

fn downgrade(pk: crate::Packet) -> crate::Packet {
    let legacy = match pk {
        crate::Packet::Latest(LatestPacket::ResourcePackStack(pk)) => Packet::ResourcePackStack(pk),
        crate::Packet::V671(v671::Packet::CraftingData(pk)) => Packet::CraftingData(pk),
        crate::Packet::Latest(LatestPacket::UpdateBlockSynced(pk)) => {
            Packet::UpdateBlockSynced(pk.into())
        }
        crate::Packet::Latest(LatestPacket::UpdatePlayerGameType(pk)) => {
            Packet::UpdatePlayerGameType(UpdatePlayerGameType {
                game_type: pk.game_type,
                player_unique_id: pk.player_unique_id,
            })
        }
        other => return other,
    };
    crate::Packet::V662(legacy)
}
