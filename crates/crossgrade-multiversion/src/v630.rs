//! Protocol 630, game version 1.20.50. The oldest version in the chain.

use crossgrade_protocol_core as latest;
use crossgrade_protocol_core::{
    ids, CodecResult, Direction, LatestPacket, Pool, VehicleLayout,
};
use tracing::debug;

use crate::protocol::{ConnContext, Version};
use crate::v649::{self, V649};
use crate::v686;

crate::packet::legacy_packets! {
    PlayerAuthInput(v686::PlayerAuthInput) = ids::PLAYER_AUTH_INPUT => |pk, io| {
        pk.marshal_with(io, VehicleLayout::Absent, |data, io| data.marshal_with(io, false))
    },
    LevelChunk(latest::LevelChunk) = ids::LEVEL_CHUNK => |pk, io| {
        io.chunk_pos(&mut pk.position)?;
        pk.marshal_tail(io)
    },
    PlayerList(latest::PlayerList) = ids::PLAYER_LIST => |pk, io| pk.marshal_with(io, false),
}

impl From<Packet> for crate::Packet {
    fn from(pk: Packet) -> Self {
        crate::Packet::V630(pk)
    }
}

fn new<T: Default + Into<Packet>>() -> crate::Packet {
    crate::Packet::V630(T::default().into())
}

pub struct V630;

impl Version for V630 {
    const ID: i32 = 630;
    const NAME: &'static str = "1.20.50";

    fn pool(direction: Direction) -> Pool<crate::Packet> {
        let pool = V649::pool(direction).without(ids::SET_HUD);
        match direction {
            Direction::Serverbound => {
                pool.with(ids::PLAYER_AUTH_INPUT, new::<v686::PlayerAuthInput>)
            }
            Direction::Clientbound => pool
                .with(ids::LEVEL_CHUNK, new::<latest::LevelChunk>)
                .with(ids::PLAYER_LIST, new::<latest::PlayerList>),
        }
    }

    fn upgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        let pks = pks.into_iter().map(upgrade).collect();
        V649::upgrade(pks, ctx)
    }

    fn downgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        let pks = V649::downgrade(pks, ctx)?;
        Ok(pks
            .into_iter()
            .filter_map(|pk| downgrade(pk, ctx))
            .collect())
    }
}

fn upgrade(pk: crate::Packet) -> crate::Packet {
    match pk {
        crate::Packet::V630(Packet::PlayerAuthInput(mut pk)) => {
            pk.client_predicted_vehicle = 0;
            crate::Packet::V649(v649::Packet::PlayerAuthInput(pk))
        }
        other => other,
    }
}

fn downgrade(pk: crate::Packet, ctx: &ConnContext) -> Option<crate::Packet> {
    let legacy = match pk {
        crate::Packet::Latest(LatestPacket::LevelChunk(pk)) => Packet::LevelChunk(pk),
        crate::Packet::Latest(LatestPacket::PlayerList(pk)) => Packet::PlayerList(pk),
        crate::Packet::Latest(LatestPacket::SetHud(_)) => {
            debug!("conn {}: dropping SetHud for {}", ctx.id, V630::ID);
            return None;
        }
        other => return Some(other),
    };
    Some(crate::Packet::V630(legacy))
}
