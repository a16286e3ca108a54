//! Protocol 685, game version 1.21.0. Shares every layout with 686 but cannot
//! close forms from the server.

use crossgrade_protocol_core::{ids, CodecResult, Direction, LatestPacket, Pool};
use tracing::debug;

use crate::protocol::{ConnContext, Version};
use crate::v686::V686;
use crate::Packet;

pub struct V685;

impl Version for V685 {
    const ID: i32 = 685;
    const NAME: &'static str = "1.21.0";
    const MAPPING: i32 = V686::ID;

    fn pool(direction: Direction) -> Pool<Packet> {
        let pool = V686::pool(direction);
        match direction {
            Direction::Serverbound => pool,
            Direction::Clientbound => pool.without(ids::CLIENT_BOUND_CLOSE_FORM),
        }
    }

    fn upgrade(pks: Vec<Packet>, ctx: &ConnContext) -> CodecResult<Vec<Packet>> {
        V686::upgrade(pks, ctx)
    }

    fn downgrade(pks: Vec<Packet>, ctx: &ConnContext) -> CodecResult<Vec<Packet>> {
        let pks = V686::downgrade(pks, ctx)?;
        Ok(pks
            .into_iter()
            .filter(|pk| match pk {
                Packet::Latest(LatestPacket::ClientBoundCloseForm(_)) => {
                    debug!("conn {}: dropping ClientBoundCloseForm for {}", ctx.id, Self::ID);
                    false
                }
                _ => true,
            })
            .collect())
    }
}
