use crossgrade_protocol_core::{latest_pool, CodecResult, Direction, Pool};

use crate::protocol::{ConnContext, Protocol};
use crate::Packet;

pub const ID: i32 = 712;
pub const NAME: &str = "1.21.20";

/// The version the server speaks. Its conversions are the identity.
#[derive(Debug, Clone)]
pub struct Latest {
    client: Pool<Packet>,
    server: Pool<Packet>,
}

impl Latest {
    pub fn new() -> Self {
        Self {
            client: latest_pool(Direction::Serverbound).map(Packet::Latest),
            server: latest_pool(Direction::Clientbound).map(Packet::Latest),
        }
    }
}

impl Default for Latest {
    fn default() -> Self {
        Self::new()
    }
}

impl Protocol for Latest {
    fn id(&self) -> i32 {
        ID
    }

    fn version(&self) -> &'static str {
        NAME
    }

    fn packets(&self, direction: Direction) -> &Pool<Packet> {
        match direction {
            Direction::Serverbound => &self.client,
            Direction::Clientbound => &self.server,
        }
    }

    fn convert_to_latest(&self, pk: Packet, _ctx: &ConnContext) -> CodecResult<Vec<Packet>> {
        Ok(vec![pk])
    }

    fn convert_from_latest(&self, pk: Packet, _ctx: &ConnContext) -> CodecResult<Vec<Packet>> {
        Ok(vec![pk])
    }
}
