use std::marker::PhantomData;
use std::sync::Arc;

use bytes::BytesMut;
use crossgrade_mappings::Mapping;
use crossgrade_protocol_core::{
    CodecError, CodecResult, Direction, LatestPacket, Marshal, Pool, Reader, Writer,
};
use tracing::trace;

use crate::translate::{default_downgrade, default_upgrade, Translated, Translator};
use crate::Packet;

/// The connection a conversion runs for. Translation keeps no per-connection
/// state of its own; the context only identifies the connection in logs.
#[derive(Debug, Clone, Default)]
pub struct ConnContext {
    pub id: u64,
}

impl ConnContext {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// Trait for version-specific protocol adapters.
/// Each supported game version implements this trait.
pub trait Protocol: Send + Sync {
    /// The protocol version number this adapter handles.
    fn id(&self) -> i32;

    /// The game version string, e.g. "1.21.2".
    fn version(&self) -> &'static str;

    /// The packets this version sends in `direction`.
    fn packets(&self, direction: Direction) -> &Pool<Packet>;

    /// A reader over one packet body.
    fn new_reader<'a>(&self, payload: &'a [u8], enable_limits: bool) -> Reader<'a> {
        Reader::new(payload).with_limits(enable_limits)
    }

    /// A writer appending to `buf`.
    fn new_writer<'a>(&self, buf: &'a mut BytesMut) -> Writer<'a> {
        Writer::new(buf)
    }

    /// Turn a packet in this version's layout into zero or more latest packets.
    fn convert_to_latest(&self, pk: Packet, ctx: &ConnContext) -> CodecResult<Vec<Packet>>;

    /// Turn a latest packet into zero or more packets in this version's layout.
    fn convert_from_latest(&self, pk: Packet, ctx: &ConnContext) -> CodecResult<Vec<Packet>>;

    /// Decode a packet body sent in `direction`. IDs the pool does not know are
    /// kept as raw payloads.
    fn decode(
        &self,
        direction: Direction,
        id: u32,
        payload: &[u8],
        enable_limits: bool,
    ) -> CodecResult<Packet> {
        let Some(mut pk) = self.packets(direction).create(id) else {
            return Ok(LatestPacket::Unknown {
                id,
                payload: payload.to_vec(),
            }
            .into());
        };
        let mut reader = self.new_reader(payload, enable_limits);
        pk.marshal(&mut reader)?;
        match reader.remaining() {
            0 => Ok(pk),
            left => Err(CodecError::TrailingBytes(left, id)),
        }
    }

    /// Encode a packet body, without the packet ID.
    fn encode(&self, pk: &mut Packet) -> CodecResult<BytesMut> {
        let mut buf = BytesMut::new();
        pk.marshal(&mut self.new_writer(&mut buf))?;
        Ok(buf)
    }
}

/// One legacy version in the chain.
///
/// `upgrade` rewrites this version's layouts into the next newer version's and
/// then hands the packets to that version's `upgrade`. `downgrade` runs the
/// next newer version's `downgrade` first and rewrites what it produced.
pub trait Version: Send + Sync + 'static {
    const ID: i32;
    const NAME: &'static str;
    /// The protocol whose block and item table this version uses.
    const MAPPING: i32 = Self::ID;

    fn pool(direction: Direction) -> Pool<Packet>;

    fn upgrade(pks: Vec<Packet>, ctx: &ConnContext) -> CodecResult<Vec<Packet>>;

    fn downgrade(pks: Vec<Packet>, ctx: &ConnContext) -> CodecResult<Vec<Packet>>;
}

/// The [`Protocol`] of a legacy [`Version`]: the default identifier step
/// followed by the version chain.
pub struct Adapter<V> {
    translator: Translator,
    client: Pool<Packet>,
    server: Pool<Packet>,
    _version: PhantomData<fn() -> V>,
}

impl<V: Version> Adapter<V> {
    pub fn new(legacy: Arc<dyn Mapping>, latest: Arc<dyn Mapping>) -> Self {
        Self {
            translator: Translator::new(legacy, latest),
            client: V::pool(Direction::Serverbound),
            server: V::pool(Direction::Clientbound),
            _version: PhantomData,
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }
}

impl<V: Version> Protocol for Adapter<V> {
    fn id(&self) -> i32 {
        V::ID
    }

    fn version(&self) -> &'static str {
        V::NAME
    }

    fn packets(&self, direction: Direction) -> &Pool<Packet> {
        match direction {
            Direction::Serverbound => &self.client,
            Direction::Clientbound => &self.server,
        }
    }

    fn convert_to_latest(&self, pk: Packet, ctx: &ConnContext) -> CodecResult<Vec<Packet>> {
        let pk = match default_upgrade(pk, &self.translator) {
            Translated::Handled(pk) => {
                trace!("conn {}: remapped {} from {}", ctx.id, pk.name(), V::ID);
                pk
            }
            Translated::Unhandled(pk) => pk,
        };
        V::upgrade(vec![pk], ctx)
    }

    fn convert_from_latest(&self, pk: Packet, ctx: &ConnContext) -> CodecResult<Vec<Packet>> {
        let pk = match default_downgrade(pk, &self.translator) {
            Translated::Handled(pk) => {
                trace!("conn {}: remapped {} for {}", ctx.id, pk.name(), V::ID);
                pk
            }
            Translated::Unhandled(pk) => pk,
        };
        V::downgrade(vec![pk], ctx)
    }
}
