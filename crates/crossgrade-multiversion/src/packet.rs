use crossgrade_protocol_core::{CodecResult, Io, LatestPacket, Marshal};

use crate::{v630, v649, v662, v671, v686};

/// Declares a version's packet enum: one variant per packet whose layout
/// differs from the next newer version, each with its packet ID and the
/// expression that codes it.
macro_rules! legacy_packets {
    ($($variant:ident($ty:ty) = $id:path => |$pk:ident, $io:ident| $marshal:expr,)*) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum Packet {
            $($variant($ty),)*
        }

        impl Packet {
            pub fn id(&self) -> u32 {
                match self {
                    $(Packet::$variant(_) => $id,)*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(Packet::$variant(_) => stringify!($variant),)*
                }
            }
        }

        impl crossgrade_protocol_core::Marshal for Packet {
            fn marshal(
                &mut self,
                io: &mut dyn crossgrade_protocol_core::Io,
            ) -> crossgrade_protocol_core::CodecResult<()> {
                match self {
                    $(Packet::$variant($pk) => {
                        let $io = io;
                        $marshal
                    })*
                }
            }
        }

        $(
            impl From<$ty> for Packet {
                fn from(pk: $ty) -> Self {
                    Packet::$variant(pk)
                }
            }
        )*
    };
}

pub(crate) use legacy_packets;

/// A packet in the layout of one protocol version.
///
/// Packets whose layout never changed across the supported versions always
/// travel as `Latest`. The other variants hold the layouts older versions
/// replaced; a version only ever sees its own layouts and the ones it inherits.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Latest(LatestPacket),
    V686(v686::Packet),
    V671(v671::Packet),
    V662(v662::Packet),
    V649(v649::Packet),
    V630(v630::Packet),
}

impl Packet {
    pub fn id(&self) -> u32 {
        match self {
            Packet::Latest(pk) => pk.id(),
            Packet::V686(pk) => pk.id(),
            Packet::V671(pk) => pk.id(),
            Packet::V662(pk) => pk.id(),
            Packet::V649(pk) => pk.id(),
            Packet::V630(pk) => pk.id(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Packet::Latest(pk) => pk.name(),
            Packet::V686(pk) => pk.name(),
            Packet::V671(pk) => pk.name(),
            Packet::V662(pk) => pk.name(),
            Packet::V649(pk) => pk.name(),
            Packet::V630(pk) => pk.name(),
        }
    }

    /// The protocol whose layout this packet is in, or `None` for the latest layout.
    pub fn layout(&self) -> Option<i32> {
        match self {
            Packet::Latest(_) => None,
            Packet::V686(_) => Some(686),
            Packet::V671(_) => Some(671),
            Packet::V662(_) => Some(662),
            Packet::V649(_) => Some(649),
            Packet::V630(_) => Some(630),
        }
    }

    pub fn as_latest(&self) -> Option<&LatestPacket> {
        match self {
            Packet::Latest(pk) => Some(pk),
            _ => None,
        }
    }

    pub fn into_latest(self) -> Option<LatestPacket> {
        match self {
            Packet::Latest(pk) => Some(pk),
            _ => None,
        }
    }
}

impl Marshal for Packet {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        match self {
            Packet::Latest(pk) => pk.marshal(io),
            Packet::V686(pk) => pk.marshal(io),
            Packet::V671(pk) => pk.marshal(io),
            Packet::V662(pk) => pk.marshal(io),
            Packet::V649(pk) => pk.marshal(io),
            Packet::V630(pk) => pk.marshal(io),
        }
    }
}

impl From<LatestPacket> for Packet {
    fn from(pk: LatestPacket) -> Self {
        Packet::Latest(pk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossgrade_protocol_core::{ids, UpdateBlock};

    #[test]
    fn test_latest_packet_metadata() {
        let pk: Packet = LatestPacket::UpdateBlock(UpdateBlock::default()).into();
        assert_eq!(pk.id(), ids::UPDATE_BLOCK);
        assert_eq!(pk.name(), "UpdateBlock");
        assert_eq!(pk.layout(), None);
        assert!(pk.as_latest().is_some());
    }

    #[test]
    fn test_legacy_packet_metadata() {
        let pk = Packet::V630(v630::Packet::PlayerList(Default::default()));
        assert_eq!(pk.layout(), Some(630));
        assert!(pk.into_latest().is_none());
    }
}
