//! Protocol 649, game version 1.20.60.

use crossgrade_protocol_core as latest;
use crossgrade_protocol_core::{
    ids, AvailableCommands, CodecResult, Direction, Io, LatestPacket, Marshal, PacksInfoLayout,
    Pool, VehicleLayout, COMMAND_ARG_TYPE_BLOCK_POSITION, COMMAND_ARG_TYPE_BLOCK_STATES,
    COMMAND_ARG_TYPE_COMMAND, COMMAND_ARG_TYPE_EQUIPMENT_SLOTS, COMMAND_ARG_TYPE_JSON,
    COMMAND_ARG_TYPE_MESSAGE, COMMAND_ARG_TYPE_POSITION, COMMAND_ARG_TYPE_RAW_TEXT,
    COMMAND_ARG_TYPE_STRING, COMMAND_ARG_VALID,
};
use crossgrade_types::{BlockPos, Vec2, Vec3};

use crate::protocol::{ConnContext, Version};
use crate::v662::V662;
use crate::v686;

/// Resource pack infos without the addon flags.
pub const RESOURCE_PACKS_INFO_LAYOUT: PacksInfoLayout = PacksInfoLayout {
    has_addons: false,
    addon_pack: false,
};

/// Command argument types whose numbers changed after this version, as
/// (latest, legacy) pairs.
pub const COMMAND_ARG_TYPES: [(u32, u32); 9] = [
    (COMMAND_ARG_TYPE_EQUIPMENT_SLOTS, 43),
    (COMMAND_ARG_TYPE_STRING, 44),
    (COMMAND_ARG_TYPE_BLOCK_POSITION, 52),
    (COMMAND_ARG_TYPE_POSITION, 53),
    (COMMAND_ARG_TYPE_MESSAGE, 55),
    (COMMAND_ARG_TYPE_RAW_TEXT, 58),
    (COMMAND_ARG_TYPE_JSON, 62),
    (COMMAND_ARG_TYPE_BLOCK_STATES, 71),
    (COMMAND_ARG_TYPE_COMMAND, 74),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LecternUpdate {
    pub page: u8,
    pub page_count: u8,
    pub position: BlockPos,
    pub drop_book: bool,
}

impl Marshal for LecternUpdate {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.page)?;
        io.u8(&mut self.page_count)?;
        io.block_pos(&mut self.position)?;
        io.bool(&mut self.drop_book)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobEffect {
    pub entity_runtime_id: u64,
    pub operation: u8,
    pub effect_type: i32,
    pub amplifier: i32,
    pub particles: bool,
    pub duration: i32,
}

impl Marshal for MobEffect {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.entity_runtime_id)?;
        io.u8(&mut self.operation)?;
        io.varint32(&mut self.effect_type)?;
        io.varint32(&mut self.amplifier)?;
        io.bool(&mut self.particles)?;
        io.varint32(&mut self.duration)
    }
}

impl From<latest::MobEffect> for MobEffect {
    fn from(pk: latest::MobEffect) -> Self {
        MobEffect {
            entity_runtime_id: pk.entity_runtime_id,
            operation: pk.operation,
            effect_type: pk.effect_type,
            amplifier: pk.amplifier,
            particles: pk.particles,
            duration: pk.duration,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetActorMotion {
    pub entity_runtime_id: u64,
    pub velocity: Vec3,
}

impl Marshal for SetActorMotion {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.entity_runtime_id)?;
        io.vec3(&mut self.velocity)
    }
}

crate::packet::legacy_packets! {
    PlayerAuthInput(v686::PlayerAuthInput) = ids::PLAYER_AUTH_INPUT => |pk, io| {
        pk.marshal_with(io, VehicleLayout::IdOnly, |data, io| data.marshal_with(io, false))
    },
    LecternUpdate(LecternUpdate) = ids::LECTERN_UPDATE => |pk, io| pk.marshal(io),
    MobEffect(MobEffect) = ids::MOB_EFFECT => |pk, io| pk.marshal(io),
    ResourcePacksInfo(latest::ResourcePacksInfo) = ids::RESOURCE_PACKS_INFO => |pk, io| {
        pk.marshal_with(io, RESOURCE_PACKS_INFO_LAYOUT)
    },
    SetActorMotion(SetActorMotion) = ids::SET_ACTOR_MOTION => |pk, io| pk.marshal(io),
}

impl From<Packet> for crate::Packet {
    fn from(pk: Packet) -> Self {
        crate::Packet::V649(pk)
    }
}

fn new<T: Default + Into<Packet>>() -> crate::Packet {
    crate::Packet::V649(T::default().into())
}

pub struct V649;

impl Version for V649 {
    const ID: i32 = 649;
    const NAME: &'static str = "1.20.60";

    fn pool(direction: Direction) -> Pool<crate::Packet> {
        let pool = V662::pool(direction);
        match direction {
            Direction::Serverbound => pool
                .with(ids::PLAYER_AUTH_INPUT, new::<v686::PlayerAuthInput>)
                .with(ids::LECTERN_UPDATE, new::<LecternUpdate>),
            Direction::Clientbound => pool
                .with(ids::MOB_EFFECT, new::<MobEffect>)
                .with(ids::RESOURCE_PACKS_INFO, new::<latest::ResourcePacksInfo>)
                .with(ids::SET_ACTOR_MOTION, new::<SetActorMotion>),
        }
    }

    fn upgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        let pks = pks.into_iter().map(upgrade).collect();
        V662::upgrade(pks, ctx)
    }

    fn downgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        let pks = V662::downgrade(pks, ctx)?;
        Ok(pks.into_iter().map(downgrade).collect())
    }
}

fn upgrade(pk: crate::Packet) -> crate::Packet {
    match pk {
        crate::Packet::V649(Packet::PlayerAuthInput(mut pk)) => {
            pk.vehicle_rotation = Vec2::ZERO;
            crate::Packet::V686(v686::Packet::PlayerAuthInput(pk))
        }
        crate::Packet::V649(Packet::LecternUpdate(pk)) => {
            crate::Packet::Latest(LatestPacket::LecternUpdate(latest::LecternUpdate {
                page: pk.page,
                page_count: pk.page_count,
                position: pk.position,
            }))
        }
        other => other,
    }
}

fn downgrade(pk: crate::Packet) -> crate::Packet {
    let legacy = match pk {
        crate::Packet::Latest(LatestPacket::AvailableCommands(mut pk)) => {
            renumber_commands(&mut pk);
            return crate::Packet::Latest(LatestPacket::AvailableCommands(pk));
        }
        crate::Packet::Latest(LatestPacket::SetActorMotion(pk)) => {
            Packet::SetActorMotion(SetActorMotion {
                entity_runtime_id: pk.entity_runtime_id,
                velocity: pk.velocity,
            })
        }
        crate::Packet::V686(v686::Packet::ResourcePacksInfo(pk)) => Packet::ResourcePacksInfo(pk),
        crate::Packet::Latest(LatestPacket::MobEffect(pk)) => Packet::MobEffect(pk.into()),
        other => return other,
    };
    crate::Packet::V649(legacy)
}

/// Rewrites basic argument types to this version's numbers. Enum, soft enum
/// and suffixed parameters index other tables and keep their type.
pub fn renumber_commands(pk: &mut AvailableCommands) {
    let params = pk
        .commands
        .iter_mut()
        .flat_map(|c| c.overloads.iter_mut())
        .flat_map(|o| o.parameters.iter_mut());
    for param in params {
        if param.is_indexed() {
            continue;
        }
        let arg_type = param.parameter_type | COMMAND_ARG_VALID;
        if let Some((_, legacy)) = COMMAND_ARG_TYPES
            .iter()
            .find(|(latest, _)| COMMAND_ARG_VALID | latest == arg_type)
        {
            param.parameter_type = COMMAND_ARG_VALID | legacy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use crossgrade_protocol_core::{
        Command, CommandOverload, CommandParameter, Reader, Writer, COMMAND_ARG_ENUM,
        COMMAND_ARG_TYPE_INT, INPUT_FLAG_CLIENT_PREDICTED_VEHICLE,
    };

    fn ctx() -> ConnContext {
        ConnContext::default()
    }

    fn param(parameter_type: u32) -> CommandParameter {
        CommandParameter {
            name: "p".into(),
            parameter_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_commands_are_renumbered() {
        let pk = AvailableCommands {
            commands: vec![Command {
                name: "say".into(),
                overloads: vec![CommandOverload {
                    chaining: false,
                    parameters: vec![
                        param(COMMAND_ARG_VALID | COMMAND_ARG_TYPE_MESSAGE),
                        param(COMMAND_ARG_VALID | COMMAND_ARG_TYPE_POSITION),
                        param(COMMAND_ARG_VALID | COMMAND_ARG_TYPE_INT),
                        param(COMMAND_ARG_VALID | COMMAND_ARG_ENUM | 56),
                    ],
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = V649::downgrade(vec![LatestPacket::AvailableCommands(pk).into()], &ctx()).unwrap();
        let [crate::Packet::Latest(LatestPacket::AvailableCommands(pk))] = out.as_slice() else {
            panic!("unexpected {:?}", out);
        };
        let types: Vec<u32> = pk.commands[0].overloads[0]
            .parameters
            .iter()
            .map(|p| p.parameter_type)
            .collect();
        assert_eq!(
            types,
            vec![
                COMMAND_ARG_VALID | 55,
                COMMAND_ARG_VALID | 53,
                COMMAND_ARG_VALID | COMMAND_ARG_TYPE_INT,
                COMMAND_ARG_VALID | COMMAND_ARG_ENUM | 56,
            ]
        );
    }

    #[test]
    fn test_auth_input_reads_vehicle_id_only() {
        let mut pk = v686::PlayerAuthInput {
            input_data: INPUT_FLAG_CLIENT_PREDICTED_VEHICLE,
            client_predicted_vehicle: 12,
            vehicle_rotation: Vec2::new(3.0, 4.0),
            analogue_move_vector: Vec2::new(0.5, -0.3),
            ..Default::default()
        };
        let mut buf = BytesMut::new();
        let mut legacy = crate::Packet::V649(Packet::PlayerAuthInput(pk.clone()));
        legacy.marshal(&mut Writer::new(&mut buf)).unwrap();

        let mut back = V649::pool(Direction::Serverbound)
            .create(ids::PLAYER_AUTH_INPUT)
            .unwrap();
        let mut reader = Reader::new(&buf);
        back.marshal(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);

        pk.vehicle_rotation = Vec2::ZERO;
        assert_eq!(back, crate::Packet::V649(Packet::PlayerAuthInput(pk.clone())));

        let [up] = <[crate::Packet; 1]>::try_from(V649::upgrade(vec![back], &ctx()).unwrap())
            .unwrap();
        let crate::Packet::Latest(LatestPacket::PlayerAuthInput(up)) = up else {
            panic!("unexpected {:?}", up);
        };
        assert_eq!(up.client_predicted_vehicle, 12);
        assert_eq!(up.vehicle_rotation, Vec2::ZERO);
        assert_eq!(up.analogue_move_vector, Vec2::new(0.5, -0.3));
    }

    #[test]
    fn test_lectern_update_drops_book_flag() {
        let pk = LecternUpdate {
            page: 2,
            page_count: 8,
            position: BlockPos::new(1, -5, 3),
            drop_book: true,
        };
        let out = V649::upgrade(vec![Packet::LecternUpdate(pk).into()], &ctx()).unwrap();
        assert_eq!(
            out,
            vec![crate::Packet::Latest(LatestPacket::LecternUpdate(latest::LecternUpdate {
                page: 2,
                page_count: 8,
                position: BlockPos::new(1, -5, 3),
            }))]
        );
    }

    #[test]
    fn test_server_packets_lose_tick() {
        let pks = vec![
            LatestPacket::MobEffect(latest::MobEffect {
                effect_type: 3,
                duration: 200,
                tick: 9,
                ..Default::default()
            })
            .into(),
            LatestPacket::SetActorMotion(latest::SetActorMotion {
                entity_runtime_id: 5,
                tick: 9,
                ..Default::default()
            })
            .into(),
            LatestPacket::ResourcePacksInfo(Default::default()).into(),
        ];
        let out = V649::downgrade(pks, &ctx()).unwrap();
        assert!(out.iter().all(|pk| pk.layout() == Some(649)));
        assert!(matches!(
            &out[0],
            crate::Packet::V649(Packet::MobEffect(MobEffect {
                effect_type: 3,
                duration: 200,
                ..
            }))
        ));
    }
}
