use std::collections::BTreeMap;

use crate::codec::{optional, slice, CodecResult, Io, Marshal};
use crossgrade_nbt::NbtValue;
use crossgrade_types::{BlockPos, ItemInstance, Uuid, Vec2, Vec3};

/// Metadata key whose int value holds a block runtime ID for falling blocks
/// and similar entities.
pub const ENTITY_DATA_KEY_VARIANT: u32 = 2;

pub const ENTITY_DATA_BYTE: u32 = 0;
pub const ENTITY_DATA_SHORT: u32 = 1;
pub const ENTITY_DATA_INT: u32 = 2;
pub const ENTITY_DATA_FLOAT: u32 = 3;
pub const ENTITY_DATA_STRING: u32 = 4;
pub const ENTITY_DATA_COMPOUND: u32 = 5;
pub const ENTITY_DATA_BLOCK_POS: u32 = 6;
pub const ENTITY_DATA_LONG: u32 = 7;
pub const ENTITY_DATA_VEC3: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Byte(u8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    Compound(NbtValue),
    BlockPos(BlockPos),
    Long(i64),
    Vec3(Vec3),
}

impl MetadataValue {
    pub fn type_id(&self) -> u32 {
        match self {
            MetadataValue::Byte(_) => ENTITY_DATA_BYTE,
            MetadataValue::Short(_) => ENTITY_DATA_SHORT,
            MetadataValue::Int(_) => ENTITY_DATA_INT,
            MetadataValue::Float(_) => ENTITY_DATA_FLOAT,
            MetadataValue::String(_) => ENTITY_DATA_STRING,
            MetadataValue::Compound(_) => ENTITY_DATA_COMPOUND,
            MetadataValue::BlockPos(_) => ENTITY_DATA_BLOCK_POS,
            MetadataValue::Long(_) => ENTITY_DATA_LONG,
            MetadataValue::Vec3(_) => ENTITY_DATA_VEC3,
        }
    }

    fn empty(type_id: u32, io: &dyn Io) -> CodecResult<Self> {
        Ok(match type_id {
            ENTITY_DATA_BYTE => MetadataValue::Byte(0),
            ENTITY_DATA_SHORT => MetadataValue::Short(0),
            ENTITY_DATA_INT => MetadataValue::Int(0),
            ENTITY_DATA_FLOAT => MetadataValue::Float(0.0),
            ENTITY_DATA_STRING => MetadataValue::String(String::new()),
            ENTITY_DATA_COMPOUND => MetadataValue::Compound(NbtValue::default()),
            ENTITY_DATA_BLOCK_POS => MetadataValue::BlockPos(BlockPos::default()),
            ENTITY_DATA_LONG => MetadataValue::Long(0),
            ENTITY_DATA_VEC3 => MetadataValue::Vec3(Vec3::ZERO),
            other => return Err(io.unknown_enum_option(other as i64, "entity data type")),
        })
    }

    fn marshal_value(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        match self {
            MetadataValue::Byte(v) => io.u8(v),
            MetadataValue::Short(v) => io.i16(v),
            MetadataValue::Int(v) => io.varint32(v),
            MetadataValue::Float(v) => io.f32(v),
            MetadataValue::String(v) => io.string(v),
            MetadataValue::Compound(v) => io.nbt(v),
            MetadataValue::BlockPos(v) => io.block_pos(v),
            MetadataValue::Long(v) => io.varint64(v),
            MetadataValue::Vec3(v) => io.vec3(v),
        }
    }
}

/// Entity metadata keyed by data key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMetadata(pub BTreeMap<u32, MetadataValue>);

impl Marshal for EntityMetadata {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        let len = io.slice_len(self.0.len())?;
        if io.reads() {
            self.0.clear();
            for _ in 0..len {
                let (mut key, mut type_id) = (0u32, 0u32);
                io.varuint32(&mut key)?;
                io.varuint32(&mut type_id)?;
                let mut value = MetadataValue::empty(type_id, io)?;
                value.marshal_value(io)?;
                self.0.insert(key, value);
            }
            return Ok(());
        }
        for (key, value) in self.0.iter_mut() {
            let mut key = *key;
            let mut type_id = value.type_id();
            io.varuint32(&mut key)?;
            io.varuint32(&mut type_id)?;
            value.marshal_value(io)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerEntityProperty {
    pub index: u32,
    pub value: i32,
}

impl Marshal for IntegerEntityProperty {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.index)?;
        io.varint32(&mut self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatEntityProperty {
    pub index: u32,
    pub value: f32,
}

impl Marshal for FloatEntityProperty {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.index)?;
        io.f32(&mut self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityProperties {
    pub integer_properties: Vec<IntegerEntityProperty>,
    pub float_properties: Vec<FloatEntityProperty>,
}

impl Marshal for EntityProperties {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        slice(io, &mut self.integer_properties)?;
        slice(io, &mut self.float_properties)
    }
}

/// A rider/vehicle relation between two entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityLink {
    pub ridden_entity_unique_id: i64,
    pub rider_entity_unique_id: i64,
    pub link_type: u8,
    pub immediate: bool,
    pub rider_initiated: bool,
    pub vehicle_angular_velocity: f32,
}

impl Marshal for EntityLink {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint64(&mut self.ridden_entity_unique_id)?;
        io.varint64(&mut self.rider_entity_unique_id)?;
        io.u8(&mut self.link_type)?;
        io.bool(&mut self.immediate)?;
        io.bool(&mut self.rider_initiated)?;
        io.f32(&mut self.vehicle_angular_velocity)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeValue {
    pub name: String,
    pub min: f32,
    pub value: f32,
    pub max: f32,
}

impl Marshal for AttributeValue {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.name)?;
        io.f32(&mut self.min)?;
        io.f32(&mut self.value)?;
        io.f32(&mut self.max)
    }
}

/// Spawns a non-player entity, generic over the entity link layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddActor<L = EntityLink> {
    pub entity_unique_id: i64,
    pub entity_runtime_id: u64,
    pub entity_type: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub body_yaw: f32,
    pub attributes: Vec<AttributeValue>,
    pub entity_metadata: EntityMetadata,
    pub entity_properties: EntityProperties,
    pub entity_links: Vec<L>,
}

impl<L: Marshal + Default> Marshal for AddActor<L> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint64(&mut self.entity_unique_id)?;
        io.varuint64(&mut self.entity_runtime_id)?;
        io.string(&mut self.entity_type)?;
        io.vec3(&mut self.position)?;
        io.vec3(&mut self.velocity)?;
        io.f32(&mut self.pitch)?;
        io.f32(&mut self.yaw)?;
        io.f32(&mut self.head_yaw)?;
        io.f32(&mut self.body_yaw)?;
        slice(io, &mut self.attributes)?;
        self.entity_metadata.marshal(io)?;
        self.entity_properties.marshal(io)?;
        slice(io, &mut self.entity_links)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilityLayer {
    pub layer_type: u16,
    pub abilities: u32,
    pub values: u32,
    pub fly_speed: f32,
    pub walk_speed: f32,
}

impl Marshal for AbilityLayer {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u16(&mut self.layer_type)?;
        io.u32(&mut self.abilities)?;
        io.u32(&mut self.values)?;
        io.f32(&mut self.fly_speed)?;
        io.f32(&mut self.walk_speed)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilityData {
    pub entity_unique_id: i64,
    pub player_permissions: u8,
    pub command_permissions: u8,
    pub layers: Vec<AbilityLayer>,
}

impl Marshal for AbilityData {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.i64(&mut self.entity_unique_id)?;
        io.u8(&mut self.player_permissions)?;
        io.u8(&mut self.command_permissions)?;
        slice(io, &mut self.layers)
    }
}

/// Spawns another player, generic over the entity link layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddPlayer<L = EntityLink> {
    pub uuid: Uuid,
    pub username: String,
    pub entity_runtime_id: u64,
    pub platform_chat_id: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub held_item: ItemInstance,
    pub game_type: i32,
    pub entity_metadata: EntityMetadata,
    pub entity_properties: EntityProperties,
    pub ability_data: AbilityData,
    pub entity_links: Vec<L>,
    pub device_id: String,
    pub build_platform: i32,
}

impl<L: Marshal + Default> Marshal for AddPlayer<L> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.uuid(&mut self.uuid)?;
        io.string(&mut self.username)?;
        io.varuint64(&mut self.entity_runtime_id)?;
        io.string(&mut self.platform_chat_id)?;
        io.vec3(&mut self.position)?;
        io.vec3(&mut self.velocity)?;
        io.f32(&mut self.pitch)?;
        io.f32(&mut self.yaw)?;
        io.f32(&mut self.head_yaw)?;
        self.held_item.marshal(io)?;
        io.varint32(&mut self.game_type)?;
        self.entity_metadata.marshal(io)?;
        self.entity_properties.marshal(io)?;
        self.ability_data.marshal(io)?;
        slice(io, &mut self.entity_links)?;
        io.string(&mut self.device_id)?;
        io.i32(&mut self.build_platform)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddItemActor {
    pub entity_unique_id: i64,
    pub entity_runtime_id: u64,
    pub item: ItemInstance,
    pub position: Vec3,
    pub velocity: Vec3,
    pub entity_metadata: EntityMetadata,
    pub from_fishing: bool,
}

impl Marshal for AddItemActor {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint64(&mut self.entity_unique_id)?;
        io.varuint64(&mut self.entity_runtime_id)?;
        self.item.marshal(io)?;
        io.vec3(&mut self.position)?;
        io.vec3(&mut self.velocity)?;
        self.entity_metadata.marshal(io)?;
        io.bool(&mut self.from_fishing)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetActorData {
    pub entity_runtime_id: u64,
    pub entity_metadata: EntityMetadata,
    pub entity_properties: EntityProperties,
    pub tick: u64,
}

impl Marshal for SetActorData {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.entity_runtime_id)?;
        self.entity_metadata.marshal(io)?;
        self.entity_properties.marshal(io)?;
        io.varuint64(&mut self.tick)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetActorLink<L = EntityLink> {
    pub entity_link: L,
}

impl<L: Marshal> Marshal for SetActorLink<L> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.entity_link.marshal(io)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetActorMotion {
    pub entity_runtime_id: u64,
    pub velocity: Vec3,
    pub tick: u64,
}

impl Marshal for SetActorMotion {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.entity_runtime_id)?;
        io.vec3(&mut self.velocity)?;
        io.varuint64(&mut self.tick)
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
    pub tick: u64,
}

impl Marshal for MobEffect {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.entity_runtime_id)?;
        io.u8(&mut self.operation)?;
        io.varint32(&mut self.effect_type)?;
        io.varint32(&mut self.amplifier)?;
        io.bool(&mut self.particles)?;
        io.varint32(&mut self.duration)?;
        io.varuint64(&mut self.tick)
    }
}

pub const PREDICTION_TYPE_PLAYER: u8 = 0;
pub const PREDICTION_TYPE_VEHICLE: u8 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectPlayerMovePrediction {
    pub prediction_type: u8,
    pub position: Vec3,
    pub delta: Vec3,
    /// Only sent for vehicle predictions.
    pub rotation: Vec2,
    /// Only sent for vehicle predictions.
    pub vehicle_angular_velocity: Option<f32>,
    pub on_ground: bool,
    pub tick: u64,
}

impl Marshal for CorrectPlayerMovePrediction {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.prediction_type)?;
        io.vec3(&mut self.position)?;
        io.vec3(&mut self.delta)?;
        if self.prediction_type == PREDICTION_TYPE_VEHICLE {
            io.vec2(&mut self.rotation)?;
            optional(io, &mut self.vehicle_angular_velocity, |io, v| io.f32(v))?;
        }
        io.bool(&mut self.on_ground)?;
        io.varuint64(&mut self.tick)
    }
}
