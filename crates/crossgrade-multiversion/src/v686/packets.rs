use crossgrade_protocol_core as latest;
use crossgrade_protocol_core::{CodecResult, Io, Marshal, PREDICTION_TYPE_VEHICLE};
use crossgrade_types::{ItemInstance, Vec2, Vec3};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Disconnect {
    pub reason: i32,
    pub hide_disconnection_screen: bool,
    pub message: String,
}

impl Marshal for Disconnect {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.reason)?;
        io.bool(&mut self.hide_disconnection_screen)?;
        if !self.hide_disconnection_screen {
            io.string(&mut self.message)?;
        }
        Ok(())
    }
}

impl From<Disconnect> for latest::Disconnect {
    fn from(pk: Disconnect) -> Self {
        latest::Disconnect {
            reason: pk.reason,
            hide_disconnection_screen: pk.hide_disconnection_screen,
            message: pk.message,
            filtered_message: String::new(),
        }
    }
}

impl From<latest::Disconnect> for Disconnect {
    fn from(pk: latest::Disconnect) -> Self {
        Disconnect {
            reason: pk.reason,
            hide_disconnection_screen: pk.hide_disconnection_screen,
            message: pk.message,
        }
    }
}

/// An entity link without the vehicle's angular velocity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityLink {
    pub ridden_entity_unique_id: i64,
    pub rider_entity_unique_id: i64,
    pub link_type: u8,
    pub immediate: bool,
    pub rider_initiated: bool,
}

impl Marshal for EntityLink {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint64(&mut self.ridden_entity_unique_id)?;
        io.varint64(&mut self.rider_entity_unique_id)?;
        io.u8(&mut self.link_type)?;
        io.bool(&mut self.immediate)?;
        io.bool(&mut self.rider_initiated)
    }
}

impl From<latest::EntityLink> for EntityLink {
    fn from(link: latest::EntityLink) -> Self {
        EntityLink {
            ridden_entity_unique_id: link.ridden_entity_unique_id,
            rider_entity_unique_id: link.rider_entity_unique_id,
            link_type: link.link_type,
            immediate: link.immediate,
            rider_initiated: link.rider_initiated,
        }
    }
}

pub type SetActorLink = latest::SetActorLink<EntityLink>;
pub type AddActor = latest::AddActor<EntityLink>;
pub type AddPlayer = latest::AddPlayer<EntityLink>;

fn links(links: Vec<latest::EntityLink>) -> Vec<EntityLink> {
    links.into_iter().map(Into::into).collect()
}

pub fn downgrade_add_actor(pk: latest::AddActor) -> AddActor {
    AddActor {
        entity_unique_id: pk.entity_unique_id,
        entity_runtime_id: pk.entity_runtime_id,
        entity_type: pk.entity_type,
        position: pk.position,
        velocity: pk.velocity,
        pitch: pk.pitch,
        yaw: pk.yaw,
        head_yaw: pk.head_yaw,
        body_yaw: pk.body_yaw,
        attributes: pk.attributes,
        entity_metadata: pk.entity_metadata,
        entity_properties: pk.entity_properties,
        entity_links: links(pk.entity_links),
    }
}

pub fn downgrade_add_player(pk: latest::AddPlayer) -> AddPlayer {
    AddPlayer {
        uuid: pk.uuid,
        username: pk.username,
        entity_runtime_id: pk.entity_runtime_id,
        platform_chat_id: pk.platform_chat_id,
        position: pk.position,
        velocity: pk.velocity,
        pitch: pk.pitch,
        yaw: pk.yaw,
        head_yaw: pk.head_yaw,
        held_item: pk.held_item,
        game_type: pk.game_type,
        entity_metadata: pk.entity_metadata,
        entity_properties: pk.entity_properties,
        ability_data: pk.ability_data,
        entity_links: links(pk.entity_links),
        device_id: pk.device_id,
        build_platform: pk.build_platform,
    }
}

/// Armour without the body slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobArmourEquipment {
    pub entity_runtime_id: u64,
    pub helmet: ItemInstance,
    pub chestplate: ItemInstance,
    pub leggings: ItemInstance,
    pub boots: ItemInstance,
}

impl Marshal for MobArmourEquipment {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.entity_runtime_id)?;
        self.helmet.marshal(io)?;
        self.chestplate.marshal(io)?;
        self.leggings.marshal(io)?;
        self.boots.marshal(io)
    }
}

impl From<MobArmourEquipment> for latest::MobArmourEquipment {
    fn from(pk: MobArmourEquipment) -> Self {
        latest::MobArmourEquipment {
            entity_runtime_id: pk.entity_runtime_id,
            helmet: pk.helmet,
            chestplate: pk.chestplate,
            leggings: pk.leggings,
            boots: pk.boots,
            body: ItemInstance::default(),
        }
    }
}

impl From<latest::MobArmourEquipment> for MobArmourEquipment {
    fn from(pk: latest::MobArmourEquipment) -> Self {
        MobArmourEquipment {
            entity_runtime_id: pk.entity_runtime_id,
            helmet: pk.helmet,
            chestplate: pk.chestplate,
            leggings: pk.leggings,
            boots: pk.boots,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopSound {
    pub sound_name: String,
    pub stop_all: bool,
}

impl Marshal for StopSound {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.sound_name)?;
        io.bool(&mut self.stop_all)
    }
}

impl From<latest::StopSound> for StopSound {
    fn from(pk: latest::StopSound) -> Self {
        StopSound {
            sound_name: pk.sound_name,
            stop_all: pk.stop_all,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySlot {
    pub window_id: u32,
    pub slot: u32,
    pub new_item: ItemInstance,
}

impl Marshal for InventorySlot {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.window_id)?;
        io.varuint32(&mut self.slot)?;
        self.new_item.marshal(io)
    }
}

impl From<latest::InventorySlot> for InventorySlot {
    fn from(pk: latest::InventorySlot) -> Self {
        InventorySlot {
            window_id: pk.window_id,
            slot: pk.slot,
            new_item: pk.new_item,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryContent {
    pub window_id: u32,
    pub content: Vec<ItemInstance>,
}

impl Marshal for InventoryContent {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.window_id)?;
        latest::slice(io, &mut self.content)
    }
}

impl From<latest::InventoryContent> for InventoryContent {
    fn from(pk: latest::InventoryContent) -> Self {
        InventoryContent {
            window_id: pk.window_id,
            content: pk.content,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeDimension {
    pub dimension: i32,
    pub position: Vec3,
    pub respawn: bool,
}

impl Marshal for ChangeDimension {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.dimension)?;
        io.vec3(&mut self.position)?;
        io.bool(&mut self.respawn)
    }
}

impl From<latest::ChangeDimension> for ChangeDimension {
    fn from(pk: latest::ChangeDimension) -> Self {
        ChangeDimension {
            dimension: pk.dimension,
            position: pk.position,
            respawn: pk.respawn,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectPlayerMovePrediction {
    pub prediction_type: u8,
    pub position: Vec3,
    pub delta: Vec3,
    /// Only sent for vehicle predictions.
    pub rotation: Vec2,
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
        }
        io.bool(&mut self.on_ground)?;
        io.varuint64(&mut self.tick)
    }
}

impl From<latest::CorrectPlayerMovePrediction> for CorrectPlayerMovePrediction {
    fn from(pk: latest::CorrectPlayerMovePrediction) -> Self {
        CorrectPlayerMovePrediction {
            prediction_type: pk.prediction_type,
            position: pk.position,
            delta: pk.delta,
            rotation: pk.rotation,
            on_ground: pk.on_ground,
            tick: pk.tick,
        }
    }
}

pub type InventoryTransaction = latest::InventoryTransaction<super::UseItemTransactionData>;
pub type ItemStackRequest = latest::ItemStackRequest<super::StackRequestAction>;
pub type PlayerAuthInput =
    latest::PlayerAuthInput<super::UseItemTransactionData, super::StackRequestAction>;
pub type ItemStackResponse = latest::ItemStackResponse<super::StackResponseContainerInfo>;

pub fn downgrade_item_stack_response(pk: latest::ItemStackResponse) -> ItemStackResponse {
    ItemStackResponse {
        responses: pk
            .responses
            .into_iter()
            .map(|r| latest::ItemStackResponseEntry {
                status: r.status,
                request_id: r.request_id,
                container_info: r.container_info.into_iter().map(Into::into).collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use crossgrade_protocol_core::{Reader, Writer};

    #[test]
    fn test_player_prediction_has_no_rotation() {
        let mut pk = CorrectPlayerMovePrediction {
            prediction_type: 0,
            rotation: Vec2::new(4.0, 5.0),
            tick: 2,
            ..Default::default()
        };
        let mut buf = BytesMut::new();
        pk.marshal(&mut Writer::new(&mut buf)).unwrap();
        let mut back = CorrectPlayerMovePrediction::default();
        back.marshal(&mut Reader::new(&buf)).unwrap();
        assert_eq!(back.rotation, Vec2::ZERO);
        assert_eq!(back.tick, 2);
    }

    #[test]
    fn test_links_lose_angular_velocity() {
        let pk = latest::AddActor {
            entity_type: "minecraft:boat".into(),
            entity_links: vec![latest::EntityLink {
                rider_entity_unique_id: 7,
                vehicle_angular_velocity: 0.25,
                ..Default::default()
            }],
            ..Default::default()
        };
        let down = downgrade_add_actor(pk);
        assert_eq!(down.entity_type, "minecraft:boat");
        assert_eq!(down.entity_links[0].rider_entity_unique_id, 7);
    }
}
