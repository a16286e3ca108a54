//! Protocol 686, game version 1.21.2.

mod inventory;
mod packets;

pub use inventory::*;
pub use packets::*;

use crossgrade_protocol_core as latest;
use crossgrade_protocol_core::{
    ids, latest_pool, CodecResult, Direction, LatestPacket, Marshal, PacksInfoLayout, Pool,
    VehicleLayout, CLIENT_PREDICTION_SUCCESS, TRIGGER_TYPE_UNKNOWN,
};
use tracing::debug;

use crate::protocol::{ConnContext, Version};

crate::packet::legacy_packets! {
    Disconnect(Disconnect) = ids::DISCONNECT => |pk, io| pk.marshal(io),
    InventoryTransaction(InventoryTransaction) = ids::INVENTORY_TRANSACTION => |pk, io| {
        pk.marshal_with(io, |data, io| data.marshal_with(io, true))
    },
    ItemStackRequest(ItemStackRequest) = ids::ITEM_STACK_REQUEST => |pk, io| pk.marshal(io),
    PlayerAuthInput(PlayerAuthInput) = ids::PLAYER_AUTH_INPUT => |pk, io| {
        pk.marshal_with(io, VehicleLayout::RotationAndId, |data, io| data.marshal_with(io, false))
    },
    MobArmourEquipment(MobArmourEquipment) = ids::MOB_ARMOUR_EQUIPMENT => |pk, io| pk.marshal(io),
    ItemStackResponse(ItemStackResponse) = ids::ITEM_STACK_RESPONSE => |pk, io| pk.marshal(io),
    SetActorLink(SetActorLink) = ids::SET_ACTOR_LINK => |pk, io| pk.marshal(io),
    AddActor(AddActor) = ids::ADD_ACTOR => |pk, io| pk.marshal(io),
    AddPlayer(AddPlayer) = ids::ADD_PLAYER => |pk, io| pk.marshal(io),
    ResourcePacksInfo(latest::ResourcePacksInfo) = ids::RESOURCE_PACKS_INFO => |pk, io| {
        pk.marshal_with(io, RESOURCE_PACKS_INFO_LAYOUT)
    },
    SetTitle(latest::SetTitle) = ids::SET_TITLE => |pk, io| pk.marshal_base(io),
    StopSound(StopSound) = ids::STOP_SOUND => |pk, io| pk.marshal(io),
    InventorySlot(InventorySlot) = ids::INVENTORY_SLOT => |pk, io| pk.marshal(io),
    InventoryContent(InventoryContent) = ids::INVENTORY_CONTENT => |pk, io| pk.marshal(io),
    CameraInstruction(latest::CameraInstruction) = ids::CAMERA_INSTRUCTION => |pk, io| {
        pk.marshal_base(io)
    },
    ChangeDimension(ChangeDimension) = ids::CHANGE_DIMENSION => |pk, io| pk.marshal(io),
    CorrectPlayerMovePrediction(CorrectPlayerMovePrediction) = ids::CORRECT_PLAYER_MOVE_PREDICTION => |pk, io| {
        pk.marshal(io)
    },
}

/// Pack infos without the addon flag.
pub const RESOURCE_PACKS_INFO_LAYOUT: PacksInfoLayout = PacksInfoLayout {
    has_addons: true,
    addon_pack: false,
};

impl From<Packet> for crate::Packet {
    fn from(pk: Packet) -> Self {
        crate::Packet::V686(pk)
    }
}

fn new<T: Default + Into<Packet>>() -> crate::Packet {
    crate::Packet::V686(T::default().into())
}

pub struct V686;

impl Version for V686 {
    const ID: i32 = 686;
    const NAME: &'static str = "1.21.2";

    fn pool(direction: Direction) -> Pool<crate::Packet> {
        let pool = latest_pool(direction).map(crate::Packet::Latest);
        match direction {
            Direction::Serverbound => pool
                .with(ids::DISCONNECT, new::<Disconnect>)
                .with(ids::INVENTORY_TRANSACTION, new::<InventoryTransaction>)
                .with(ids::ITEM_STACK_REQUEST, new::<ItemStackRequest>)
                .with(ids::PLAYER_AUTH_INPUT, new::<PlayerAuthInput>)
                .with(ids::MOB_ARMOUR_EQUIPMENT, new::<MobArmourEquipment>)
                .without(ids::SERVER_BOUND_DIAGNOSTICS)
                .without(ids::SERVER_BOUND_LOADING_SCREEN),
            Direction::Clientbound => pool
                .with(ids::DISCONNECT, new::<Disconnect>)
                .with(ids::ITEM_STACK_RESPONSE, new::<ItemStackResponse>)
                .with(ids::SET_ACTOR_LINK, new::<SetActorLink>)
                .with(ids::ADD_ACTOR, new::<AddActor>)
                .with(ids::ADD_PLAYER, new::<AddPlayer>)
                .with(ids::RESOURCE_PACKS_INFO, new::<latest::ResourcePacksInfo>)
                .with(ids::MOB_ARMOUR_EQUIPMENT, new::<MobArmourEquipment>)
                .with(ids::SET_TITLE, new::<latest::SetTitle>)
                .with(ids::STOP_SOUND, new::<StopSound>)
                .with(ids::INVENTORY_SLOT, new::<InventorySlot>)
                .with(ids::INVENTORY_CONTENT, new::<InventoryContent>)
                .with(ids::CAMERA_INSTRUCTION, new::<latest::CameraInstruction>)
                .with(ids::CHANGE_DIMENSION, new::<ChangeDimension>)
                .with(ids::CORRECT_PLAYER_MOVE_PREDICTION, new::<CorrectPlayerMovePrediction>)
                .without(ids::CURRENT_STRUCTURE_FEATURE)
                .without(ids::JIGSAW_STRUCTURE_DATA),
        }
    }

    fn upgrade(pks: Vec<crate::Packet>, _ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        Ok(pks.into_iter().map(upgrade).collect())
    }

    fn downgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        Ok(pks
            .into_iter()
            .filter_map(|pk| downgrade(pk, ctx))
            .collect())
    }
}

fn upgrade(pk: crate::Packet) -> crate::Packet {
    let crate::Packet::V686(pk) = pk else {
        return pk;
    };
    let latest = match pk {
        Packet::Disconnect(pk) => LatestPacket::Disconnect(pk.into()),
        Packet::InventoryTransaction(pk) => {
            LatestPacket::InventoryTransaction(latest::InventoryTransaction {
                legacy_request_id: pk.legacy_request_id,
                legacy_set_item_slots: pk.legacy_set_item_slots,
                actions: pk.actions,
                transaction_data: pk
                    .transaction_data
                    .map_use_item(|data| data.upgrade(TRIGGER_TYPE_UNKNOWN, 0)),
            })
        }
        Packet::ItemStackRequest(pk) => LatestPacket::ItemStackRequest(latest::ItemStackRequest {
            requests: pk.requests.into_iter().map(upgrade_request).collect(),
        }),
        Packet::PlayerAuthInput(pk) => LatestPacket::PlayerAuthInput(upgrade_auth_input(pk)),
        Packet::MobArmourEquipment(pk) => LatestPacket::MobArmourEquipment(pk.into()),
        other => return crate::Packet::V686(other),
    };
    crate::Packet::Latest(latest)
}

fn upgrade_request(
    request: latest::ItemStackRequestEntry<StackRequestAction>,
) -> latest::ItemStackRequestEntry {
    latest::ItemStackRequestEntry {
        request_id: request.request_id,
        actions: request.actions.into_iter().map(Into::into).collect(),
        filter_strings: request.filter_strings,
        filter_cause: request.filter_cause,
    }
}

fn upgrade_auth_input(pk: PlayerAuthInput) -> latest::PlayerAuthInput {
    latest::PlayerAuthInput {
        pitch: pk.pitch,
        yaw: pk.yaw,
        position: pk.position,
        move_vector: pk.move_vector,
        head_yaw: pk.head_yaw,
        input_data: pk.input_data,
        input_mode: pk.input_mode,
        play_mode: pk.play_mode,
        interaction_model: pk.interaction_model,
        gaze_direction: pk.gaze_direction,
        tick: pk.tick,
        delta: pk.delta,
        item_interaction: pk
            .item_interaction
            .map_data(|data| data.upgrade(TRIGGER_TYPE_UNKNOWN, CLIENT_PREDICTION_SUCCESS)),
        item_stack_request: upgrade_request(pk.item_stack_request),
        block_actions: pk.block_actions,
        vehicle_rotation: pk.vehicle_rotation,
        client_predicted_vehicle: pk.client_predicted_vehicle,
        analogue_move_vector: pk.analogue_move_vector,
    }
}

fn downgrade(pk: crate::Packet, ctx: &ConnContext) -> Option<crate::Packet> {
    let crate::Packet::Latest(pk) = pk else {
        return Some(pk);
    };
    let legacy = match pk {
        LatestPacket::ItemStackResponse(pk) => {
            Packet::ItemStackResponse(downgrade_item_stack_response(pk))
        }
        LatestPacket::CorrectPlayerMovePrediction(pk) => {
            Packet::CorrectPlayerMovePrediction(pk.into())
        }
        LatestPacket::ResourcePacksInfo(pk) => Packet::ResourcePacksInfo(pk),
        LatestPacket::SetActorLink(pk) => Packet::SetActorLink(SetActorLink {
            entity_link: pk.entity_link.into(),
        }),
        LatestPacket::AddActor(pk) => Packet::AddActor(downgrade_add_actor(pk)),
        LatestPacket::AddPlayer(pk) => Packet::AddPlayer(downgrade_add_player(pk)),
        LatestPacket::MobArmourEquipment(pk) => Packet::MobArmourEquipment(pk.into()),
        LatestPacket::SetTitle(pk) => Packet::SetTitle(pk),
        LatestPacket::StopSound(pk) => Packet::StopSound(pk.into()),
        LatestPacket::InventorySlot(pk) => Packet::InventorySlot(pk.into()),
        LatestPacket::Disconnect(pk) => Packet::Disconnect(pk.into()),
        LatestPacket::CameraInstruction(pk) => Packet::CameraInstruction(pk),
        LatestPacket::InventoryContent(pk) => Packet::InventoryContent(pk.into()),
        LatestPacket::ChangeDimension(pk) => Packet::ChangeDimension(pk.into()),
        pk @ (LatestPacket::CurrentStructureFeature(_)
        | LatestPacket::JigsawStructureData(_)
        | LatestPacket::ServerBoundDiagnostics(_)
        | LatestPacket::ServerBoundLoadingScreen(_)) => {
            debug!("conn {}: dropping {} for {}", ctx.id, pk.name(), V686::ID);
            return None;
        }
        other => return Some(crate::Packet::Latest(other)),
    };
    Some(crate::Packet::V686(legacy))
}
