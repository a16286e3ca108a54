use crate::codec::{func_slice, func_slice_u32, slice, slice_u32, CodecResult, Io, Marshal};
use crate::packets::inventory::{
    InventoryAction, ItemStackRequestEntry, LegacySetItemSlot, StackRequestAction,
    UseItemTransactionData,
};
use crossgrade_types::{BlockPos, Uuid, Vec2, Vec3};

pub const INPUT_FLAG_PERFORM_ITEM_INTERACTION: u64 = 1 << 34;
pub const INPUT_FLAG_PERFORM_BLOCK_ACTIONS: u64 = 1 << 35;
pub const INPUT_FLAG_PERFORM_ITEM_STACK_REQUEST: u64 = 1 << 36;
pub const INPUT_FLAG_CLIENT_PREDICTED_VEHICLE: u64 = 1 << 45;

pub const PLAY_MODE_NORMAL: u32 = 0;
pub const PLAY_MODE_REALITY: u32 = 4;

pub const PLAYER_ACTION_START_BREAK: i32 = 0;
pub const PLAYER_ACTION_ABORT_BREAK: i32 = 1;
pub const PLAYER_ACTION_STOP_BREAK: i32 = 2;
pub const PLAYER_ACTION_CRACK_BREAK: i32 = 18;
pub const PLAYER_ACTION_PREDICT_DESTROY_BLOCK: i32 = 26;
pub const PLAYER_ACTION_CONTINUE_DESTROY_BLOCK: i32 = 27;

/// A block action performed during a tick of player input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerBlockAction {
    pub action: i32,
    /// Only sent for the break actions.
    pub block_pos: BlockPos,
    pub face: i32,
}

impl Marshal for PlayerBlockAction {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.action)?;
        match self.action {
            PLAYER_ACTION_START_BREAK
            | PLAYER_ACTION_ABORT_BREAK
            | PLAYER_ACTION_CRACK_BREAK
            | PLAYER_ACTION_PREDICT_DESTROY_BLOCK
            | PLAYER_ACTION_CONTINUE_DESTROY_BLOCK => {
                io.block_pos(&mut self.block_pos)?;
                io.varint32(&mut self.face)
            }
            _ => Ok(()),
        }
    }
}

/// The item use carried by player input, generic over the use-item layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemInteraction<U = UseItemTransactionData> {
    pub legacy_request_id: i32,
    pub legacy_set_item_slots: Vec<LegacySetItemSlot>,
    pub actions: Vec<InventoryAction>,
    pub data: U,
}

impl<U> ItemInteraction<U> {
    pub fn marshal_with(
        &mut self,
        io: &mut dyn Io,
        use_item: impl FnOnce(&mut U, &mut dyn Io) -> CodecResult<()>,
    ) -> CodecResult<()> {
        io.varint32(&mut self.legacy_request_id)?;
        if self.legacy_request_id < -1 && self.legacy_request_id & 1 == 0 {
            slice(io, &mut self.legacy_set_item_slots)?;
        }
        slice(io, &mut self.actions)?;
        use_item(&mut self.data, io)
    }

    /// Converts the use-item payload, keeping the rest of the interaction.
    pub fn map_data<V>(self, f: impl FnOnce(U) -> V) -> ItemInteraction<V> {
        ItemInteraction {
            legacy_request_id: self.legacy_request_id,
            legacy_set_item_slots: self.legacy_set_item_slots,
            actions: self.actions,
            data: f(self.data),
        }
    }
}

/// How the client-predicted vehicle block of player input is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleLayout {
    /// Rotation followed by the vehicle's unique ID.
    RotationAndId,
    /// Only the vehicle's unique ID.
    IdOnly,
    /// Not present on the wire.
    Absent,
}

/// Per-tick player input, generic over the use-item and stack request action layouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerAuthInput<U = UseItemTransactionData, A = StackRequestAction> {
    pub pitch: f32,
    pub yaw: f32,
    pub position: Vec3,
    pub move_vector: Vec2,
    pub head_yaw: f32,
    pub input_data: u64,
    pub input_mode: u32,
    pub play_mode: u32,
    pub interaction_model: u32,
    /// Only sent in reality play mode.
    pub gaze_direction: Vec3,
    pub tick: u64,
    pub delta: Vec3,
    pub item_interaction: ItemInteraction<U>,
    pub item_stack_request: ItemStackRequestEntry<A>,
    pub block_actions: Vec<PlayerBlockAction>,
    pub vehicle_rotation: Vec2,
    pub client_predicted_vehicle: i64,
    pub analogue_move_vector: Vec2,
}

impl<U, A: Marshal + Default> PlayerAuthInput<U, A> {
    pub fn has_flag(&self, flag: u64) -> bool {
        self.input_data & flag != 0
    }

    pub fn marshal_with(
        &mut self,
        io: &mut dyn Io,
        vehicle: VehicleLayout,
        use_item: impl FnOnce(&mut U, &mut dyn Io) -> CodecResult<()>,
    ) -> CodecResult<()> {
        io.f32(&mut self.pitch)?;
        io.f32(&mut self.yaw)?;
        io.vec3(&mut self.position)?;
        io.vec2(&mut self.move_vector)?;
        io.f32(&mut self.head_yaw)?;
        io.varuint64(&mut self.input_data)?;
        io.varuint32(&mut self.input_mode)?;
        io.varuint32(&mut self.play_mode)?;
        io.varuint32(&mut self.interaction_model)?;
        if self.play_mode == PLAY_MODE_REALITY {
            io.vec3(&mut self.gaze_direction)?;
        }
        io.varuint64(&mut self.tick)?;
        io.vec3(&mut self.delta)?;
        if self.has_flag(INPUT_FLAG_PERFORM_ITEM_INTERACTION) {
            self.item_interaction.marshal_with(io, use_item)?;
        }
        if self.has_flag(INPUT_FLAG_PERFORM_ITEM_STACK_REQUEST) {
            self.item_stack_request.marshal(io)?;
        }
        if self.has_flag(INPUT_FLAG_PERFORM_BLOCK_ACTIONS) {
            func_slice(io, &mut self.block_actions, |io, a| a.marshal(io))?;
        }
        if self.has_flag(INPUT_FLAG_CLIENT_PREDICTED_VEHICLE) {
            match vehicle {
                VehicleLayout::RotationAndId => {
                    io.vec2(&mut self.vehicle_rotation)?;
                    io.varint64(&mut self.client_predicted_vehicle)?;
                }
                VehicleLayout::IdOnly => io.varint64(&mut self.client_predicted_vehicle)?,
                VehicleLayout::Absent => {}
            }
        }
        io.vec2(&mut self.analogue_move_vector)
    }
}

impl Marshal for PlayerAuthInput {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_with(io, VehicleLayout::RotationAndId, |data, io| {
            data.marshal_with(io, false)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinAnimation {
    pub image_width: u32,
    pub image_height: u32,
    pub image_data: Vec<u8>,
    pub animation_type: u32,
    pub frame_count: f32,
    pub expression_type: u32,
}

impl Marshal for SkinAnimation {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u32(&mut self.image_width)?;
        io.u32(&mut self.image_height)?;
        io.byte_slice(&mut self.image_data)?;
        io.u32(&mut self.animation_type)?;
        io.f32(&mut self.frame_count)?;
        io.u32(&mut self.expression_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonaPiece {
    pub piece_id: String,
    pub piece_type: String,
    pub pack_id: String,
    pub default: bool,
    pub product_id: String,
}

impl Marshal for PersonaPiece {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.piece_id)?;
        io.string(&mut self.piece_type)?;
        io.string(&mut self.pack_id)?;
        io.bool(&mut self.default)?;
        io.string(&mut self.product_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonaPieceTintColour {
    pub piece_type: String,
    pub colours: Vec<String>,
}

impl Marshal for PersonaPieceTintColour {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.piece_type)?;
        func_slice_u32(io, &mut self.colours, |io, c| io.string(c))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skin {
    pub skin_id: String,
    pub play_fab_id: String,
    pub skin_resource_patch: Vec<u8>,
    pub skin_image_width: u32,
    pub skin_image_height: u32,
    pub skin_data: Vec<u8>,
    pub animations: Vec<SkinAnimation>,
    pub cape_image_width: u32,
    pub cape_image_height: u32,
    pub cape_data: Vec<u8>,
    pub skin_geometry: Vec<u8>,
    pub geometry_data_engine_version: Vec<u8>,
    pub animation_data: Vec<u8>,
    pub cape_id: String,
    pub full_id: String,
    pub arm_size: String,
    pub skin_colour: String,
    pub persona_pieces: Vec<PersonaPiece>,
    pub piece_tint_colours: Vec<PersonaPieceTintColour>,
    pub premium: bool,
    pub persona: bool,
    pub persona_cape_on_classic: bool,
    pub primary_user: bool,
    pub override_appearance: bool,
    /// Sent after the entries of a player list, not with the skin itself.
    pub trusted: bool,
}

impl Marshal for Skin {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.skin_id)?;
        io.string(&mut self.play_fab_id)?;
        io.byte_slice(&mut self.skin_resource_patch)?;
        io.u32(&mut self.skin_image_width)?;
        io.u32(&mut self.skin_image_height)?;
        io.byte_slice(&mut self.skin_data)?;
        slice_u32(io, &mut self.animations)?;
        io.u32(&mut self.cape_image_width)?;
        io.u32(&mut self.cape_image_height)?;
        io.byte_slice(&mut self.cape_data)?;
        io.byte_slice(&mut self.skin_geometry)?;
        io.byte_slice(&mut self.geometry_data_engine_version)?;
        io.byte_slice(&mut self.animation_data)?;
        io.string(&mut self.cape_id)?;
        io.string(&mut self.full_id)?;
        io.string(&mut self.arm_size)?;
        io.string(&mut self.skin_colour)?;
        slice_u32(io, &mut self.persona_pieces)?;
        slice_u32(io, &mut self.piece_tint_colours)?;
        io.bool(&mut self.premium)?;
        io.bool(&mut self.persona)?;
        io.bool(&mut self.persona_cape_on_classic)?;
        io.bool(&mut self.primary_user)?;
        io.bool(&mut self.override_appearance)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerListEntry {
    pub uuid: Uuid,
    pub entity_unique_id: i64,
    pub username: String,
    pub xuid: String,
    pub platform_chat_id: String,
    pub build_platform: i32,
    pub skin: Skin,
    pub teacher: bool,
    pub host: bool,
    pub sub_client: bool,
}

impl PlayerListEntry {
    fn marshal_add(&mut self, io: &mut dyn Io, sub_client: bool) -> CodecResult<()> {
        io.uuid(&mut self.uuid)?;
        io.varint64(&mut self.entity_unique_id)?;
        io.string(&mut self.username)?;
        io.string(&mut self.xuid)?;
        io.string(&mut self.platform_chat_id)?;
        io.i32(&mut self.build_platform)?;
        self.skin.marshal(io)?;
        io.bool(&mut self.teacher)?;
        io.bool(&mut self.host)?;
        if sub_client {
            io.bool(&mut self.sub_client)?;
        }
        Ok(())
    }
}

pub const PLAYER_LIST_ACTION_ADD: u8 = 0;
pub const PLAYER_LIST_ACTION_REMOVE: u8 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerList {
    pub action_type: u8,
    pub entries: Vec<PlayerListEntry>,
}

impl PlayerList {
    /// Codes the packet. Older layouts do not send the sub-client flag of added entries.
    pub fn marshal_with(&mut self, io: &mut dyn Io, sub_client: bool) -> CodecResult<()> {
        io.u8(&mut self.action_type)?;
        match self.action_type {
            PLAYER_LIST_ACTION_ADD => {
                func_slice(io, &mut self.entries, |io, e| e.marshal_add(io, sub_client))?;
                for entry in self.entries.iter_mut() {
                    io.bool(&mut entry.skin.trusted)?;
                }
                Ok(())
            }
            PLAYER_LIST_ACTION_REMOVE => func_slice(io, &mut self.entries, |io, e| io.uuid(&mut e.uuid)),
            other => Err(io.unknown_enum_option(other as i64, "player list action type")),
        }
    }
}

impl Marshal for PlayerList {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_with(io, true)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePlayerGameType {
    pub game_type: i32,
    pub player_unique_id: i64,
    pub tick: u64,
}

impl Marshal for UpdatePlayerGameType {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.game_type)?;
        io.varint64(&mut self.player_unique_id)?;
        io.varuint64(&mut self.tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Reader, Writer};
    use crate::packets::inventory::{TransferAction, CLIENT_PREDICTION_SUCCESS};
    use bytes::BytesMut;

    fn roundtrip<T: Marshal + Default>(value: &mut T) -> T {
        let mut buf = BytesMut::new();
        value.marshal(&mut Writer::new(&mut buf)).unwrap();
        let mut back = T::default();
        let mut reader = Reader::new(&buf);
        back.marshal(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);
        back
    }

    #[test]
    fn test_auth_input_with_every_block() {
        let mut pk = PlayerAuthInput {
            pitch: 10.0,
            position: Vec3::new(1.0, 65.6, -4.0),
            input_data: INPUT_FLAG_PERFORM_ITEM_INTERACTION
                | INPUT_FLAG_PERFORM_ITEM_STACK_REQUEST
                | INPUT_FLAG_PERFORM_BLOCK_ACTIONS
                | INPUT_FLAG_CLIENT_PREDICTED_VEHICLE,
            play_mode: PLAY_MODE_REALITY,
            gaze_direction: Vec3::new(0.0, 1.0, 0.0),
            tick: 400,
            item_interaction: ItemInteraction {
                legacy_request_id: -4,
                legacy_set_item_slots: vec![LegacySetItemSlot {
                    container_id: 1,
                    slots: vec![3],
                }],
                actions: Vec::new(),
                data: UseItemTransactionData {
                    block_position: BlockPos::new(0, -60, 0),
                    client_prediction: CLIENT_PREDICTION_SUCCESS,
                    ..Default::default()
                },
            },
            item_stack_request: ItemStackRequestEntry {
                request_id: -1,
                actions: vec![StackRequestAction::Take(TransferAction::default())],
                ..Default::default()
            },
            block_actions: vec![
                PlayerBlockAction {
                    action: PLAYER_ACTION_START_BREAK,
                    block_pos: BlockPos::new(5, 6, 7),
                    face: 1,
                },
                PlayerBlockAction {
                    action: PLAYER_ACTION_STOP_BREAK,
                    ..Default::default()
                },
            ],
            vehicle_rotation: Vec2::new(3.0, 4.0),
            client_predicted_vehicle: -12,
            analogue_move_vector: Vec2::new(0.5, -0.3),
            ..Default::default()
        };
        assert_eq!(roundtrip(&mut pk), pk);
    }

    #[test]
    fn test_auth_input_without_flags_skips_blocks() {
        let mut pk = PlayerAuthInput {
            vehicle_rotation: Vec2::new(1.0, 1.0),
            client_predicted_vehicle: 9,
            ..Default::default()
        };
        let back = roundtrip(&mut pk);
        assert_eq!(back.vehicle_rotation, Vec2::ZERO);
        assert_eq!(back.client_predicted_vehicle, 0);
    }

    #[test]
    fn test_vehicle_layouts_differ_in_size() {
        let mut pk: PlayerAuthInput = PlayerAuthInput {
            input_data: INPUT_FLAG_CLIENT_PREDICTED_VEHICLE,
            client_predicted_vehicle: 1,
            ..Default::default()
        };
        let mut sizes = Vec::new();
        for layout in [
            VehicleLayout::RotationAndId,
            VehicleLayout::IdOnly,
            VehicleLayout::Absent,
        ] {
            let mut buf = BytesMut::new();
            pk.marshal_with(&mut Writer::new(&mut buf), layout, |d, io| {
                d.marshal_with(io, false)
            })
            .unwrap();
            sizes.push(buf.len());
        }
        assert_eq!(sizes[0] - sizes[1], 8);
        assert_eq!(sizes[1] - sizes[2], 1);
    }

    #[test]
    fn test_player_list_add_trailing_trust_flags() {
        let mut pk = PlayerList {
            action_type: PLAYER_LIST_ACTION_ADD,
            entries: vec![PlayerListEntry {
                uuid: Uuid::from_u128(7),
                username: "Alex".into(),
                skin: Skin {
                    skin_id: "custom".into(),
                    trusted: true,
                    ..Default::default()
                },
                sub_client: true,
                ..Default::default()
            }],
        };
        let back = roundtrip(&mut pk);
        assert!(back.entries[0].skin.trusted);
        assert!(back.entries[0].sub_client);
    }

    #[test]
    fn test_player_list_unknown_action() {
        let bytes = [7u8];
        let mut pk = PlayerList::default();
        assert!(matches!(
            pk.marshal(&mut Reader::new(&bytes)),
            Err(crate::CodecError::UnknownEnumOption { value: 7, .. })
        ));
    }
}
