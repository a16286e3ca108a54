//! Inventory layouts used up to 1.21.2.
//!
//! Slots are addressed by a bare container ID, craft actions carry no craft
//! count, and use-item data lacks the trigger type and client prediction.

use crossgrade_protocol_core as latest;
use crossgrade_protocol_core::{
    slice, CodecResult, CraftResultsDeprecatedAction, DestroyAction, DropAction,
    FullContainerName, Io, ItemDescriptorCount, Marshal, SwapAction, TransferAction,
    STACK_REQUEST_BEACON_PAYMENT, STACK_REQUEST_CONSUME, STACK_REQUEST_CRAFT_CREATIVE,
    STACK_REQUEST_CRAFT_GRINDSTONE, STACK_REQUEST_CRAFT_LOOM, STACK_REQUEST_CRAFT_NON_IMPLEMENTED,
    STACK_REQUEST_CRAFT_RECIPE, STACK_REQUEST_CRAFT_RECIPE_AUTO,
    STACK_REQUEST_CRAFT_RECIPE_OPTIONAL, STACK_REQUEST_CRAFT_RESULTS_DEPRECATED,
    STACK_REQUEST_CREATE, STACK_REQUEST_DESTROY, STACK_REQUEST_DROP,
    STACK_REQUEST_LAB_TABLE_COMBINE, STACK_REQUEST_MINE_BLOCK, STACK_REQUEST_PLACE,
    STACK_REQUEST_PLACE_IN_CONTAINER, STACK_REQUEST_SWAP, STACK_REQUEST_TAKE,
    STACK_REQUEST_TAKE_OUT_CONTAINER,
};
use crossgrade_types::{BlockPos, ItemInstance, Vec3};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseItemTransactionData {
    pub action_type: u32,
    pub block_position: BlockPos,
    pub block_face: i32,
    pub hot_bar_slot: i32,
    pub held_item: ItemInstance,
    pub position: Vec3,
    pub clicked_position: Vec3,
    pub block_runtime_id: u32,
}

impl UseItemTransactionData {
    pub fn marshal_with(&mut self, io: &mut dyn Io, unsigned_y: bool) -> CodecResult<()> {
        io.varuint32(&mut self.action_type)?;
        if unsigned_y {
            io.ublock_pos(&mut self.block_position)?;
        } else {
            io.block_pos(&mut self.block_position)?;
        }
        io.varint32(&mut self.block_face)?;
        io.varint32(&mut self.hot_bar_slot)?;
        self.held_item.marshal(io)?;
        io.vec3(&mut self.position)?;
        io.vec3(&mut self.clicked_position)?;
        io.varuint32(&mut self.block_runtime_id)
    }

    /// The latest layout, filling in the fields this one lacks.
    pub fn upgrade(self, trigger_type: u32, client_prediction: u32) -> latest::UseItemTransactionData {
        latest::UseItemTransactionData {
            action_type: self.action_type,
            trigger_type,
            block_position: self.block_position,
            block_face: self.block_face,
            hot_bar_slot: self.hot_bar_slot,
            held_item: self.held_item,
            position: self.position,
            clicked_position: self.clicked_position,
            block_runtime_id: self.block_runtime_id,
            client_prediction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackRequestSlotInfo {
    pub container_id: u8,
    pub slot: u8,
    pub stack_network_id: i32,
}

impl Marshal for StackRequestSlotInfo {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.container_id)?;
        io.u8(&mut self.slot)?;
        io.varint32(&mut self.stack_network_id)
    }
}

impl From<StackRequestSlotInfo> for latest::StackRequestSlotInfo {
    fn from(info: StackRequestSlotInfo) -> Self {
        latest::StackRequestSlotInfo {
            container: FullContainerName::new(info.container_id),
            slot: info.slot,
            stack_network_id: info.stack_network_id,
        }
    }
}

/// A stack request action. Craft actions have no `number_of_crafts`.
#[derive(Debug, Clone, PartialEq)]
pub enum StackRequestAction {
    Take(TransferAction<StackRequestSlotInfo>),
    Place(TransferAction<StackRequestSlotInfo>),
    Swap(SwapAction<StackRequestSlotInfo>),
    Drop(DropAction<StackRequestSlotInfo>),
    Destroy(DestroyAction<StackRequestSlotInfo>),
    Consume(DestroyAction<StackRequestSlotInfo>),
    Create {
        results_slot: u8,
    },
    PlaceInContainer(TransferAction<StackRequestSlotInfo>),
    TakeOutContainer(TransferAction<StackRequestSlotInfo>),
    LabTableCombine,
    BeaconPayment {
        primary_effect: i32,
        secondary_effect: i32,
    },
    MineBlock {
        hot_bar_slot: i32,
        predicted_durability: i32,
        stack_network_id: i32,
    },
    CraftRecipe {
        recipe_network_id: u32,
    },
    AutoCraftRecipe {
        recipe_network_id: u32,
        times_crafted: u8,
        ingredients: Vec<ItemDescriptorCount>,
    },
    CraftCreative {
        creative_item_network_id: u32,
    },
    CraftRecipeOptional {
        recipe_network_id: u32,
        filter_string_index: i32,
    },
    CraftGrindstone {
        recipe_network_id: u32,
        cost: i32,
    },
    CraftLoom {
        pattern: String,
    },
    CraftNonImplemented,
    CraftResultsDeprecated(CraftResultsDeprecatedAction),
}

impl Default for StackRequestAction {
    fn default() -> Self {
        StackRequestAction::LabTableCombine
    }
}

impl StackRequestAction {
    pub fn type_id(&self) -> u8 {
        match self {
            StackRequestAction::Take(_) => STACK_REQUEST_TAKE,
            StackRequestAction::Place(_) => STACK_REQUEST_PLACE,
            StackRequestAction::Swap(_) => STACK_REQUEST_SWAP,
            StackRequestAction::Drop(_) => STACK_REQUEST_DROP,
            StackRequestAction::Destroy(_) => STACK_REQUEST_DESTROY,
            StackRequestAction::Consume(_) => STACK_REQUEST_CONSUME,
            StackRequestAction::Create { .. } => STACK_REQUEST_CREATE,
            StackRequestAction::PlaceInContainer(_) => STACK_REQUEST_PLACE_IN_CONTAINER,
            StackRequestAction::TakeOutContainer(_) => STACK_REQUEST_TAKE_OUT_CONTAINER,
            StackRequestAction::LabTableCombine => STACK_REQUEST_LAB_TABLE_COMBINE,
            StackRequestAction::BeaconPayment { .. } => STACK_REQUEST_BEACON_PAYMENT,
            StackRequestAction::MineBlock { .. } => STACK_REQUEST_MINE_BLOCK,
            StackRequestAction::CraftRecipe { .. } => STACK_REQUEST_CRAFT_RECIPE,
            StackRequestAction::AutoCraftRecipe { .. } => STACK_REQUEST_CRAFT_RECIPE_AUTO,
            StackRequestAction::CraftCreative { .. } => STACK_REQUEST_CRAFT_CREATIVE,
            StackRequestAction::CraftRecipeOptional { .. } => STACK_REQUEST_CRAFT_RECIPE_OPTIONAL,
            StackRequestAction::CraftGrindstone { .. } => STACK_REQUEST_CRAFT_GRINDSTONE,
            StackRequestAction::CraftLoom { .. } => STACK_REQUEST_CRAFT_LOOM,
            StackRequestAction::CraftNonImplemented => STACK_REQUEST_CRAFT_NON_IMPLEMENTED,
            StackRequestAction::CraftResultsDeprecated(_) => STACK_REQUEST_CRAFT_RESULTS_DEPRECATED,
        }
    }

    fn empty(id: u8, io: &dyn Io) -> CodecResult<Self> {
        Ok(match id {
            STACK_REQUEST_TAKE => StackRequestAction::Take(Default::default()),
            STACK_REQUEST_PLACE => StackRequestAction::Place(Default::default()),
            STACK_REQUEST_SWAP => StackRequestAction::Swap(Default::default()),
            STACK_REQUEST_DROP => StackRequestAction::Drop(Default::default()),
            STACK_REQUEST_DESTROY => StackRequestAction::Destroy(Default::default()),
            STACK_REQUEST_CONSUME => StackRequestAction::Consume(Default::default()),
            STACK_REQUEST_CREATE => StackRequestAction::Create { results_slot: 0 },
            STACK_REQUEST_PLACE_IN_CONTAINER => StackRequestAction::PlaceInContainer(Default::default()),
            STACK_REQUEST_TAKE_OUT_CONTAINER => StackRequestAction::TakeOutContainer(Default::default()),
            STACK_REQUEST_LAB_TABLE_COMBINE => StackRequestAction::LabTableCombine,
            STACK_REQUEST_BEACON_PAYMENT => StackRequestAction::BeaconPayment {
                primary_effect: 0,
                secondary_effect: 0,
            },
            STACK_REQUEST_MINE_BLOCK => StackRequestAction::MineBlock {
                hot_bar_slot: 0,
                predicted_durability: 0,
                stack_network_id: 0,
            },
            STACK_REQUEST_CRAFT_RECIPE => StackRequestAction::CraftRecipe {
                recipe_network_id: 0,
            },
            STACK_REQUEST_CRAFT_RECIPE_AUTO => StackRequestAction::AutoCraftRecipe {
                recipe_network_id: 0,
                times_crafted: 0,
                ingredients: Vec::new(),
            },
            STACK_REQUEST_CRAFT_CREATIVE => StackRequestAction::CraftCreative {
                creative_item_network_id: 0,
            },
            STACK_REQUEST_CRAFT_RECIPE_OPTIONAL => StackRequestAction::CraftRecipeOptional {
                recipe_network_id: 0,
                filter_string_index: 0,
            },
            STACK_REQUEST_CRAFT_GRINDSTONE => StackRequestAction::CraftGrindstone {
                recipe_network_id: 0,
                cost: 0,
            },
            STACK_REQUEST_CRAFT_LOOM => StackRequestAction::CraftLoom {
                pattern: String::new(),
            },
            STACK_REQUEST_CRAFT_NON_IMPLEMENTED => StackRequestAction::CraftNonImplemented,
            STACK_REQUEST_CRAFT_RESULTS_DEPRECATED => {
                StackRequestAction::CraftResultsDeprecated(Default::default())
            }
            other => return Err(io.unknown_enum_option(other as i64, "stack request action type")),
        })
    }
}

impl Marshal for StackRequestAction {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        let mut id = self.type_id();
        io.u8(&mut id)?;
        if io.reads() {
            *self = StackRequestAction::empty(id, io)?;
        }
        match self {
            StackRequestAction::Take(a)
            | StackRequestAction::Place(a)
            | StackRequestAction::PlaceInContainer(a)
            | StackRequestAction::TakeOutContainer(a) => a.marshal(io),
            StackRequestAction::Swap(a) => a.marshal(io),
            StackRequestAction::Drop(a) => a.marshal(io),
            StackRequestAction::Destroy(a) | StackRequestAction::Consume(a) => a.marshal(io),
            StackRequestAction::Create { results_slot } => io.u8(results_slot),
            StackRequestAction::LabTableCombine | StackRequestAction::CraftNonImplemented => Ok(()),
            StackRequestAction::BeaconPayment {
                primary_effect,
                secondary_effect,
            } => {
                io.varint32(primary_effect)?;
                io.varint32(secondary_effect)
            }
            StackRequestAction::MineBlock {
                hot_bar_slot,
                predicted_durability,
                stack_network_id,
            } => {
                io.varint32(hot_bar_slot)?;
                io.varint32(predicted_durability)?;
                io.varint32(stack_network_id)
            }
            StackRequestAction::CraftRecipe { recipe_network_id } => io.varuint32(recipe_network_id),
            StackRequestAction::AutoCraftRecipe {
                recipe_network_id,
                times_crafted,
                ingredients,
            } => {
                io.varuint32(recipe_network_id)?;
                io.u8(times_crafted)?;
                slice(io, ingredients)
            }
            StackRequestAction::CraftCreative {
                creative_item_network_id,
            } => io.varuint32(creative_item_network_id),
            StackRequestAction::CraftRecipeOptional {
                recipe_network_id,
                filter_string_index,
            } => {
                io.varuint32(recipe_network_id)?;
                io.i32(filter_string_index)
            }
            StackRequestAction::CraftGrindstone {
                recipe_network_id,
                cost,
            } => {
                io.varuint32(recipe_network_id)?;
                io.varint32(cost)
            }
            StackRequestAction::CraftLoom { pattern } => io.string(pattern),
            StackRequestAction::CraftResultsDeprecated(a) => a.marshal(io),
        }
    }
}

fn transfer(a: TransferAction<StackRequestSlotInfo>) -> TransferAction<latest::StackRequestSlotInfo> {
    TransferAction {
        count: a.count,
        source: a.source.into(),
        destination: a.destination.into(),
    }
}

fn destroy(a: DestroyAction<StackRequestSlotInfo>) -> DestroyAction<latest::StackRequestSlotInfo> {
    DestroyAction {
        count: a.count,
        source: a.source.into(),
    }
}

/// Older clients craft one at a time.
impl From<StackRequestAction> for latest::StackRequestAction {
    fn from(action: StackRequestAction) -> Self {
        use latest::StackRequestAction as Latest;
        match action {
            StackRequestAction::Take(a) => Latest::Take(transfer(a)),
            StackRequestAction::Place(a) => Latest::Place(transfer(a)),
            StackRequestAction::Swap(a) => Latest::Swap(SwapAction {
                source: a.source.into(),
                destination: a.destination.into(),
            }),
            StackRequestAction::Drop(a) => Latest::Drop(DropAction {
                count: a.count,
                source: a.source.into(),
                randomly: a.randomly,
            }),
            StackRequestAction::Destroy(a) => Latest::Destroy(destroy(a)),
            StackRequestAction::Consume(a) => Latest::Consume(destroy(a)),
            StackRequestAction::Create { results_slot } => Latest::Create { results_slot },
            StackRequestAction::PlaceInContainer(a) => Latest::PlaceInContainer(transfer(a)),
            StackRequestAction::TakeOutContainer(a) => Latest::TakeOutContainer(transfer(a)),
            StackRequestAction::LabTableCombine => Latest::LabTableCombine,
            StackRequestAction::BeaconPayment {
                primary_effect,
                secondary_effect,
            } => Latest::BeaconPayment {
                primary_effect,
                secondary_effect,
            },
            StackRequestAction::MineBlock {
                hot_bar_slot,
                predicted_durability,
                stack_network_id,
            } => Latest::MineBlock {
                hot_bar_slot,
                predicted_durability,
                stack_network_id,
            },
            StackRequestAction::CraftRecipe { recipe_network_id } => Latest::CraftRecipe {
                recipe_network_id,
                number_of_crafts: 1,
            },
            StackRequestAction::AutoCraftRecipe {
                recipe_network_id,
                times_crafted,
                ingredients,
            } => Latest::AutoCraftRecipe {
                recipe_network_id,
                number_of_crafts: 1,
                times_crafted,
                ingredients,
            },
            StackRequestAction::CraftCreative {
                creative_item_network_id,
            } => Latest::CraftCreative {
                creative_item_network_id,
                number_of_crafts: 1,
            },
            StackRequestAction::CraftRecipeOptional {
                recipe_network_id,
                filter_string_index,
            } => Latest::CraftRecipeOptional {
                recipe_network_id,
                number_of_crafts: 1,
                filter_string_index,
            },
            StackRequestAction::CraftGrindstone {
                recipe_network_id,
                cost,
            } => Latest::CraftGrindstone {
                recipe_network_id,
                number_of_crafts: 1,
                cost,
            },
            StackRequestAction::CraftLoom { pattern } => Latest::CraftLoom { pattern },
            StackRequestAction::CraftNonImplemented => Latest::CraftNonImplemented,
            StackRequestAction::CraftResultsDeprecated(a) => Latest::CraftResultsDeprecated(a),
        }
    }
}

/// A changed slot. This layout has no filtered custom name, and the client
/// rejects a slot that differs from the hotbar slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackResponseSlotInfo {
    pub slot: u8,
    pub hotbar_slot: u8,
    pub count: u8,
    pub stack_network_id: i32,
    pub custom_name: String,
    pub durability_correction: i32,
}

impl Marshal for StackResponseSlotInfo {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.slot)?;
        io.u8(&mut self.hotbar_slot)?;
        io.u8(&mut self.count)?;
        io.varint32(&mut self.stack_network_id)?;
        if self.slot != self.hotbar_slot {
            return Err(io.invalid_value(
                "hotbar slot",
                format!("{} must equal slot {}", self.hotbar_slot, self.slot),
            ));
        }
        io.string(&mut self.custom_name)?;
        io.varint32(&mut self.durability_correction)
    }
}

impl From<latest::StackResponseSlotInfo> for StackResponseSlotInfo {
    fn from(info: latest::StackResponseSlotInfo) -> Self {
        StackResponseSlotInfo {
            slot: info.slot,
            hotbar_slot: info.hotbar_slot,
            count: info.count,
            stack_network_id: info.stack_network_id,
            custom_name: info.custom_name,
            durability_correction: info.durability_correction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackResponseContainerInfo {
    pub container_id: u8,
    pub slot_info: Vec<StackResponseSlotInfo>,
}

impl Marshal for StackResponseContainerInfo {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.container_id)?;
        slice(io, &mut self.slot_info)
    }
}

impl From<latest::StackResponseContainerInfo> for StackResponseContainerInfo {
    fn from(info: latest::StackResponseContainerInfo) -> Self {
        StackResponseContainerInfo {
            container_id: info.container.container_id,
            slot_info: info.slot_info.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use crossgrade_protocol_core::{CodecError, Reader, Writer};
    use crossgrade_types::ItemStack;

    fn encode(value: &mut impl Marshal) -> CodecResult<BytesMut> {
        let mut buf = BytesMut::new();
        value.marshal(&mut Writer::new(&mut buf))?;
        Ok(buf)
    }

    #[test]
    fn test_craft_actions_upgrade_with_one_craft() {
        let grind: latest::StackRequestAction = StackRequestAction::CraftGrindstone {
            recipe_network_id: 9,
            cost: 3,
        }
        .into();
        assert_eq!(
            grind,
            latest::StackRequestAction::CraftGrindstone {
                recipe_network_id: 9,
                number_of_crafts: 1,
                cost: 3,
            }
        );
    }

    #[test]
    fn test_container_actions_keep_slots() {
        let slot = |container_id| StackRequestSlotInfo {
            container_id,
            slot: 4,
            stack_network_id: -2,
        };
        let action: latest::StackRequestAction = StackRequestAction::TakeOutContainer(TransferAction {
            count: 5,
            source: slot(58),
            destination: slot(12),
        })
        .into();
        let latest::StackRequestAction::TakeOutContainer(a) = action else {
            panic!("wrong action {:?}", action);
        };
        assert_eq!(a.count, 5);
        assert_eq!(a.source.container, FullContainerName::new(58));
        assert_eq!(a.destination.slot, 4);
    }

    #[test]
    fn test_action_codec() {
        let mut action = StackRequestAction::CraftRecipeOptional {
            recipe_network_id: 41,
            filter_string_index: 0,
        };
        let buf = encode(&mut action).unwrap();
        // id, varuint 41, i32
        assert_eq!(buf.len(), 6);
        let mut back = StackRequestAction::default();
        back.marshal(&mut Reader::new(&buf)).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_slot_must_equal_hotbar_slot() {
        let mut info = StackResponseSlotInfo {
            slot: 3,
            hotbar_slot: 4,
            count: 1,
            ..Default::default()
        };
        assert!(matches!(encode(&mut info), Err(CodecError::InvalidValue { .. })));

        info.hotbar_slot = 3;
        let buf = encode(&mut info).unwrap();
        let mut bytes = buf.to_vec();
        bytes[1] = 7;
        let mut back = StackResponseSlotInfo::default();
        assert!(matches!(
            back.marshal(&mut Reader::new(&bytes)),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_use_item_upgrade() {
        let data = UseItemTransactionData {
            action_type: 1,
            held_item: ItemInstance::new(ItemStack::new(5, 1)),
            block_runtime_id: 9,
            ..Default::default()
        };
        let up = data.clone().upgrade(latest::TRIGGER_TYPE_UNKNOWN, latest::CLIENT_PREDICTION_SUCCESS);
        assert_eq!(up.held_item, data.held_item);
        assert_eq!(up.block_runtime_id, 9);
        assert_eq!(up.client_prediction, latest::CLIENT_PREDICTION_SUCCESS);
    }
}
