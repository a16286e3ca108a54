use crate::codec::{func_slice, optional, slice, CodecResult, Io, Marshal};
use crate::item::{item, ItemDescriptorCount};
use crossgrade_types::{BlockPos, ItemInstance, ItemStack, Vec3};

pub const INVENTORY_ACTION_SOURCE_CONTAINER: u32 = 0;
pub const INVENTORY_ACTION_SOURCE_WORLD: u32 = 2;
pub const INVENTORY_ACTION_SOURCE_CREATIVE: u32 = 3;
pub const INVENTORY_ACTION_SOURCE_TODO: u32 = 99999;

/// A single slot change inside an inventory transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryAction {
    pub source_type: u32,
    pub window_id: i32,
    pub source_flags: u32,
    pub inventory_slot: u32,
    pub old_item: ItemInstance,
    pub new_item: ItemInstance,
}

impl Marshal for InventoryAction {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.source_type)?;
        match self.source_type {
            INVENTORY_ACTION_SOURCE_CONTAINER | INVENTORY_ACTION_SOURCE_TODO => {
                io.varint32(&mut self.window_id)?
            }
            INVENTORY_ACTION_SOURCE_WORLD => io.varuint32(&mut self.source_flags)?,
            _ => {}
        }
        io.varuint32(&mut self.inventory_slot)?;
        self.old_item.marshal(io)?;
        self.new_item.marshal(io)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacySetItemSlot {
    pub container_id: u8,
    pub slots: Vec<u8>,
}

impl Marshal for LegacySetItemSlot {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.container_id)?;
        io.byte_slice(&mut self.slots)
    }
}

pub const TRIGGER_TYPE_UNKNOWN: u32 = 0;
pub const TRIGGER_TYPE_PLAYER_INPUT: u32 = 1;
pub const TRIGGER_TYPE_SIMULATION_TICK: u32 = 2;

pub const CLIENT_PREDICTION_FAILURE: u32 = 0;
pub const CLIENT_PREDICTION_SUCCESS: u32 = 1;

/// Using an item, optionally on a block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseItemTransactionData {
    pub action_type: u32,
    pub trigger_type: u32,
    pub block_position: BlockPos,
    pub block_face: i32,
    pub hot_bar_slot: i32,
    pub held_item: ItemInstance,
    pub position: Vec3,
    pub clicked_position: Vec3,
    pub block_runtime_id: u32,
    pub client_prediction: u32,
}

impl UseItemTransactionData {
    /// Codes the fields, with the block position in the given form. Inventory
    /// transactions use an unsigned y, player input a signed one.
    pub fn marshal_with(&mut self, io: &mut dyn Io, unsigned_y: bool) -> CodecResult<()> {
        io.varuint32(&mut self.action_type)?;
        io.varuint32(&mut self.trigger_type)?;
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
        io.varuint32(&mut self.block_runtime_id)?;
        io.varuint32(&mut self.client_prediction)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseItemOnEntityTransactionData {
    pub target_entity_runtime_id: u64,
    pub action_type: u32,
    pub hot_bar_slot: i32,
    pub held_item: ItemInstance,
    pub position: Vec3,
    pub clicked_position: Vec3,
}

impl Marshal for UseItemOnEntityTransactionData {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.target_entity_runtime_id)?;
        io.varuint32(&mut self.action_type)?;
        io.varint32(&mut self.hot_bar_slot)?;
        self.held_item.marshal(io)?;
        io.vec3(&mut self.position)?;
        io.vec3(&mut self.clicked_position)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseItemTransactionData {
    pub action_type: u32,
    pub hot_bar_slot: i32,
    pub held_item: ItemInstance,
    pub head_position: Vec3,
}

impl Marshal for ReleaseItemTransactionData {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.action_type)?;
        io.varint32(&mut self.hot_bar_slot)?;
        self.held_item.marshal(io)?;
        io.vec3(&mut self.head_position)
    }
}

pub const TRANSACTION_NORMAL: u32 = 0;
pub const TRANSACTION_MISMATCH: u32 = 1;
pub const TRANSACTION_USE_ITEM: u32 = 2;
pub const TRANSACTION_USE_ITEM_ON_ENTITY: u32 = 3;
pub const TRANSACTION_RELEASE_ITEM: u32 = 4;

/// The type-specific tail of an inventory transaction, generic over the
/// use-item layout so older layouts can share the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TransactionData<U> {
    #[default]
    Normal,
    Mismatch,
    UseItem(U),
    UseItemOnEntity(UseItemOnEntityTransactionData),
    ReleaseItem(ReleaseItemTransactionData),
}

impl<U> TransactionData<U> {
    pub fn type_id(&self) -> u32 {
        match self {
            TransactionData::Normal => TRANSACTION_NORMAL,
            TransactionData::Mismatch => TRANSACTION_MISMATCH,
            TransactionData::UseItem(_) => TRANSACTION_USE_ITEM,
            TransactionData::UseItemOnEntity(_) => TRANSACTION_USE_ITEM_ON_ENTITY,
            TransactionData::ReleaseItem(_) => TRANSACTION_RELEASE_ITEM,
        }
    }

    /// Replaces `self` with an empty variant for `id`.
    pub fn reset(&mut self, id: u32, io: &dyn Io) -> CodecResult<()>
    where
        U: Default,
    {
        *self = match id {
            TRANSACTION_NORMAL => TransactionData::Normal,
            TRANSACTION_MISMATCH => TransactionData::Mismatch,
            TRANSACTION_USE_ITEM => TransactionData::UseItem(U::default()),
            TRANSACTION_USE_ITEM_ON_ENTITY => TransactionData::UseItemOnEntity(Default::default()),
            TRANSACTION_RELEASE_ITEM => TransactionData::ReleaseItem(Default::default()),
            other => return Err(io.unknown_enum_option(other as i64, "inventory transaction type")),
        };
        Ok(())
    }

    /// Converts the use-item payload, keeping every other variant as is.
    pub fn map_use_item<V>(self, f: impl FnOnce(U) -> V) -> TransactionData<V> {
        match self {
            TransactionData::Normal => TransactionData::Normal,
            TransactionData::Mismatch => TransactionData::Mismatch,
            TransactionData::UseItem(data) => TransactionData::UseItem(f(data)),
            TransactionData::UseItemOnEntity(data) => TransactionData::UseItemOnEntity(data),
            TransactionData::ReleaseItem(data) => TransactionData::ReleaseItem(data),
        }
    }
}

/// Inventory transaction, generic over the use-item layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryTransaction<U = UseItemTransactionData> {
    pub legacy_request_id: i32,
    pub legacy_set_item_slots: Vec<LegacySetItemSlot>,
    pub actions: Vec<InventoryAction>,
    pub transaction_data: TransactionData<U>,
}

impl<U: Default> InventoryTransaction<U> {
    /// Codes the packet, using `use_item` for the use-item payload.
    pub fn marshal_with(
        &mut self,
        io: &mut dyn Io,
        use_item: impl FnOnce(&mut U, &mut dyn Io) -> CodecResult<()>,
    ) -> CodecResult<()> {
        io.varint32(&mut self.legacy_request_id)?;
        if self.legacy_request_id != 0 {
            slice(io, &mut self.legacy_set_item_slots)?;
        }
        let mut type_id = self.transaction_data.type_id();
        io.varuint32(&mut type_id)?;
        if io.reads() {
            self.transaction_data.reset(type_id, io)?;
        }
        slice(io, &mut self.actions)?;
        match &mut self.transaction_data {
            TransactionData::Normal | TransactionData::Mismatch => Ok(()),
            TransactionData::UseItem(data) => use_item(data, io),
            TransactionData::UseItemOnEntity(data) => data.marshal(io),
            TransactionData::ReleaseItem(data) => data.marshal(io),
        }
    }
}

impl Marshal for InventoryTransaction {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_with(io, |data, io| data.marshal_with(io, true))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobEquipment {
    pub entity_runtime_id: u64,
    pub new_item: ItemInstance,
    pub inventory_slot: u8,
    pub hot_bar_slot: u8,
    pub window_id: u8,
}

impl Marshal for MobEquipment {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.entity_runtime_id)?;
        self.new_item.marshal(io)?;
        io.u8(&mut self.inventory_slot)?;
        io.u8(&mut self.hot_bar_slot)?;
        io.u8(&mut self.window_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobArmourEquipment {
    pub entity_runtime_id: u64,
    pub helmet: ItemInstance,
    pub chestplate: ItemInstance,
    pub leggings: ItemInstance,
    pub boots: ItemInstance,
    pub body: ItemInstance,
}

impl Marshal for MobArmourEquipment {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint64(&mut self.entity_runtime_id)?;
        self.helmet.marshal(io)?;
        self.chestplate.marshal(io)?;
        self.leggings.marshal(io)?;
        self.boots.marshal(io)?;
        self.body.marshal(io)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryContent {
    pub window_id: u32,
    pub content: Vec<ItemInstance>,
    pub dynamic_container_size: u32,
}

impl Marshal for InventoryContent {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.window_id)?;
        slice(io, &mut self.content)?;
        io.varuint32(&mut self.dynamic_container_size)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySlot {
    pub window_id: u32,
    pub slot: u32,
    pub dynamic_container_size: u32,
    pub new_item: ItemInstance,
}

impl Marshal for InventorySlot {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.window_id)?;
        io.varuint32(&mut self.slot)?;
        io.varuint32(&mut self.dynamic_container_size)?;
        self.new_item.marshal(io)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreativeItem {
    pub creative_item_network_id: u32,
    pub item: ItemStack,
}

impl Marshal for CreativeItem {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varuint32(&mut self.creative_item_network_id)?;
        item(io, &mut self.item)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreativeContent {
    pub items: Vec<CreativeItem>,
}

impl Marshal for CreativeContent {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        slice(io, &mut self.items)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerClose {
    pub window_id: u8,
    pub container_type: u8,
    pub server_side: bool,
}

impl Marshal for ContainerClose {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.window_id)?;
        io.u8(&mut self.container_type)?;
        io.bool(&mut self.server_side)
    }
}

/// A container, with the ID of the dynamic container it refers to, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FullContainerName {
    pub container_id: u8,
    pub dynamic_container_id: Option<u32>,
}

impl FullContainerName {
    pub fn new(container_id: u8) -> Self {
        Self {
            container_id,
            dynamic_container_id: None,
        }
    }
}

impl Marshal for FullContainerName {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.container_id)?;
        optional(io, &mut self.dynamic_container_id, |io, id| io.u32(id))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackRequestSlotInfo {
    pub container: FullContainerName,
    pub slot: u8,
    pub stack_network_id: i32,
}

impl Marshal for StackRequestSlotInfo {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.container.marshal(io)?;
        io.u8(&mut self.slot)?;
        io.varint32(&mut self.stack_network_id)
    }
}

/// Moves `count` items between two slots. Take, place and the container
/// transfer actions share this layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferAction<S> {
    pub count: u8,
    pub source: S,
    pub destination: S,
}

impl<S: Marshal> Marshal for TransferAction<S> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.count)?;
        self.source.marshal(io)?;
        self.destination.marshal(io)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapAction<S> {
    pub source: S,
    pub destination: S,
}

impl<S: Marshal> Marshal for SwapAction<S> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.source.marshal(io)?;
        self.destination.marshal(io)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropAction<S> {
    pub count: u8,
    pub source: S,
    pub randomly: bool,
}

impl<S: Marshal> Marshal for DropAction<S> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.count)?;
        self.source.marshal(io)?;
        io.bool(&mut self.randomly)
    }
}

/// Destroys or consumes `count` items from a slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestroyAction<S> {
    pub count: u8,
    pub source: S,
}

impl<S: Marshal> Marshal for DestroyAction<S> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.count)?;
        self.source.marshal(io)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CraftResultsDeprecatedAction {
    pub result_items: Vec<ItemStack>,
    pub times_crafted: u8,
}

impl Marshal for CraftResultsDeprecatedAction {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        func_slice(io, &mut self.result_items, item)?;
        io.u8(&mut self.times_crafted)
    }
}

pub const STACK_REQUEST_TAKE: u8 = 0;
pub const STACK_REQUEST_PLACE: u8 = 1;
pub const STACK_REQUEST_SWAP: u8 = 2;
pub const STACK_REQUEST_DROP: u8 = 3;
pub const STACK_REQUEST_DESTROY: u8 = 4;
pub const STACK_REQUEST_CONSUME: u8 = 5;
pub const STACK_REQUEST_CREATE: u8 = 6;
pub const STACK_REQUEST_PLACE_IN_CONTAINER: u8 = 7;
pub const STACK_REQUEST_TAKE_OUT_CONTAINER: u8 = 8;
pub const STACK_REQUEST_LAB_TABLE_COMBINE: u8 = 9;
pub const STACK_REQUEST_BEACON_PAYMENT: u8 = 10;
pub const STACK_REQUEST_MINE_BLOCK: u8 = 11;
pub const STACK_REQUEST_CRAFT_RECIPE: u8 = 12;
pub const STACK_REQUEST_CRAFT_RECIPE_AUTO: u8 = 13;
pub const STACK_REQUEST_CRAFT_CREATIVE: u8 = 14;
pub const STACK_REQUEST_CRAFT_RECIPE_OPTIONAL: u8 = 15;
pub const STACK_REQUEST_CRAFT_GRINDSTONE: u8 = 16;
pub const STACK_REQUEST_CRAFT_LOOM: u8 = 17;
pub const STACK_REQUEST_CRAFT_NON_IMPLEMENTED: u8 = 18;
pub const STACK_REQUEST_CRAFT_RESULTS_DEPRECATED: u8 = 19;

/// An action inside an item stack request.
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
        number_of_crafts: u8,
    },
    AutoCraftRecipe {
        recipe_network_id: u32,
        number_of_crafts: u8,
        times_crafted: u8,
        ingredients: Vec<ItemDescriptorCount>,
    },
    CraftCreative {
        creative_item_network_id: u32,
        number_of_crafts: u8,
    },
    CraftRecipeOptional {
        recipe_network_id: u32,
        number_of_crafts: u8,
        filter_string_index: i32,
    },
    CraftGrindstone {
        recipe_network_id: u32,
        number_of_crafts: u8,
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
                number_of_crafts: 0,
            },
            STACK_REQUEST_CRAFT_RECIPE_AUTO => StackRequestAction::AutoCraftRecipe {
                recipe_network_id: 0,
                number_of_crafts: 0,
                times_crafted: 0,
                ingredients: Vec::new(),
            },
            STACK_REQUEST_CRAFT_CREATIVE => StackRequestAction::CraftCreative {
                creative_item_network_id: 0,
                number_of_crafts: 0,
            },
            STACK_REQUEST_CRAFT_RECIPE_OPTIONAL => StackRequestAction::CraftRecipeOptional {
                recipe_network_id: 0,
                number_of_crafts: 0,
                filter_string_index: 0,
            },
            STACK_REQUEST_CRAFT_GRINDSTONE => StackRequestAction::CraftGrindstone {
                recipe_network_id: 0,
                number_of_crafts: 0,
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
            StackRequestAction::CraftRecipe {
                recipe_network_id,
                number_of_crafts,
            } => {
                io.varuint32(recipe_network_id)?;
                io.u8(number_of_crafts)
            }
            StackRequestAction::AutoCraftRecipe {
                recipe_network_id,
                number_of_crafts,
                times_crafted,
                ingredients,
            } => {
                io.varuint32(recipe_network_id)?;
                io.u8(number_of_crafts)?;
                io.u8(times_crafted)?;
                slice(io, ingredients)
            }
            StackRequestAction::CraftCreative {
                creative_item_network_id,
                number_of_crafts,
            } => {
                io.varuint32(creative_item_network_id)?;
                io.u8(number_of_crafts)
            }
            StackRequestAction::CraftRecipeOptional {
                recipe_network_id,
                number_of_crafts,
                filter_string_index,
            } => {
                io.varuint32(recipe_network_id)?;
                io.u8(number_of_crafts)?;
                io.i32(filter_string_index)
            }
            StackRequestAction::CraftGrindstone {
                recipe_network_id,
                number_of_crafts,
                cost,
            } => {
                io.varuint32(recipe_network_id)?;
                io.u8(number_of_crafts)?;
                io.varint32(cost)
            }
            StackRequestAction::CraftLoom { pattern } => io.string(pattern),
            StackRequestAction::CraftResultsDeprecated(a) => a.marshal(io),
        }
    }
}

/// One request in an item stack request, generic over the action layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStackRequestEntry<A = StackRequestAction> {
    pub request_id: i32,
    pub actions: Vec<A>,
    pub filter_strings: Vec<String>,
    pub filter_cause: i32,
}

impl<A: Marshal + Default> Marshal for ItemStackRequestEntry<A> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.request_id)?;
        slice(io, &mut self.actions)?;
        func_slice(io, &mut self.filter_strings, |io, s| io.string(s))?;
        io.i32(&mut self.filter_cause)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStackRequest<A = StackRequestAction> {
    pub requests: Vec<ItemStackRequestEntry<A>>,
}

impl<A: Marshal + Default> Marshal for ItemStackRequest<A> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        slice(io, &mut self.requests)
    }
}

pub const ITEM_STACK_RESPONSE_STATUS_OK: u8 = 0;
pub const ITEM_STACK_RESPONSE_STATUS_ERROR: u8 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackResponseSlotInfo {
    pub slot: u8,
    pub hotbar_slot: u8,
    pub count: u8,
    pub stack_network_id: i32,
    pub custom_name: String,
    pub filtered_custom_name: String,
    pub durability_correction: i32,
}

impl Marshal for StackResponseSlotInfo {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.slot)?;
        io.u8(&mut self.hotbar_slot)?;
        io.u8(&mut self.count)?;
        io.varint32(&mut self.stack_network_id)?;
        io.string(&mut self.custom_name)?;
        io.string(&mut self.filtered_custom_name)?;
        io.varint32(&mut self.durability_correction)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackResponseContainerInfo {
    pub container: FullContainerName,
    pub slot_info: Vec<StackResponseSlotInfo>,
}

impl Marshal for StackResponseContainerInfo {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.container.marshal(io)?;
        slice(io, &mut self.slot_info)
    }
}

/// One response in an item stack response, generic over the container layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStackResponseEntry<C = StackResponseContainerInfo> {
    pub status: u8,
    pub request_id: i32,
    pub container_info: Vec<C>,
}

impl<C: Marshal + Default> Marshal for ItemStackResponseEntry<C> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.status)?;
        io.varint32(&mut self.request_id)?;
        if self.status == ITEM_STACK_RESPONSE_STATUS_OK {
            slice(io, &mut self.container_info)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStackResponse<C = StackResponseContainerInfo> {
    pub responses: Vec<ItemStackResponseEntry<C>>,
}

impl<C: Marshal + Default> Marshal for ItemStackResponse<C> {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        slice(io, &mut self.responses)
    }
}
