use crate::codec::{
    func_slice, slice, slice_u32, CodecResult, Io, Marshal, MAX_SLICE_LENGTH,
};
use crate::item::{item, ItemDescriptorCount};
use crossgrade_nbt::NbtValue;
use crossgrade_types::{BlockPos, ItemStack, Uuid, Vec3};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviourPackInfo {
    pub uuid: String,
    pub version: String,
    pub size: u64,
    pub content_key: String,
    pub sub_pack_name: String,
    pub content_identity: String,
    pub has_scripts: bool,
    pub addon_pack: bool,
}

impl BehaviourPackInfo {
    fn marshal_with(&mut self, io: &mut dyn Io, addon_pack: bool) -> CodecResult<()> {
        io.string(&mut self.uuid)?;
        io.string(&mut self.version)?;
        io.u64(&mut self.size)?;
        io.string(&mut self.content_key)?;
        io.string(&mut self.sub_pack_name)?;
        io.string(&mut self.content_identity)?;
        io.bool(&mut self.has_scripts)?;
        if addon_pack {
            io.bool(&mut self.addon_pack)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TexturePackInfo {
    pub info: BehaviourPackInfo,
    pub rtx_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackUrl {
    pub uuid_version: String,
    pub url: String,
}

impl Marshal for PackUrl {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.uuid_version)?;
        io.string(&mut self.url)
    }
}

/// Which optional resource pack fields a layout carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacksInfoLayout {
    pub has_addons: bool,
    pub addon_pack: bool,
}

impl PacksInfoLayout {
    pub const LATEST: PacksInfoLayout = PacksInfoLayout {
        has_addons: true,
        addon_pack: true,
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePacksInfo {
    pub texture_pack_required: bool,
    pub has_addons: bool,
    pub has_scripts: bool,
    pub forcing_server_packs: bool,
    pub behaviour_packs: Vec<BehaviourPackInfo>,
    pub texture_packs: Vec<TexturePackInfo>,
    pub pack_urls: Vec<PackUrl>,
}

impl ResourcePacksInfo {
    pub fn marshal_with(&mut self, io: &mut dyn Io, layout: PacksInfoLayout) -> CodecResult<()> {
        io.bool(&mut self.texture_pack_required)?;
        if layout.has_addons {
            io.bool(&mut self.has_addons)?;
        }
        io.bool(&mut self.has_scripts)?;
        io.bool(&mut self.forcing_server_packs)?;
        func_slice(io, &mut self.behaviour_packs, |io, p| {
            p.marshal_with(io, layout.addon_pack)
        })?;
        func_slice(io, &mut self.texture_packs, |io, p| {
            p.info.marshal_with(io, layout.addon_pack)?;
            io.bool(&mut p.rtx_enabled)
        })?;
        slice(io, &mut self.pack_urls)
    }
}

impl Marshal for ResourcePacksInfo {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_with(io, PacksInfoLayout::LATEST)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackResourcePack {
    pub uuid: String,
    pub version: String,
    pub sub_pack_name: String,
}

impl Marshal for StackResourcePack {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.uuid)?;
        io.string(&mut self.version)?;
        io.string(&mut self.sub_pack_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentData {
    pub name: String,
    pub enabled: bool,
}

impl ExperimentData {
    pub fn enabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
        }
    }
}

impl Marshal for ExperimentData {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.name)?;
        io.bool(&mut self.enabled)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePackStack {
    pub texture_pack_required: bool,
    pub behaviour_packs: Vec<StackResourcePack>,
    pub texture_packs: Vec<StackResourcePack>,
    pub base_game_version: String,
    pub experiments: Vec<ExperimentData>,
    pub experiments_previously_toggled: bool,
    pub include_editor_packs: bool,
}

impl ResourcePackStack {
    /// Codes the packet. Older layouts do not send the editor packs flag.
    pub fn marshal_with(&mut self, io: &mut dyn Io, editor_packs: bool) -> CodecResult<()> {
        io.bool(&mut self.texture_pack_required)?;
        slice(io, &mut self.behaviour_packs)?;
        slice(io, &mut self.texture_packs)?;
        io.string(&mut self.base_game_version)?;
        slice_u32(io, &mut self.experiments)?;
        io.bool(&mut self.experiments_previously_toggled)?;
        if editor_packs {
            io.bool(&mut self.include_editor_packs)?;
        }
        Ok(())
    }
}

impl Marshal for ResourcePackStack {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_with(io, true)
    }
}

/// A custom block state sent in the start game block table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockEntry {
    pub name: String,
    pub properties: NbtValue,
}

impl Marshal for BlockEntry {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.name)?;
        io.nbt(&mut self.properties)
    }
}

/// Associates an item name with its runtime ID.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemEntry {
    pub name: String,
    pub runtime_id: i16,
    pub component_based: bool,
}

impl Marshal for ItemEntry {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.name)?;
        io.i16(&mut self.runtime_id)?;
        io.bool(&mut self.component_based)
    }
}

/// Sent once on join. Only the fields that protocol translation touches are
/// broken out; the level settings follow the wire order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartGame {
    pub entity_unique_id: i64,
    pub entity_runtime_id: u64,
    pub player_game_mode: i32,
    pub player_position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub world_seed: i64,
    pub dimension: i32,
    pub world_game_mode: i32,
    pub difficulty: i32,
    pub world_spawn: BlockPos,
    pub experiments: Vec<ExperimentData>,
    pub experiments_previously_toggled: bool,
    pub level_id: String,
    pub world_name: String,
    pub template_content_identity: String,
    pub time: i64,
    pub enchantment_seed: i32,
    pub blocks: Vec<BlockEntry>,
    pub items: Vec<ItemEntry>,
    pub multiplayer_correlation_id: String,
    pub server_authoritative_inventory: bool,
    pub game_version: String,
    pub property_data: NbtValue,
    pub server_block_state_checksum: u64,
    pub world_template_id: Uuid,
    pub client_side_generation: bool,
    pub use_block_network_id_hashes: bool,
    pub server_authoritative_sound: bool,
    pub server_id: String,
    pub world_id: String,
    pub scenario_id: String,
}

impl StartGame {
    /// Codes every field up to the trailing server, world and scenario IDs.
    pub fn marshal_base(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint64(&mut self.entity_unique_id)?;
        io.varuint64(&mut self.entity_runtime_id)?;
        io.varint32(&mut self.player_game_mode)?;
        io.vec3(&mut self.player_position)?;
        io.f32(&mut self.pitch)?;
        io.f32(&mut self.yaw)?;
        io.i64(&mut self.world_seed)?;
        io.varint32(&mut self.dimension)?;
        io.varint32(&mut self.world_game_mode)?;
        io.varint32(&mut self.difficulty)?;
        io.block_pos(&mut self.world_spawn)?;
        slice_u32(io, &mut self.experiments)?;
        io.bool(&mut self.experiments_previously_toggled)?;
        io.string(&mut self.level_id)?;
        io.string(&mut self.world_name)?;
        io.string(&mut self.template_content_identity)?;
        io.i64(&mut self.time)?;
        io.varint32(&mut self.enchantment_seed)?;
        slice(io, &mut self.blocks)?;
        slice(io, &mut self.items)?;
        io.string(&mut self.multiplayer_correlation_id)?;
        io.bool(&mut self.server_authoritative_inventory)?;
        io.string(&mut self.game_version)?;
        io.nbt(&mut self.property_data)?;
        io.u64(&mut self.server_block_state_checksum)?;
        io.uuid(&mut self.world_template_id)?;
        io.bool(&mut self.client_side_generation)?;
        io.bool(&mut self.use_block_network_id_hashes)?;
        io.bool(&mut self.server_authoritative_sound)
    }
}

impl Marshal for StartGame {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_base(io)?;
        io.string(&mut self.server_id)?;
        io.string(&mut self.world_id)?;
        io.string(&mut self.scenario_id)
    }
}

pub const COMMAND_ARG_VALID: u32 = 0x100000;
pub const COMMAND_ARG_ENUM: u32 = 0x200000;
pub const COMMAND_ARG_SUFFIXED: u32 = 0x1000000;
pub const COMMAND_ARG_SOFT_ENUM: u32 = 0x4000000;

pub const COMMAND_ARG_TYPE_INT: u32 = 1;
pub const COMMAND_ARG_TYPE_FLOAT: u32 = 3;
pub const COMMAND_ARG_TYPE_VALUE: u32 = 4;
pub const COMMAND_ARG_TYPE_WILDCARD_INT: u32 = 5;
pub const COMMAND_ARG_TYPE_OPERATOR: u32 = 6;
pub const COMMAND_ARG_TYPE_COMPARE_OPERATOR: u32 = 7;
pub const COMMAND_ARG_TYPE_TARGET: u32 = 8;
pub const COMMAND_ARG_TYPE_WILDCARD_TARGET: u32 = 10;
pub const COMMAND_ARG_TYPE_FILEPATH: u32 = 17;
pub const COMMAND_ARG_TYPE_FULL_INTEGER_RANGE: u32 = 23;
pub const COMMAND_ARG_TYPE_EQUIPMENT_SLOTS: u32 = 47;
pub const COMMAND_ARG_TYPE_STRING: u32 = 56;
pub const COMMAND_ARG_TYPE_BLOCK_POSITION: u32 = 64;
pub const COMMAND_ARG_TYPE_POSITION: u32 = 65;
pub const COMMAND_ARG_TYPE_MESSAGE: u32 = 68;
pub const COMMAND_ARG_TYPE_RAW_TEXT: u32 = 70;
pub const COMMAND_ARG_TYPE_JSON: u32 = 74;
pub const COMMAND_ARG_TYPE_BLOCK_STATES: u32 = 84;
pub const COMMAND_ARG_TYPE_COMMAND: u32 = 87;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandParameter {
    pub name: String,
    pub parameter_type: u32,
    pub optional: bool,
    pub options: u8,
}

impl CommandParameter {
    /// Whether the type refers to an enum, soft enum or suffix rather than a basic argument.
    pub fn is_indexed(&self) -> bool {
        self.parameter_type & (COMMAND_ARG_ENUM | COMMAND_ARG_SOFT_ENUM | COMMAND_ARG_SUFFIXED)
            != 0
    }
}

impl Marshal for CommandParameter {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.name)?;
        io.u32(&mut self.parameter_type)?;
        io.bool(&mut self.optional)?;
        io.u8(&mut self.options)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOverload {
    pub chaining: bool,
    pub parameters: Vec<CommandParameter>,
}

impl Marshal for CommandOverload {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.bool(&mut self.chaining)?;
        slice(io, &mut self.parameters)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub flags: u16,
    pub permission_level: u8,
    pub aliases_offset: u32,
    pub chained_subcommand_offsets: Vec<u16>,
    pub overloads: Vec<CommandOverload>,
}

impl Marshal for Command {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.name)?;
        io.string(&mut self.description)?;
        io.u16(&mut self.flags)?;
        io.u8(&mut self.permission_level)?;
        io.u32(&mut self.aliases_offset)?;
        func_slice(io, &mut self.chained_subcommand_offsets, |io, o| io.u16(o))?;
        slice(io, &mut self.overloads)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandEnum {
    pub type_name: String,
    /// Indices into the packet's enum values.
    pub value_indices: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainedSubcommandValue {
    pub index: u16,
    pub value: u16,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainedSubcommand {
    pub name: String,
    pub values: Vec<ChainedSubcommandValue>,
}

impl Marshal for ChainedSubcommand {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.name)?;
        func_slice(io, &mut self.values, |io, v| {
            io.u16(&mut v.index)?;
            io.u16(&mut v.value)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicEnum {
    pub type_name: String,
    pub values: Vec<String>,
}

impl Marshal for DynamicEnum {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.type_name)?;
        func_slice(io, &mut self.values, |io, v| io.string(v))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandEnumConstraint {
    pub enum_value_index: u32,
    pub enum_index: u32,
    pub constraints: Vec<u8>,
}

impl Marshal for CommandEnumConstraint {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u32(&mut self.enum_value_index)?;
        io.u32(&mut self.enum_index)?;
        io.byte_slice(&mut self.constraints)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailableCommands {
    pub enum_values: Vec<String>,
    pub chained_subcommand_values: Vec<String>,
    pub suffixes: Vec<String>,
    pub enums: Vec<CommandEnum>,
    pub chained_subcommands: Vec<ChainedSubcommand>,
    pub commands: Vec<Command>,
    pub dynamic_enums: Vec<DynamicEnum>,
    pub constraints: Vec<CommandEnumConstraint>,
}

impl Marshal for AvailableCommands {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        func_slice(io, &mut self.enum_values, |io, v| io.string(v))?;
        func_slice(io, &mut self.chained_subcommand_values, |io, v| io.string(v))?;
        func_slice(io, &mut self.suffixes, |io, v| io.string(v))?;

        // The width of enum value indices depends on how many values there are.
        let value_count = self.enum_values.len();
        func_slice(io, &mut self.enums, |io, e| {
            io.string(&mut e.type_name)?;
            func_slice(io, &mut e.value_indices, |io, index| {
                if value_count <= u8::MAX as usize {
                    let mut v = *index as u8;
                    io.u8(&mut v)?;
                    *index = v as u32;
                } else if value_count <= u16::MAX as usize {
                    let mut v = *index as u16;
                    io.u16(&mut v)?;
                    *index = v as u32;
                } else {
                    io.u32(index)?;
                }
                Ok(())
            })
        })?;

        slice(io, &mut self.chained_subcommands)?;
        slice(io, &mut self.commands)?;
        slice(io, &mut self.dynamic_enums)?;
        slice(io, &mut self.constraints)
    }
}

pub const RECIPE_SHAPELESS: i32 = 0;
pub const RECIPE_SHAPED: i32 = 1;
pub const RECIPE_FURNACE: i32 = 2;
pub const RECIPE_FURNACE_DATA: i32 = 3;
pub const RECIPE_MULTI: i32 = 4;
pub const RECIPE_SHULKER_BOX: i32 = 5;
pub const RECIPE_SHAPELESS_CHEMISTRY: i32 = 6;
pub const RECIPE_SHAPED_CHEMISTRY: i32 = 7;
pub const RECIPE_SMITHING_TRANSFORM: i32 = 8;
pub const RECIPE_SMITHING_TRIM: i32 = 9;

pub const RECIPE_UNLOCK_CONTEXT_NONE: u8 = 0;

/// What a player needs before a recipe unlocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeUnlockingRequirement {
    pub context: u8,
    /// Only sent when the context is `RECIPE_UNLOCK_CONTEXT_NONE`.
    pub ingredients: Vec<ItemDescriptorCount>,
}

impl Marshal for RecipeUnlockingRequirement {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.context)?;
        if self.context == RECIPE_UNLOCK_CONTEXT_NONE {
            slice(io, &mut self.ingredients)?;
        }
        Ok(())
    }
}

/// Which recipe fields a layout carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeLayout {
    pub unlocking_requirement: bool,
    pub assume_symmetry: bool,
}

impl RecipeLayout {
    pub const LATEST: RecipeLayout = RecipeLayout {
        unlocking_requirement: true,
        assume_symmetry: true,
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapelessRecipe {
    pub recipe_id: String,
    pub input: Vec<ItemDescriptorCount>,
    pub output: Vec<ItemStack>,
    pub uuid: Uuid,
    pub block: String,
    pub priority: i32,
    pub unlocking_requirement: RecipeUnlockingRequirement,
    pub recipe_network_id: u32,
}

impl ShapelessRecipe {
    fn marshal_with(&mut self, io: &mut dyn Io, layout: RecipeLayout) -> CodecResult<()> {
        io.string(&mut self.recipe_id)?;
        slice(io, &mut self.input)?;
        func_slice(io, &mut self.output, item)?;
        io.uuid(&mut self.uuid)?;
        io.string(&mut self.block)?;
        io.varint32(&mut self.priority)?;
        if layout.unlocking_requirement {
            self.unlocking_requirement.marshal(io)?;
        }
        io.varuint32(&mut self.recipe_network_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRecipe {
    pub recipe_id: String,
    pub width: i32,
    pub height: i32,
    /// `width * height` descriptors, row by row.
    pub input: Vec<ItemDescriptorCount>,
    pub output: Vec<ItemStack>,
    pub uuid: Uuid,
    pub block: String,
    pub priority: i32,
    pub assume_symmetry: bool,
    pub unlocking_requirement: RecipeUnlockingRequirement,
    pub recipe_network_id: u32,
}

impl ShapedRecipe {
    fn marshal_with(&mut self, io: &mut dyn Io, layout: RecipeLayout) -> CodecResult<()> {
        io.string(&mut self.recipe_id)?;
        io.varint32(&mut self.width)?;
        io.varint32(&mut self.height)?;
        let cells = (self.width.max(0) as usize).saturating_mul(self.height.max(0) as usize);
        if cells > MAX_SLICE_LENGTH {
            return Err(io.invalid_value(
                "shaped recipe size",
                format!("{}x{} grid", self.width, self.height),
            ));
        }
        if io.reads() {
            self.input = vec![ItemDescriptorCount::default(); cells];
        } else if self.input.len() != cells {
            return Err(io.invalid_value(
                "shaped recipe input",
                format!("expected {} descriptors, got {}", cells, self.input.len()),
            ));
        }
        for descriptor in self.input.iter_mut() {
            descriptor.marshal(io)?;
        }
        func_slice(io, &mut self.output, item)?;
        io.uuid(&mut self.uuid)?;
        io.string(&mut self.block)?;
        io.varint32(&mut self.priority)?;
        if layout.assume_symmetry {
            io.bool(&mut self.assume_symmetry)?;
        }
        if layout.unlocking_requirement {
            self.unlocking_requirement.marshal(io)?;
        }
        io.varuint32(&mut self.recipe_network_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FurnaceRecipe {
    pub network_id: i32,
    /// Only sent for furnace data recipes.
    pub metadata: i32,
    pub output: ItemStack,
    pub block: String,
}

impl FurnaceRecipe {
    fn marshal_with(&mut self, io: &mut dyn Io, with_metadata: bool) -> CodecResult<()> {
        io.varint32(&mut self.network_id)?;
        if with_metadata {
            io.varint32(&mut self.metadata)?;
        }
        item(io, &mut self.output)?;
        io.string(&mut self.block)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiRecipe {
    pub uuid: Uuid,
    pub recipe_network_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmithingTransformRecipe {
    pub recipe_id: String,
    pub template: ItemDescriptorCount,
    pub base: ItemDescriptorCount,
    pub addition: ItemDescriptorCount,
    pub result: ItemStack,
    pub block: String,
    pub recipe_network_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmithingTrimRecipe {
    pub recipe_id: String,
    pub template: ItemDescriptorCount,
    pub base: ItemDescriptorCount,
    pub addition: ItemDescriptorCount,
    pub block: String,
    pub recipe_network_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recipe {
    Shapeless(ShapelessRecipe),
    Shaped(ShapedRecipe),
    Furnace(FurnaceRecipe),
    FurnaceData(FurnaceRecipe),
    Multi(MultiRecipe),
    ShulkerBox(ShapelessRecipe),
    ShapelessChemistry(ShapelessRecipe),
    ShapedChemistry(ShapedRecipe),
    SmithingTransform(SmithingTransformRecipe),
    SmithingTrim(SmithingTrimRecipe),
}

impl Default for Recipe {
    fn default() -> Self {
        Recipe::Multi(MultiRecipe::default())
    }
}

impl Recipe {
    pub fn type_id(&self) -> i32 {
        match self {
            Recipe::Shapeless(_) => RECIPE_SHAPELESS,
            Recipe::Shaped(_) => RECIPE_SHAPED,
            Recipe::Furnace(_) => RECIPE_FURNACE,
            Recipe::FurnaceData(_) => RECIPE_FURNACE_DATA,
            Recipe::Multi(_) => RECIPE_MULTI,
            Recipe::ShulkerBox(_) => RECIPE_SHULKER_BOX,
            Recipe::ShapelessChemistry(_) => RECIPE_SHAPELESS_CHEMISTRY,
            Recipe::ShapedChemistry(_) => RECIPE_SHAPED_CHEMISTRY,
            Recipe::SmithingTransform(_) => RECIPE_SMITHING_TRANSFORM,
            Recipe::SmithingTrim(_) => RECIPE_SMITHING_TRIM,
        }
    }

    fn empty(id: i32, io: &dyn Io) -> CodecResult<Self> {
        Ok(match id {
            RECIPE_SHAPELESS => Recipe::Shapeless(Default::default()),
            RECIPE_SHAPED => Recipe::Shaped(Default::default()),
            RECIPE_FURNACE => Recipe::Furnace(Default::default()),
            RECIPE_FURNACE_DATA => Recipe::FurnaceData(Default::default()),
            RECIPE_MULTI => Recipe::Multi(Default::default()),
            RECIPE_SHULKER_BOX => Recipe::ShulkerBox(Default::default()),
            RECIPE_SHAPELESS_CHEMISTRY => Recipe::ShapelessChemistry(Default::default()),
            RECIPE_SHAPED_CHEMISTRY => Recipe::ShapedChemistry(Default::default()),
            RECIPE_SMITHING_TRANSFORM => Recipe::SmithingTransform(Default::default()),
            RECIPE_SMITHING_TRIM => Recipe::SmithingTrim(Default::default()),
            other => return Err(io.unknown_enum_option(other as i64, "recipe type")),
        })
    }

    pub fn marshal_with(&mut self, io: &mut dyn Io, layout: RecipeLayout) -> CodecResult<()> {
        let mut id = self.type_id();
        io.varint32(&mut id)?;
        if io.reads() {
            *self = Recipe::empty(id, io)?;
        }
        match self {
            Recipe::Shapeless(r) | Recipe::ShulkerBox(r) | Recipe::ShapelessChemistry(r) => {
                r.marshal_with(io, layout)
            }
            Recipe::Shaped(r) | Recipe::ShapedChemistry(r) => r.marshal_with(io, layout),
            Recipe::Furnace(r) => r.marshal_with(io, false),
            Recipe::FurnaceData(r) => r.marshal_with(io, true),
            Recipe::Multi(r) => {
                io.uuid(&mut r.uuid)?;
                io.varuint32(&mut r.recipe_network_id)
            }
            Recipe::SmithingTransform(r) => {
                io.string(&mut r.recipe_id)?;
                r.template.marshal(io)?;
                r.base.marshal(io)?;
                r.addition.marshal(io)?;
                item(io, &mut r.result)?;
                io.string(&mut r.block)?;
                io.varuint32(&mut r.recipe_network_id)
            }
            Recipe::SmithingTrim(r) => {
                io.string(&mut r.recipe_id)?;
                r.template.marshal(io)?;
                r.base.marshal(io)?;
                r.addition.marshal(io)?;
                io.string(&mut r.block)?;
                io.varuint32(&mut r.recipe_network_id)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PotionRecipe {
    pub input_potion_id: i32,
    pub input_potion_metadata: i32,
    pub reagent_item_id: i32,
    pub reagent_item_metadata: i32,
    pub output_potion_id: i32,
    pub output_potion_metadata: i32,
}

impl Marshal for PotionRecipe {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.input_potion_id)?;
        io.varint32(&mut self.input_potion_metadata)?;
        io.varint32(&mut self.reagent_item_id)?;
        io.varint32(&mut self.reagent_item_metadata)?;
        io.varint32(&mut self.output_potion_id)?;
        io.varint32(&mut self.output_potion_metadata)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PotionContainerChangeRecipe {
    pub input_item_id: i32,
    pub reagent_item_id: i32,
    pub output_item_id: i32,
}

impl Marshal for PotionContainerChangeRecipe {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.input_item_id)?;
        io.varint32(&mut self.reagent_item_id)?;
        io.varint32(&mut self.output_item_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialReducerOutput {
    pub network_id: i32,
    pub count: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialReducer {
    pub network_id: i32,
    pub metadata: i32,
    pub outputs: Vec<MaterialReducerOutput>,
}

impl Marshal for MaterialReducer {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        let mut input = (self.network_id << 16) | (self.metadata & 0x7fff);
        io.varint32(&mut input)?;
        self.network_id = input >> 16;
        self.metadata = input & 0x7fff;
        func_slice(io, &mut self.outputs, |io, o| {
            io.varint32(&mut o.network_id)?;
            io.varint32(&mut o.count)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CraftingData {
    pub recipes: Vec<Recipe>,
    pub potion_recipes: Vec<PotionRecipe>,
    pub potion_container_change_recipes: Vec<PotionContainerChangeRecipe>,
    pub material_reducers: Vec<MaterialReducer>,
    pub clear_recipes: bool,
}

impl CraftingData {
    pub fn marshal_with(&mut self, io: &mut dyn Io, layout: RecipeLayout) -> CodecResult<()> {
        func_slice(io, &mut self.recipes, |io, r| r.marshal_with(io, layout))?;
        slice(io, &mut self.potion_recipes)?;
        slice(io, &mut self.potion_container_change_recipes)?;
        slice(io, &mut self.material_reducers)?;
        io.bool(&mut self.clear_recipes)
    }
}

impl Marshal for CraftingData {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_with(io, RecipeLayout::LATEST)
    }
}
