use crate::codec::{CodecResult, Io, Marshal};
use crossgrade_types::{ItemInstance, ItemStack};

/// Codes an item stack without a stack network ID (recipes, creative content).
pub fn item(io: &mut dyn Io, x: &mut ItemStack) -> CodecResult<()> {
    io.varint32(&mut x.item_type.network_id)?;
    if x.item_type.network_id == 0 {
        if io.reads() {
            *x = ItemStack::default();
        }
        return Ok(());
    }
    io.u16(&mut x.count)?;
    io.varuint32(&mut x.item_type.metadata_value)?;
    io.varint32(&mut x.block_runtime_id)?;
    io.byte_slice(&mut x.extra_data)
}

impl Marshal for ItemInstance {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        let stack = &mut self.stack;
        io.varint32(&mut stack.item_type.network_id)?;
        if stack.item_type.network_id == 0 {
            if io.reads() {
                *stack = ItemStack::default();
                self.stack_network_id = 0;
            }
            return Ok(());
        }
        io.u16(&mut stack.count)?;
        io.varuint32(&mut stack.item_type.metadata_value)?;

        let mut has_net_id = self.stack_network_id != 0;
        io.bool(&mut has_net_id)?;
        if has_net_id {
            io.varint32(&mut self.stack_network_id)?;
        } else if io.reads() {
            self.stack_network_id = 0;
        }
        io.varint32(&mut stack.block_runtime_id)?;
        io.byte_slice(&mut stack.extra_data)
    }
}

pub const ITEM_DESCRIPTOR_INVALID: u8 = 0;
pub const ITEM_DESCRIPTOR_DEFAULT: u8 = 1;
pub const ITEM_DESCRIPTOR_MOLANG: u8 = 2;
pub const ITEM_DESCRIPTOR_ITEM_TAG: u8 = 3;
pub const ITEM_DESCRIPTOR_DEFERRED: u8 = 4;
pub const ITEM_DESCRIPTOR_COMPLEX_ALIAS: u8 = 5;

/// Describes which items a recipe slot accepts.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ItemDescriptor {
    #[default]
    Invalid,
    /// A specific network ID and metadata value.
    Default { network_id: i16, metadata: i16 },
    Molang { expression: String, version: u8 },
    ItemTag { tag: String },
    /// Resolved by name once the item registry is known.
    Deferred { name: String, metadata: i16 },
    ComplexAlias { name: String },
}

impl ItemDescriptor {
    pub fn type_id(&self) -> u8 {
        match self {
            ItemDescriptor::Invalid => ITEM_DESCRIPTOR_INVALID,
            ItemDescriptor::Default { .. } => ITEM_DESCRIPTOR_DEFAULT,
            ItemDescriptor::Molang { .. } => ITEM_DESCRIPTOR_MOLANG,
            ItemDescriptor::ItemTag { .. } => ITEM_DESCRIPTOR_ITEM_TAG,
            ItemDescriptor::Deferred { .. } => ITEM_DESCRIPTOR_DEFERRED,
            ItemDescriptor::ComplexAlias { .. } => ITEM_DESCRIPTOR_COMPLEX_ALIAS,
        }
    }
}

/// An item descriptor with a required count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDescriptorCount {
    pub descriptor: ItemDescriptor,
    pub count: i32,
}

impl Marshal for ItemDescriptorCount {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        let mut id = self.descriptor.type_id();
        io.u8(&mut id)?;
        if io.reads() {
            self.descriptor = match id {
                ITEM_DESCRIPTOR_INVALID => ItemDescriptor::Invalid,
                ITEM_DESCRIPTOR_DEFAULT => ItemDescriptor::Default {
                    network_id: 0,
                    metadata: 0,
                },
                ITEM_DESCRIPTOR_MOLANG => ItemDescriptor::Molang {
                    expression: String::new(),
                    version: 0,
                },
                ITEM_DESCRIPTOR_ITEM_TAG => ItemDescriptor::ItemTag { tag: String::new() },
                ITEM_DESCRIPTOR_DEFERRED => ItemDescriptor::Deferred {
                    name: String::new(),
                    metadata: 0,
                },
                ITEM_DESCRIPTOR_COMPLEX_ALIAS => ItemDescriptor::ComplexAlias {
                    name: String::new(),
                },
                other => return Err(io.unknown_enum_option(other as i64, "item descriptor type")),
            };
        }
        match &mut self.descriptor {
            ItemDescriptor::Invalid => {}
            ItemDescriptor::Default {
                network_id,
                metadata,
            } => {
                io.i16(network_id)?;
                if *network_id != 0 {
                    io.i16(metadata)?;
                }
            }
            ItemDescriptor::Molang {
                expression,
                version,
            } => {
                io.string(expression)?;
                io.u8(version)?;
            }
            ItemDescriptor::ItemTag { tag } => io.string(tag)?,
            ItemDescriptor::Deferred { name, metadata } => {
                io.string(name)?;
                io.i16(metadata)?;
            }
            ItemDescriptor::ComplexAlias { name } => io.string(name)?,
        }
        io.varint32(&mut self.count)
    }
}
