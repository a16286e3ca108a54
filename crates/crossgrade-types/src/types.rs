use serde::{Deserialize, Serialize};

pub use uuid::Uuid;

/// A block position in the world (x, y, z integers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn chunk_pos(&self) -> ChunkPos {
        ChunkPos {
            x: self.x >> 4,
            z: self.z >> 4,
        }
    }

    pub fn sub_chunk_pos(&self) -> SubChunkPos {
        SubChunkPos {
            x: self.x >> 4,
            y: self.y >> 4,
            z: self.z >> 4,
        }
    }
}

/// A chunk column position (x, z).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// The position of a single 16x16x16 sub-chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl SubChunkPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// A 2D vector of single precision floats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 3D vector of single precision floats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// The numeric identity of an item: its network ID plus a metadata (damage/variant) value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemType {
    pub network_id: i32,
    pub metadata_value: u32,
}

/// An item stack as it travels over the network.
///
/// A network ID of zero is the empty stack; nothing else is encoded for it.
/// `extra_data` holds the user data block (NBT, can-place-on, can-destroy) verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_type: ItemType,
    /// Runtime ID of the block this item places, or 0 when it places none.
    pub block_runtime_id: i32,
    pub count: u16,
    pub extra_data: Vec<u8>,
}

impl ItemStack {
    pub fn new(network_id: i32, count: u16) -> Self {
        Self {
            item_type: ItemType {
                network_id,
                metadata_value: 0,
            },
            count,
            ..Default::default()
        }
    }

    pub fn network_id(&self) -> i32 {
        self.item_type.network_id
    }

    pub fn is_empty(&self) -> bool {
        self.item_type.network_id == 0
    }
}

/// An item stack paired with the server-assigned stack network ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemInstance {
    pub stack_network_id: i32,
    pub stack: ItemStack,
}

impl ItemInstance {
    pub fn new(stack: ItemStack) -> Self {
        Self {
            stack_network_id: 0,
            stack,
        }
    }
}
