//! Identifier translation shared by every version: block and item IDs, terrain,
//! and the default step that runs before a version's own rewrites.

pub mod block;
pub mod default;
pub mod item;
pub mod terrain;

use std::fmt;
use std::mem;
use std::sync::Arc;

use crossgrade_mappings::Mapping;
use crossgrade_types::ItemStack;

pub use default::{default_downgrade, default_upgrade, Translated};

/// Which way identifiers are moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Legacy ID space to latest.
    Upgrade,
    /// Latest ID space to legacy.
    Downgrade,
}

/// The pair of tables a version translates between.
///
/// Cloning is cheap: both tables are shared.
#[derive(Clone)]
pub struct Translator {
    legacy: Arc<dyn Mapping>,
    latest: Arc<dyn Mapping>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("legacy_air", &self.legacy.air_runtime_id())
            .field("latest_air", &self.latest.air_runtime_id())
            .finish()
    }
}

impl Translator {
    pub fn new(legacy: Arc<dyn Mapping>, latest: Arc<dyn Mapping>) -> Self {
        Self { legacy, latest }
    }

    pub fn legacy(&self) -> &dyn Mapping {
        self.legacy.as_ref()
    }

    pub fn latest(&self) -> &dyn Mapping {
        self.latest.as_ref()
    }

    pub fn upgrade_block(&self, id: u32) -> u32 {
        block::upgrade_block_runtime_id(id, self.legacy(), self.latest())
    }

    pub fn downgrade_block(&self, id: u32) -> u32 {
        block::downgrade_block_runtime_id(id, self.legacy(), self.latest())
    }

    pub fn remap_block(&self, conversion: Conversion, id: u32) -> u32 {
        match conversion {
            Conversion::Upgrade => self.upgrade_block(id),
            Conversion::Downgrade => self.downgrade_block(id),
        }
    }

    /// Air of the ID space blocks are read in.
    pub fn source_air(&self, conversion: Conversion) -> u32 {
        match conversion {
            Conversion::Upgrade => self.legacy.air_runtime_id(),
            Conversion::Downgrade => self.latest.air_runtime_id(),
        }
    }

    /// Air of the ID space blocks are written in.
    pub fn target_air(&self, conversion: Conversion) -> u32 {
        match conversion {
            Conversion::Upgrade => self.latest.air_runtime_id(),
            Conversion::Downgrade => self.legacy.air_runtime_id(),
        }
    }

    pub fn upgrade_item(&self, stack: ItemStack) -> ItemStack {
        item::upgrade_item(stack, self.legacy(), self.latest())
    }

    pub fn downgrade_item(&self, stack: ItemStack) -> ItemStack {
        item::downgrade_item(stack, self.legacy(), self.latest())
    }

    /// Rewrites `stack` in place.
    pub fn remap_item(&self, conversion: Conversion, stack: &mut ItemStack) {
        let taken = mem::take(stack);
        *stack = match conversion {
            Conversion::Upgrade => self.upgrade_item(taken),
            Conversion::Downgrade => self.downgrade_item(taken),
        };
    }

    /// Maps a bare item network ID, keeping it when the name is unknown on either side.
    pub fn remap_item_id(&self, conversion: Conversion, id: i32) -> i32 {
        let remapped = match conversion {
            Conversion::Upgrade => item::remap_item_id(id, self.legacy(), self.latest()),
            Conversion::Downgrade => item::remap_item_id(id, self.latest(), self.legacy()),
        };
        remapped.unwrap_or(id)
    }
}
