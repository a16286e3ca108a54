use crossgrade_mappings::Mapping;
use crossgrade_types::ItemStack;

use super::block::{downgrade_block_runtime_id, upgrade_block_runtime_id};

/// Looks an item network ID up by name in `from` and returns the ID the same name has in `to`.
pub fn remap_item_id(id: i32, from: &dyn Mapping, to: &dyn Mapping) -> Option<i32> {
    from.item_name_by_id(id)
        .and_then(|name| to.item_id_by_name(name))
}

/// Moves a legacy item stack into the latest ID space.
///
/// The empty stack collapses to the canonical empty stack. A stack whose item
/// the latest table does not know is returned as is, block runtime ID included.
pub fn upgrade_item(mut stack: ItemStack, legacy: &dyn Mapping, latest: &dyn Mapping) -> ItemStack {
    if stack.is_empty() {
        return ItemStack::default();
    }
    let Some(id) = remap_item_id(stack.network_id(), legacy, latest) else {
        return stack;
    };
    stack.item_type.network_id = id;
    if stack.block_runtime_id > 0 {
        stack.block_runtime_id =
            upgrade_block_runtime_id(stack.block_runtime_id as u32, legacy, latest) as i32;
    }
    stack
}

/// Moves a latest item stack into a legacy ID space.
pub fn downgrade_item(mut stack: ItemStack, legacy: &dyn Mapping, latest: &dyn Mapping) -> ItemStack {
    let Some(id) = remap_item_id(stack.network_id(), latest, legacy) else {
        return stack;
    };
    stack.item_type.network_id = id;
    if stack.block_runtime_id > 0 {
        stack.block_runtime_id =
            downgrade_block_runtime_id(stack.block_runtime_id as u32, legacy, latest) as i32;
    }
    stack
}
