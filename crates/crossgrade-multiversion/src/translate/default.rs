//! The identifier step every version runs before its own rewrites.
//!
//! It moves block runtime IDs, item network IDs and terrain between the
//! version's ID space and the latest one for a fixed set of packets, and
//! reports whether it touched the packet.

use crossgrade_protocol_core::{
    BlockChangeEntry, CraftingData, EntityMetadata, InventoryAction, InventoryTransaction,
    ItemDescriptor, ItemDescriptorCount, LatestPacket, MetadataValue, Recipe, StartGame,
    StackRequestAction, TransactionData, UseItemTransactionData, ENTITY_DATA_KEY_VARIANT,
};
use crossgrade_types::ItemInstance;

use super::terrain::{recode_cache_blobs, recode_level_chunk, recode_sub_chunks};
use super::{Conversion, Translator};
use crate::{v686, Packet};

/// The outcome of the default step.
#[derive(Debug, Clone, PartialEq)]
pub enum Translated {
    /// Identifiers in the packet were moved to the other ID space.
    Handled(Packet),
    /// The packet carries no identifiers this step knows about.
    Unhandled(Packet),
}

impl Translated {
    pub fn into_inner(self) -> Packet {
        match self {
            Translated::Handled(pk) | Translated::Unhandled(pk) => pk,
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Translated::Handled(_))
    }
}

fn outcome(pk: Packet, handled: bool) -> Translated {
    if handled {
        Translated::Handled(pk)
    } else {
        Translated::Unhandled(pk)
    }
}

/// Moves a client packet from the legacy ID space into the latest one.
pub fn default_upgrade(pk: Packet, t: &Translator) -> Translated {
    const C: Conversion = Conversion::Upgrade;
    match pk {
        Packet::Latest(mut pk) => {
            let handled = match &mut pk {
                LatestPacket::InventoryTransaction(pk) => {
                    remap_transaction(pk, t, C, |data, t| remap_use_item(data, t, C));
                    true
                }
                LatestPacket::ItemStackRequest(pk) => {
                    for action in pk.requests.iter_mut().flat_map(|r| r.actions.iter_mut()) {
                        if let StackRequestAction::CraftResultsDeprecated(a) = action {
                            a.result_items.iter_mut().for_each(|s| t.remap_item(C, s));
                        }
                    }
                    true
                }
                LatestPacket::LevelSoundEvent(pk) => {
                    if pk.carries_block() {
                        pk.extra_data = t.remap_block(C, pk.extra_data as u32) as i32;
                    }
                    true
                }
                other => remap_shared(other, t, C),
            };
            outcome(Packet::Latest(pk), handled)
        }
        Packet::V686(mut pk) => {
            let handled = match &mut pk {
                v686::Packet::InventoryTransaction(pk) => {
                    remap_transaction(pk, t, C, |data, t| {
                        if data.block_runtime_id > 0 {
                            data.block_runtime_id = t.upgrade_block(data.block_runtime_id);
                        }
                        remap_instance(&mut data.held_item, t, C);
                    });
                    true
                }
                v686::Packet::ItemStackRequest(pk) => {
                    for action in pk.requests.iter_mut().flat_map(|r| r.actions.iter_mut()) {
                        if let v686::StackRequestAction::CraftResultsDeprecated(a) = action {
                            a.result_items.iter_mut().for_each(|s| t.remap_item(C, s));
                        }
                    }
                    true
                }
                v686::Packet::MobArmourEquipment(pk) => {
                    for item in [
                        &mut pk.helmet,
                        &mut pk.chestplate,
                        &mut pk.leggings,
                        &mut pk.boots,
                    ] {
                        remap_instance(item, t, C);
                    }
                    true
                }
                _ => false,
            };
            outcome(Packet::V686(pk), handled)
        }
        other => Translated::Unhandled(other),
    }
}

/// Moves a server packet from the latest ID space into the legacy one.
pub fn default_downgrade(pk: Packet, t: &Translator) -> Translated {
    const C: Conversion = Conversion::Downgrade;
    let Packet::Latest(mut pk) = pk else {
        return Translated::Unhandled(pk);
    };
    let handled = match &mut pk {
        LatestPacket::SetActorData(pk) => {
            remap_variant(&mut pk.entity_metadata, t);
            true
        }
        LatestPacket::AddActor(pk) => {
            remap_variant(&mut pk.entity_metadata, t);
            true
        }
        LatestPacket::AddItemActor(pk) => {
            remap_instance(&mut pk.item, t, C);
            true
        }
        LatestPacket::AddPlayer(pk) => {
            remap_instance(&mut pk.held_item, t, C);
            true
        }
        LatestPacket::CreativeContent(pk) => {
            pk.items.iter_mut().for_each(|i| t.remap_item(C, &mut i.item));
            true
        }
        LatestPacket::InventoryContent(pk) => {
            pk.content.iter_mut().for_each(|i| remap_instance(i, t, C));
            true
        }
        LatestPacket::InventorySlot(pk) => {
            remap_instance(&mut pk.new_item, t, C);
            true
        }
        LatestPacket::LevelEvent(pk) => {
            if pk.carries_block() {
                pk.event_data = t.downgrade_block(pk.event_data as u32) as i32;
            }
            true
        }
        LatestPacket::LevelSoundEvent(pk) => {
            if pk.carries_block() {
                pk.extra_data = t.downgrade_block(pk.extra_data as u32) as i32;
            }
            true
        }
        LatestPacket::CraftingData(pk) => {
            downgrade_crafting_data(pk, t);
            true
        }
        LatestPacket::StartGame(pk) => {
            downgrade_item_table(pk, t);
            true
        }
        other => remap_shared(other, t, C),
    };
    outcome(Packet::Latest(pk), handled)
}

/// Packets remapped the same way in both directions.
fn remap_shared(pk: &mut LatestPacket, t: &Translator, c: Conversion) -> bool {
    match pk {
        LatestPacket::MobEquipment(pk) => remap_instance(&mut pk.new_item, t, c),
        LatestPacket::MobArmourEquipment(pk) => {
            for item in [
                &mut pk.helmet,
                &mut pk.chestplate,
                &mut pk.leggings,
                &mut pk.boots,
                &mut pk.body,
            ] {
                remap_instance(item, t, c);
            }
        }
        LatestPacket::UpdateBlock(pk) => {
            pk.new_block_runtime_id = t.remap_block(c, pk.new_block_runtime_id);
        }
        LatestPacket::UpdateBlockSynced(pk) => {
            pk.new_block_runtime_id = t.remap_block(c, pk.new_block_runtime_id);
        }
        LatestPacket::UpdateSubChunkBlocks(pk) => {
            for entry in pk.blocks.iter_mut().chain(pk.extra.iter_mut()) {
                remap_block_change(entry, t, c);
            }
        }
        LatestPacket::LevelChunk(pk) => recode_level_chunk(pk, t, c),
        LatestPacket::SubChunk(pk) => recode_sub_chunks(pk, t, c),
        LatestPacket::ClientCacheMissResponse(pk) => recode_cache_blobs(pk, t, c),
        _ => return false,
    }
    true
}

fn remap_instance(item: &mut ItemInstance, t: &Translator, c: Conversion) {
    t.remap_item(c, &mut item.stack);
}

fn remap_block_change(entry: &mut BlockChangeEntry, t: &Translator, c: Conversion) {
    entry.block_runtime_id = t.remap_block(c, entry.block_runtime_id);
}

fn remap_use_item(data: &mut UseItemTransactionData, t: &Translator, c: Conversion) {
    if data.block_runtime_id > 0 {
        data.block_runtime_id = t.remap_block(c, data.block_runtime_id);
    }
    remap_instance(&mut data.held_item, t, c);
}

fn remap_transaction<U>(
    pk: &mut InventoryTransaction<U>,
    t: &Translator,
    c: Conversion,
    use_item: impl FnOnce(&mut U, &Translator),
) {
    for InventoryAction {
        old_item, new_item, ..
    } in pk.actions.iter_mut()
    {
        remap_instance(old_item, t, c);
        remap_instance(new_item, t, c);
    }
    match &mut pk.transaction_data {
        TransactionData::UseItem(data) => use_item(data, t),
        TransactionData::UseItemOnEntity(data) => remap_instance(&mut data.held_item, t, c),
        TransactionData::ReleaseItem(data) => remap_instance(&mut data.held_item, t, c),
        TransactionData::Normal | TransactionData::Mismatch => {}
    }
}

/// Falling blocks and similar entities carry their block in the variant key.
fn remap_variant(metadata: &mut EntityMetadata, t: &Translator) {
    if let Some(MetadataValue::Int(variant)) = metadata.0.get_mut(&ENTITY_DATA_KEY_VARIANT) {
        *variant = t.downgrade_block(*variant as u32) as i32;
    }
}

fn remap_descriptor(d: &mut ItemDescriptorCount, t: &Translator) {
    if let ItemDescriptor::Default { network_id, .. } = &mut d.descriptor {
        if *network_id != 0 {
            let id = t.remap_item_id(Conversion::Downgrade, *network_id as i32);
            *network_id = i16::try_from(id).unwrap_or(*network_id);
        }
    }
}

fn downgrade_crafting_data(pk: &mut CraftingData, t: &Translator) {
    const C: Conversion = Conversion::Downgrade;
    for recipe in pk.recipes.iter_mut() {
        match recipe {
            Recipe::Shapeless(r) | Recipe::ShulkerBox(r) | Recipe::ShapelessChemistry(r) => {
                r.input.iter_mut().for_each(|d| remap_descriptor(d, t));
                r.unlocking_requirement
                    .ingredients
                    .iter_mut()
                    .for_each(|d| remap_descriptor(d, t));
                r.output.iter_mut().for_each(|s| t.remap_item(C, s));
            }
            Recipe::Shaped(r) | Recipe::ShapedChemistry(r) => {
                r.input.iter_mut().for_each(|d| remap_descriptor(d, t));
                r.unlocking_requirement
                    .ingredients
                    .iter_mut()
                    .for_each(|d| remap_descriptor(d, t));
                r.output.iter_mut().for_each(|s| t.remap_item(C, s));
            }
            Recipe::Furnace(r) | Recipe::FurnaceData(r) => {
                r.network_id = t.remap_item_id(C, r.network_id);
                t.remap_item(C, &mut r.output);
            }
            Recipe::SmithingTransform(r) => {
                for d in [&mut r.template, &mut r.base, &mut r.addition] {
                    remap_descriptor(d, t);
                }
                t.remap_item(C, &mut r.result);
            }
            Recipe::SmithingTrim(r) => {
                for d in [&mut r.template, &mut r.base, &mut r.addition] {
                    remap_descriptor(d, t);
                }
            }
            Recipe::Multi(_) => {}
        }
    }
    for r in pk.potion_recipes.iter_mut() {
        r.input_potion_id = t.remap_item_id(C, r.input_potion_id);
        r.reagent_item_id = t.remap_item_id(C, r.reagent_item_id);
        r.output_potion_id = t.remap_item_id(C, r.output_potion_id);
    }
    for r in pk.potion_container_change_recipes.iter_mut() {
        r.input_item_id = t.remap_item_id(C, r.input_item_id);
        r.reagent_item_id = t.remap_item_id(C, r.reagent_item_id);
        r.output_item_id = t.remap_item_id(C, r.output_item_id);
    }
    for r in pk.material_reducers.iter_mut() {
        r.network_id = t.remap_item_id(C, r.network_id);
        for o in r.outputs.iter_mut() {
            o.network_id = t.remap_item_id(C, o.network_id);
        }
    }
}

/// Gives every item the legacy table knows its legacy runtime ID. Custom items
/// keep the ID the server assigned.
fn downgrade_item_table(pk: &mut StartGame, t: &Translator) {
    for entry in pk.items.iter_mut() {
        if let Some(id) = t
            .legacy()
            .item_id_by_name(&entry.name)
            .and_then(|id| i16::try_from(id).ok())
        {
            entry.runtime_id = id;
        }
    }
}
