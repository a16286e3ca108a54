//! End-to-end behaviour of the version chain: wire layouts, identifier
//! translation and the registry working together.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crossgrade_mappings::{Mapping, MappingTable};
use crossgrade_multiversion::translate::{default_downgrade, default_upgrade, Translator};
use crossgrade_multiversion::{
    v630, v649, v686, ConnContext, Packet, Protocol, Registry, Version, V630, V649, V662, V671, V685,
    V686,
};
use crossgrade_protocol_core::{
    ids, BlockChangeEntry, CodeBuilderSource, CodecError, ContainerClose, CraftingData, Direction,
    FullContainerName, ItemStackResponse, ItemStackResponseEntry, LatestPacket, LecternUpdate,
    LevelChunk, LevelEvent, MobEffect, MobEquipment, PlayerList, PlayerListEntry, Pool,
    SetActorMotion, SetHud, ShapelessRecipe, StackResponseContainerInfo, StackResponseSlotInfo,
    Text, UpdateBlock, UpdatePlayerGameType, UpdateSubChunkBlocks,
    INPUT_FLAG_CLIENT_PREDICTED_VEHICLE, PLAYER_LIST_ACTION_ADD, TEXT_TYPE_CHAT,
};
use crossgrade_protocol_core::Recipe;
use crossgrade_types::{BlockPos, ItemInstance, ItemStack, Vec2, Vec3};
use crossgrade_world::{network_decode, network_encode, Chunk, HeightRange};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

const LEGACY_VERSIONS: [i32; 6] = [686, 685, 671, 662, 649, 630];

fn legacy_table() -> MappingTable {
    let doc = json!({
        "blocks": [
            { "name": "minecraft:air" },
            { "name": "minecraft:stone" },
            { "name": "minecraft:furnace", "properties": { "facing_direction": 2 } },
            { "name": "minecraft:grass" },
            { "name": "minecraft:furnace", "properties": { "facing_direction": 3 } },
        ],
        "items": [
            { "name": "minecraft:stone", "id": 1 },
            { "name": "minecraft:apple", "id": 257 },
            { "name": "minecraft:old_thing", "id": 900 },
        ],
    });
    MappingTable::from_json(&doc.to_string()).unwrap()
}

fn latest_table() -> MappingTable {
    let doc = json!({
        "blocks": [
            { "name": "minecraft:bedrock" },
            { "name": "minecraft:air" },
            { "name": "minecraft:stone" },
            { "name": "minecraft:grass_block" },
            { "name": "minecraft:furnace", "properties": { "facing_direction": 2 } },
            { "name": "minecraft:furnace", "properties": { "facing_direction": 3 } },
        ],
        "items": [
            { "name": "minecraft:stone", "id": 1 },
            { "name": "minecraft:apple", "id": 258 },
            { "name": "minecraft:new_thing", "id": 901 },
        ],
    });
    MappingTable::from_json(&doc.to_string()).unwrap()
}

fn registry() -> Registry {
    let legacy: Arc<dyn Mapping> = Arc::new(legacy_table());
    let mappings: HashMap<i32, Arc<dyn Mapping>> = [686, 671, 662, 649, 630]
        .into_iter()
        .map(|p| (p, legacy.clone()))
        .collect();
    Registry::new(Arc::new(latest_table()), &mappings).unwrap()
}

fn translator() -> Translator {
    Translator::new(Arc::new(legacy_table()), Arc::new(latest_table()))
}

/// Encodes `pk` with `p` and decodes it again from `p`'s pool for `direction`.
fn over_wire(p: &dyn Protocol, direction: Direction, mut pk: Packet) -> Packet {
    let id = pk.id();
    let body = p.encode(&mut pk).unwrap();
    p.decode(direction, id, &body, true).unwrap()
}

fn single(mut pks: Vec<Packet>) -> Packet {
    assert_eq!(pks.len(), 1, "expected one packet, got {:?}", pks);
    pks.remove(0)
}

fn stack(id: i32) -> ItemInstance {
    ItemInstance::new(ItemStack::new(id, 1))
}

#[test]
fn test_untouched_packets_survive_every_version() {
    let registry = registry();
    let ctx = ConnContext::new(1);
    let packets: Vec<LatestPacket> = vec![
        UpdateBlock {
            new_block_runtime_id: 2,
            flags: 3,
            ..Default::default()
        }
        .into(),
        MobEquipment {
            entity_runtime_id: 8,
            new_item: stack(258),
            hot_bar_slot: 4,
            ..Default::default()
        }
        .into(),
        LevelEvent {
            event_type: 3001,
            event_data: 17,
            position: Vec3::new(1.0, 64.0, -3.5),
        }
        .into(),
        UpdateSubChunkBlocks {
            blocks: vec![BlockChangeEntry {
                block_runtime_id: 4,
                ..Default::default()
            }],
            extra: vec![BlockChangeEntry {
                block_runtime_id: 5,
                ..Default::default()
            }],
            ..Default::default()
        }
        .into(),
        LatestPacket::Unknown {
            id: 200,
            payload: vec![9, 8, 7],
        },
    ];

    for protocol in LEGACY_VERSIONS {
        let p = registry.get(protocol).unwrap();
        for pk in &packets {
            let original = Packet::Latest(pk.clone());
            let down = single(p.convert_from_latest(original.clone(), &ctx).unwrap());
            let received = over_wire(p, Direction::Clientbound, down);
            let back = single(p.convert_to_latest(received, &ctx).unwrap());
            assert_eq!(back, original, "{} through {}", pk.name(), protocol);
        }
    }
}

#[test]
fn test_shared_shapes_pass_through() {
    let registry = registry();
    let ctx = ConnContext::new(2);
    let text: LatestPacket = Text {
        text_type: TEXT_TYPE_CHAT,
        source_name: "steve".into(),
        message: "hi".into(),
        ..Default::default()
    }
    .into();
    let close: LatestPacket = ContainerClose {
        window_id: 3,
        container_type: 1,
        server_side: true,
    }
    .into();
    let code: LatestPacket = CodeBuilderSource {
        operation: 1,
        category: 2,
        code_status: 1,
    }
    .into();
    let game_type: LatestPacket = UpdatePlayerGameType {
        game_type: 1,
        player_unique_id: -5,
        tick: 40,
    }
    .into();
    let hud: LatestPacket = SetHud {
        elements: vec![1, 4],
        visibility: 1,
    }
    .into();
    let effect: LatestPacket = MobEffect {
        entity_runtime_id: 7,
        operation: 1,
        effect_type: 12,
        amplifier: 2,
        particles: true,
        duration: 600,
        tick: 90,
    }
    .into();
    let motion: LatestPacket = SetActorMotion {
        entity_runtime_id: 7,
        velocity: Vec3::new(0.25, -0.5, 1.0),
        tick: 90,
    }
    .into();
    let lectern: LatestPacket = LecternUpdate {
        page: 2,
        page_count: 6,
        position: BlockPos::new(10, 70, -4),
    }
    .into();

    // Each packet runs through every version down to the first one that
    // reshapes it.
    let cases: Vec<(LatestPacket, Direction, Vec<i32>)> = vec![
        (text.clone(), Direction::Clientbound, vec![686, 685]),
        (text, Direction::Serverbound, vec![686, 685]),
        (close.clone(), Direction::Clientbound, vec![686, 685]),
        (close, Direction::Serverbound, vec![686, 685]),
        (code, Direction::Serverbound, vec![686, 685]),
        (game_type, Direction::Clientbound, vec![686, 685, 671]),
        (effect, Direction::Clientbound, vec![686, 685, 671, 662]),
        (motion, Direction::Clientbound, vec![686, 685, 671, 662]),
        (lectern, Direction::Serverbound, vec![686, 685, 671, 662]),
        (hud, Direction::Clientbound, vec![686, 685, 671, 662, 649]),
    ];
    for (pk, direction, versions) in cases {
        for protocol in versions {
            let p = registry.get(protocol).unwrap();
            let original = Packet::Latest(pk.clone());
            let down = single(p.convert_from_latest(original.clone(), &ctx).unwrap());
            assert_eq!(down, original, "{} down to {}", pk.name(), protocol);
            let received = over_wire(p, direction, down);
            let back = single(p.convert_to_latest(received, &ctx).unwrap());
            assert_eq!(back, original, "{} through {}", pk.name(), protocol);
        }
    }
}

fn fill(seed: u64, air: u32, palette: &[u32]) -> Chunk {
    let range = HeightRange::OVERWORLD;
    let mut chunk = Chunk::new(air, range);
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..2048 {
        let x = rng.gen_range(0..16u8);
        let z = rng.gen_range(0..16u8);
        let y = rng.gen_range(range.min..64);
        let id = palette[rng.gen_range(0..palette.len())];
        chunk.set_block(x, y, z, 0, id);
    }
    for x in 0..16u8 {
        for z in 0..16u8 {
            let y = chunk.highest_block(x, z);
            chunk.set_biome(x, y, z, rng.gen_range(1..64));
        }
    }
    chunk
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn test_terrain_round_trip(seed in any::<u64>(), protocol in prop::sample::select(LEGACY_VERSIONS.to_vec())) {
        let registry = registry();
        let ctx = ConnContext::default();
        let range = HeightRange::OVERWORLD;
        let original = fill(seed, 0, &[0, 1, 2, 4]);
        let (payload, count) = network_encode(&original).unwrap();

        // Client-sent terrain does not exist, so start from the legacy side of a
        // server packet and take it up then down again.
        let legacy = LatestPacket::LevelChunk(LevelChunk {
            sub_chunk_count: count as u32,
            raw_payload: payload.to_vec(),
            ..Default::default()
        });
        let t = translator();
        let up = default_upgrade(Packet::Latest(legacy), &t).into_inner();
        let down = single(registry.convert_from_latest(protocol, up, &ctx).unwrap());

        let chunk = match &down {
            Packet::Latest(LatestPacket::LevelChunk(pk))
            | Packet::V630(v630::Packet::LevelChunk(pk)) => pk,
            other => panic!("unexpected {:?}", other),
        };
        let (back, _) =
            network_decode(&chunk.raw_payload, chunk.sub_chunk_count as usize, 0, range).unwrap();
        for y in range.min..=range.max {
            for x in 0..16u8 {
                for z in 0..16u8 {
                    prop_assert_eq!(back.block(x, y, z, 0), original.block(x, y, z, 0));
                }
            }
        }
        for x in 0..16u8 {
            for z in 0..16u8 {
                let y = original.highest_block(x, z);
                prop_assert_eq!(back.biome(x, y, z), original.biome(x, y, z));
            }
        }
    }
}

#[test]
fn test_unmapped_block_becomes_latest_air() {
    let registry = registry();
    let latest_air = latest_table().air_runtime_id();
    assert_eq!(latest_air, 1);
    assert_eq!(translator().upgrade_block(4_000), latest_air);

    let pk: Packet = LatestPacket::UpdateBlock(UpdateBlock {
        new_block_runtime_id: 4_000,
        ..Default::default()
    })
    .into();
    let out = single(registry.convert_to_latest(686, pk, &ConnContext::default()).unwrap());
    match out {
        Packet::Latest(LatestPacket::UpdateBlock(pk)) => {
            assert_eq!(pk.new_block_runtime_id, latest_air)
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_unknown_item_is_kept() {
    let pk: Packet = LatestPacket::MobEquipment(MobEquipment {
        new_item: stack(900),
        ..Default::default()
    })
    .into();
    let out = single(registry().convert_to_latest(671, pk.clone(), &ConnContext::default()).unwrap());
    assert_eq!(out, pk);
}

/// IDs whose presence or layout differs between two pools.
fn pool_diff(newer: &Pool<Packet>, older: &Pool<Packet>) -> Vec<u32> {
    let layouts = |pool: &Pool<Packet>| -> BTreeMap<u32, Option<i32>> {
        pool.ids()
            .map(|id| (id, pool.create(id).and_then(|pk| pk.layout())))
            .collect()
    };
    let (newer, older) = (layouts(newer), layouts(older));
    let mut ids: Vec<u32> = newer
        .keys()
        .chain(older.keys())
        .copied()
        .filter(|id| newer.get(id) != older.get(id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[test]
fn test_pool_diffs() {
    use Direction::{Clientbound as S, Serverbound as C};
    let latest = |d| crossgrade_protocol_core::latest_pool(d).map(Packet::Latest);

    let mut client_686 = vec![
        ids::DISCONNECT,
        ids::INVENTORY_TRANSACTION,
        ids::MOB_ARMOUR_EQUIPMENT,
        ids::PLAYER_AUTH_INPUT,
        ids::ITEM_STACK_REQUEST,
        ids::SERVER_BOUND_LOADING_SCREEN,
        ids::SERVER_BOUND_DIAGNOSTICS,
    ];
    client_686.sort_unstable();
    assert_eq!(pool_diff(&latest(C), &V686::pool(C)), client_686);
    assert_eq!(pool_diff(&latest(S), &V686::pool(S)).len(), 16);

    assert!(pool_diff(&V686::pool(C), &V685::pool(C)).is_empty());
    assert_eq!(
        pool_diff(&V686::pool(S), &V685::pool(S)),
        vec![ids::CLIENT_BOUND_CLOSE_FORM]
    );

    assert_eq!(
        pool_diff(&V685::pool(C), &V671::pool(C)),
        vec![ids::TEXT, ids::CONTAINER_CLOSE, ids::CODE_BUILDER_SOURCE]
    );
    assert_eq!(
        pool_diff(&V685::pool(S), &V671::pool(S)),
        vec![ids::TEXT, ids::START_GAME, ids::CONTAINER_CLOSE, ids::CRAFTING_DATA]
    );

    assert!(pool_diff(&V671::pool(C), &V662::pool(C)).is_empty());
    assert_eq!(
        pool_diff(&V671::pool(S), &V662::pool(S)),
        vec![
            ids::RESOURCE_PACK_STACK,
            ids::CRAFTING_DATA,
            ids::UPDATE_BLOCK_SYNCED,
            ids::UPDATE_PLAYER_GAME_TYPE
        ]
    );

    assert_eq!(
        pool_diff(&V662::pool(C), &V649::pool(C)),
        vec![ids::LECTERN_UPDATE, ids::PLAYER_AUTH_INPUT]
    );
    assert_eq!(
        pool_diff(&V662::pool(S), &V649::pool(S)),
        vec![ids::RESOURCE_PACKS_INFO, ids::MOB_EFFECT, ids::SET_ACTOR_MOTION]
    );

    assert_eq!(
        pool_diff(&V649::pool(C), &V630::pool(C)),
        vec![ids::PLAYER_AUTH_INPUT]
    );
    assert_eq!(
        pool_diff(&V649::pool(S), &V630::pool(S)),
        vec![ids::LEVEL_CHUNK, ids::PLAYER_LIST, ids::SET_HUD]
    );
}

#[test]
fn test_default_step_decides_identifier_packets() {
    let registry = registry();
    let t = translator();
    let ctx = ConnContext::default();
    let packets: Vec<Packet> = vec![
        LatestPacket::UpdateBlock(UpdateBlock {
            new_block_runtime_id: 5,
            ..Default::default()
        })
        .into(),
        LatestPacket::MobEquipment(MobEquipment {
            new_item: stack(258),
            ..Default::default()
        })
        .into(),
        LatestPacket::UpdateSubChunkBlocks(UpdateSubChunkBlocks {
            blocks: vec![BlockChangeEntry {
                block_runtime_id: 2,
                ..Default::default()
            }],
            ..Default::default()
        })
        .into(),
    ];
    for protocol in LEGACY_VERSIONS {
        for pk in &packets {
            let translated = default_downgrade(pk.clone(), &t);
            assert!(translated.is_handled());
            let chain = registry.convert_from_latest(protocol, pk.clone(), &ctx).unwrap();
            assert_eq!(chain, vec![translated.into_inner()], "{} at {}", pk.name(), protocol);

            let translated = default_upgrade(pk.clone(), &t).into_inner();
            let chain = registry.convert_to_latest(protocol, pk.clone(), &ctx).unwrap();
            assert_eq!(chain, vec![translated], "{} at {}", pk.name(), protocol);
        }
    }
}

#[test]
fn test_auth_input_converges_from_every_version() {
    let registry = registry();
    let ctx = ConnContext::default();
    for protocol in LEGACY_VERSIONS {
        let p = registry.get(protocol).unwrap();
        let pk = p
            .packets(Direction::Serverbound)
            .create(ids::PLAYER_AUTH_INPUT)
            .unwrap();
        let pk = over_wire(p, Direction::Serverbound, pk);
        match single(p.convert_to_latest(pk, &ctx).unwrap()) {
            Packet::Latest(LatestPacket::PlayerAuthInput(_)) => {}
            other => panic!("{} gave {:?}", protocol, other),
        }
    }
}

#[test]
fn test_server_packets_keep_their_kind() {
    let registry = registry();
    let ctx = ConnContext::default();
    let player_list = LatestPacket::PlayerList(PlayerList {
        action_type: PLAYER_LIST_ACTION_ADD,
        entries: vec![PlayerListEntry {
            username: "alex".into(),
            xuid: "2535".into(),
            ..Default::default()
        }],
    });
    let crafting = LatestPacket::CraftingData(CraftingData {
        recipes: vec![Recipe::Shapeless(ShapelessRecipe {
            recipe_id: "bread".into(),
            output: vec![ItemStack::new(258, 1)],
            ..Default::default()
        })],
        ..Default::default()
    });
    for protocol in LEGACY_VERSIONS {
        let p = registry.get(protocol).unwrap();
        for pk in [&player_list, &crafting] {
            let down = single(p.convert_from_latest(pk.clone().into(), &ctx).unwrap());
            let received = over_wire(p, Direction::Clientbound, down.clone());
            assert_eq!(received, down, "{} at {}", pk.name(), protocol);
            assert_eq!(received.id(), pk.id());
            assert_eq!(received.name(), pk.name());
        }
    }
}

#[test]
fn test_analogue_input_crosses_two_hops() {
    let registry = registry();
    let p = registry.get(649).unwrap();
    let input = v686::PlayerAuthInput {
        pitch: 12.5,
        yaw: -90.0,
        position: Vec3::new(10.0, 70.5, -4.25),
        move_vector: Vec2::new(0.5, -0.3),
        input_data: INPUT_FLAG_CLIENT_PREDICTED_VEHICLE,
        tick: 1234,
        client_predicted_vehicle: -77,
        analogue_move_vector: Vec2::new(0.5, -0.3),
        ..Default::default()
    };
    let mut pk = Packet::V649(v649::Packet::PlayerAuthInput(input.clone()));
    let body = p.encode(&mut pk).unwrap();
    let out = registry
        .decode_to_latest(649, ids::PLAYER_AUTH_INPUT, &body, true, &ConnContext::default())
        .unwrap();
    let [Packet::Latest(LatestPacket::PlayerAuthInput(pk))] = out.as_slice() else {
        panic!("unexpected {:?}", out);
    };
    assert_eq!(pk.vehicle_rotation, Vec2::ZERO);
    assert_eq!(pk.analogue_move_vector.x.to_bits(), 0.5f32.to_bits());
    assert_eq!(pk.analogue_move_vector.y.to_bits(), (-0.3f32).to_bits());
    assert_eq!(pk.pitch, input.pitch);
    assert_eq!(pk.yaw, input.yaw);
    assert_eq!(pk.position, input.position);
    assert_eq!(pk.move_vector, input.move_vector);
    assert_eq!(pk.tick, input.tick);
    assert_eq!(pk.input_data, input.input_data);
    assert_eq!(pk.client_predicted_vehicle, -77);
}

#[test]
fn test_mismatched_hotbar_slot_is_rejected() {
    let registry = registry();
    let response = |hotbar_slot| -> Packet {
        LatestPacket::ItemStackResponse(ItemStackResponse {
            responses: vec![ItemStackResponseEntry {
                status: 0,
                request_id: 1,
                container_info: vec![StackResponseContainerInfo {
                    container: FullContainerName::new(28),
                    slot_info: vec![StackResponseSlotInfo {
                        slot: 1,
                        hotbar_slot,
                        count: 1,
                        ..Default::default()
                    }],
                }],
            }],
        })
        .into()
    };
    for protocol in LEGACY_VERSIONS {
        let p = registry.get(protocol).unwrap();
        let mut down = single(p.convert_from_latest(response(2), &ConnContext::default()).unwrap());
        assert!(
            matches!(p.encode(&mut down), Err(CodecError::InvalidValue { .. })),
            "protocol {}",
            protocol
        );
        let mut ok = single(p.convert_from_latest(response(1), &ConnContext::default()).unwrap());
        assert!(p.encode(&mut ok).is_ok());
    }
    assert!(registry.latest().encode(&mut response(2)).is_ok());
}
