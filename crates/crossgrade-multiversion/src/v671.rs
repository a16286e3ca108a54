//! Protocol 671, game version 1.20.80.

use crossgrade_protocol_core as latest;
use crossgrade_protocol_core::{
    ids, CodecResult, Direction, ExperimentData, Io, LatestPacket, Marshal, Pool, RecipeLayout,
};

use crate::protocol::{ConnContext, Version};
use crate::v685::V685;

/// Experiment 1.20.80 clients need to see the 1.21 content the server sends.
pub const UPDATE_ANNOUNCED_LIVE_2023: &str = "updateAnnouncedLive2023";

/// Recipes without unlocking requirements.
pub const RECIPE_LAYOUT: RecipeLayout = RecipeLayout {
    unlocking_requirement: false,
    assume_symmetry: true,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerClose {
    pub window_id: u8,
    pub server_side: bool,
}

impl Marshal for ContainerClose {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.window_id)?;
        io.bool(&mut self.server_side)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBuilderSource {
    pub operation: u8,
    pub category: u8,
}

impl Marshal for CodeBuilderSource {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.operation)?;
        io.u8(&mut self.category)
    }
}

crate::packet::legacy_packets! {
    ContainerClose(ContainerClose) = ids::CONTAINER_CLOSE => |pk, io| pk.marshal(io),
    Text(latest::Text) = ids::TEXT => |pk, io| pk.marshal_base(io),
    CodeBuilderSource(CodeBuilderSource) = ids::CODE_BUILDER_SOURCE => |pk, io| pk.marshal(io),
    CraftingData(latest::CraftingData) = ids::CRAFTING_DATA => |pk, io| {
        pk.marshal_with(io, RECIPE_LAYOUT)
    },
    StartGame(latest::StartGame) = ids::START_GAME => |pk, io| pk.marshal_base(io),
}

impl From<Packet> for crate::Packet {
    fn from(pk: Packet) -> Self {
        crate::Packet::V671(pk)
    }
}

fn new<T: Default + Into<Packet>>() -> crate::Packet {
    crate::Packet::V671(T::default().into())
}

pub struct V671;

impl Version for V671 {
    const ID: i32 = 671;
    const NAME: &'static str = "1.20.80";

    fn pool(direction: Direction) -> Pool<crate::Packet> {
        let pool = V685::pool(direction)
            .with(ids::CONTAINER_CLOSE, new::<ContainerClose>)
            .with(ids::TEXT, new::<latest::Text>);
        match direction {
            Direction::Serverbound => pool.with(ids::CODE_BUILDER_SOURCE, new::<CodeBuilderSource>),
            Direction::Clientbound => pool
                .with(ids::CRAFTING_DATA, new::<latest::CraftingData>)
                .with(ids::START_GAME, new::<latest::StartGame>),
        }
    }

    fn upgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        let pks = pks.into_iter().map(upgrade).collect();
        V685::upgrade(pks, ctx)
    }

    fn downgrade(pks: Vec<crate::Packet>, ctx: &ConnContext) -> CodecResult<Vec<crate::Packet>> {
        let pks = V685::downgrade(pks, ctx)?;
        Ok(pks.into_iter().map(downgrade).collect())
    }
}

fn upgrade(pk: crate::Packet) -> crate::Packet {
    let crate::Packet::V671(pk) = pk else {
        return pk;
    };
    let latest = match pk {
        Packet::ContainerClose(pk) => LatestPacket::ContainerClose(latest::ContainerClose {
            window_id: pk.window_id,
            container_type: 0,
            server_side: pk.server_side,
        }),
        Packet::Text(pk) => LatestPacket::Text(pk),
        Packet::CodeBuilderSource(pk) => LatestPacket::CodeBuilderSource(latest::CodeBuilderSource {
            operation: pk.operation,
            category: pk.category,
            code_status: 0,
        }),
        other => return crate::Packet::V671(other),
    };
    crate::Packet::Latest(latest)
}

fn announce_experiment(experiments: &mut Vec<ExperimentData>) {
    experiments.push(ExperimentData::enabled(UPDATE_ANNOUNCED_LIVE_2023));
}

fn downgrade(pk: crate::Packet) -> crate::Packet {
    let crate::Packet::Latest(pk) = pk else {
        return pk;
    };
    let legacy = match pk {
        LatestPacket::CraftingData(pk) => Packet::CraftingData(pk),
        LatestPacket::ContainerClose(pk) => Packet::ContainerClose(ContainerClose {
            window_id: pk.window_id,
            server_side: pk.server_side,
        }),
        LatestPacket::Text(pk) => Packet::Text(pk),
        LatestPacket::ResourcePackStack(mut pk) => {
            announce_experiment(&mut pk.experiments);
            return crate::Packet::Latest(LatestPacket::ResourcePackStack(pk));
        }
        LatestPacket::StartGame(mut pk) => {
            announce_experiment(&mut pk.experiments);
            Packet::StartGame(pk)
        }
        other => return crate::Packet::Latest(other),
    };
    crate::Packet::V671(legacy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use crossgrade_protocol_core::{
        ItemDescriptor, ItemDescriptorCount, Reader, Recipe, ShapedRecipe, StartGame, Text, Writer,
        TEXT_TYPE_CHAT,
    };
    use crossgrade_types::ItemStack;

    fn ctx() -> ConnContext {
        ConnContext::default()
    }

    #[test]
    fn test_start_game_announces_experiment() {
        let pk = StartGame {
            level_id: "level".into(),
            server_id: "srv".into(),
            ..Default::default()
        };
        let out = V671::downgrade(vec![LatestPacket::StartGame(pk).into()], &ctx()).unwrap();
        let [crate::Packet::V671(Packet::StartGame(down))] = out.as_slice() else {
            panic!("unexpected {:?}", out);
        };
        assert_eq!(down.level_id, "level");
        assert_eq!(down.experiments, vec![ExperimentData::enabled(UPDATE_ANNOUNCED_LIVE_2023)]);

        let mut buf = BytesMut::new();
        let mut pk = crate::Packet::V671(Packet::StartGame(down.clone()));
        pk.marshal(&mut Writer::new(&mut buf)).unwrap();
        let mut full = StartGame::default();
        assert!(full.marshal(&mut Reader::new(&buf)).is_err());
    }

    #[test]
    fn test_pack_stack_keeps_latest_layout() {
        let out = V671::downgrade(
            vec![LatestPacket::ResourcePackStack(Default::default()).into()],
            &ctx(),
        )
        .unwrap();
        match out.as_slice() {
            [crate::Packet::Latest(LatestPacket::ResourcePackStack(pk))] => {
                assert_eq!(pk.experiments.len(), 1);
                assert_eq!(pk.experiments[0].name, UPDATE_ANNOUNCED_LIVE_2023);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_crafting_data_keeps_recipes() {
        let recipe = Recipe::Shaped(ShapedRecipe {
            recipe_id: "stick".into(),
            width: 1,
            height: 2,
            input: vec![
                ItemDescriptorCount {
                    descriptor: ItemDescriptor::Default {
                        network_id: 5,
                        metadata: 0,
                    },
                    count: 1,
                };
                2
            ],
            output: vec![ItemStack::new(280, 4)],
            assume_symmetry: true,
            ..Default::default()
        });
        let pk = latest::CraftingData {
            recipes: vec![recipe.clone()],
            clear_recipes: true,
            ..Default::default()
        };
        let out = V671::downgrade(vec![LatestPacket::CraftingData(pk).into()], &ctx()).unwrap();
        let mut pk = out.into_iter().next().unwrap();
        assert_eq!(pk.layout(), Some(671));

        let mut buf = BytesMut::new();
        pk.marshal(&mut Writer::new(&mut buf)).unwrap();
        let mut back = V671::pool(Direction::Clientbound)
            .create(ids::CRAFTING_DATA)
            .unwrap();
        back.marshal(&mut Reader::new(&buf)).unwrap();
        let crate::Packet::V671(Packet::CraftingData(back)) = back else {
            panic!("unexpected {:?}", back);
        };
        assert_eq!(back.recipes, vec![recipe]);
        assert!(back.clear_recipes);
    }

    #[test]
    fn test_client_packets_upgrade() {
        let pks = vec![
            Packet::ContainerClose(ContainerClose {
                window_id: 3,
                server_side: true,
            })
            .into(),
            Packet::Text(Text {
                text_type: TEXT_TYPE_CHAT,
                message: "hi".into(),
                ..Default::default()
            })
            .into(),
            Packet::CodeBuilderSource(CodeBuilderSource {
                operation: 1,
                category: 2,
            })
            .into(),
        ];
        let out = V671::upgrade(pks, &ctx()).unwrap();
        assert!(out.iter().all(|pk| pk.layout().is_none()));
        assert!(matches!(
            &out[0],
            crate::Packet::Latest(LatestPacket::ContainerClose(latest::ContainerClose {
                window_id: 3,
                container_type: 0,
                server_side: true,
            }))
        ));
    }

    #[test]
    fn test_pools_inherit_newer_layouts() {
        let server = V671::pool(Direction::Clientbound);
        assert!(!server.contains(ids::CLIENT_BOUND_CLOSE_FORM));
        assert_eq!(server.create(ids::DISCONNECT).unwrap().layout(), Some(686));
        assert_eq!(server.create(ids::START_GAME).unwrap().layout(), Some(671));
        let client = V671::pool(Direction::Serverbound);
        assert_eq!(client.create(ids::CODE_BUILDER_SOURCE).unwrap().layout(), Some(671));
        assert!(!client.contains(ids::CRAFTING_DATA));
    }
}
