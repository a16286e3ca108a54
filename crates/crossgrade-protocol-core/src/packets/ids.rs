//! Packet IDs shared by every supported protocol version.

pub const DISCONNECT: u32 = 5;
pub const RESOURCE_PACKS_INFO: u32 = 6;
pub const RESOURCE_PACK_STACK: u32 = 7;
pub const TEXT: u32 = 9;
pub const START_GAME: u32 = 11;
pub const ADD_PLAYER: u32 = 12;
pub const ADD_ACTOR: u32 = 13;
pub const ADD_ITEM_ACTOR: u32 = 15;
pub const UPDATE_BLOCK: u32 = 21;
pub const LEVEL_EVENT: u32 = 25;
pub const MOB_EFFECT: u32 = 28;
pub const INVENTORY_TRANSACTION: u32 = 30;
pub const MOB_EQUIPMENT: u32 = 31;
pub const MOB_ARMOUR_EQUIPMENT: u32 = 32;
pub const SET_ACTOR_DATA: u32 = 39;
pub const SET_ACTOR_MOTION: u32 = 40;
pub const SET_ACTOR_LINK: u32 = 41;
pub const CONTAINER_CLOSE: u32 = 47;
pub const INVENTORY_CONTENT: u32 = 49;
pub const INVENTORY_SLOT: u32 = 50;
pub const CRAFTING_DATA: u32 = 52;
pub const LEVEL_CHUNK: u32 = 58;
pub const CHANGE_DIMENSION: u32 = 61;
pub const PLAYER_LIST: u32 = 63;
pub const AVAILABLE_COMMANDS: u32 = 76;
pub const STOP_SOUND: u32 = 87;
pub const SET_TITLE: u32 = 88;
pub const UPDATE_BLOCK_SYNCED: u32 = 110;
pub const LEVEL_SOUND_EVENT: u32 = 123;
pub const LECTERN_UPDATE: u32 = 125;
pub const CLIENT_CACHE_MISS_RESPONSE: u32 = 136;
pub const PLAYER_AUTH_INPUT: u32 = 144;
pub const CREATIVE_CONTENT: u32 = 145;
pub const ITEM_STACK_REQUEST: u32 = 147;
pub const ITEM_STACK_RESPONSE: u32 = 148;
pub const UPDATE_PLAYER_GAME_TYPE: u32 = 151;
pub const CORRECT_PLAYER_MOVE_PREDICTION: u32 = 161;
pub const UPDATE_SUB_CHUNK_BLOCKS: u32 = 172;
pub const SUB_CHUNK: u32 = 174;
pub const CODE_BUILDER_SOURCE: u32 = 178;
pub const CAMERA_INSTRUCTION: u32 = 300;
pub const SET_HUD: u32 = 308;
pub const CLIENT_BOUND_CLOSE_FORM: u32 = 310;
pub const SERVER_BOUND_LOADING_SCREEN: u32 = 312;
pub const JIGSAW_STRUCTURE_DATA: u32 = 313;
pub const CURRENT_STRUCTURE_FEATURE: u32 = 314;
pub const SERVER_BOUND_DIAGNOSTICS: u32 = 315;
