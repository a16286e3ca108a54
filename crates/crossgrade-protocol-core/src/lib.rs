pub mod codec;
pub mod direction;
pub mod item;
pub mod packets;
pub mod pool;

pub use codec::*;
pub use direction::*;
pub use item::*;
pub use packets::*;
pub use pool::*;
