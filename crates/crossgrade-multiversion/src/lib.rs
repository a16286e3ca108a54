//! Translation between older Bedrock protocol revisions and the latest one.
//!
//! Every supported version is a [`Protocol`] adapter. A packet read by an old
//! client is upgraded step by step through each newer revision until it reaches
//! the latest shape; server packets walk the same chain in reverse.

pub mod latest;
pub mod packet;
pub mod protocol;
pub mod registry;
pub mod translate;
pub mod v630;
pub mod v649;
pub mod v662;
pub mod v671;
pub mod v685;
pub mod v686;

pub use latest::Latest;
pub use packet::Packet;
pub use protocol::*;
pub use registry::{Registry, RegistryError};
pub use translate::{Translated, Translator};
pub use v630::V630;
pub use v649::V649;
pub use v662::V662;
pub use v671::V671;
pub use v685::V685;
pub use v686::V686;
