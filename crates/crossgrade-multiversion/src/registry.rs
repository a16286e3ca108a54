use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crossgrade_mappings::Mapping;
use crossgrade_protocol_core::{CodecError, Direction};
use thiserror::Error;

use crate::latest::{self, Latest};
use crate::protocol::{Adapter, ConnContext, Protocol, Version};
use crate::{Packet, V630, V649, V662, V671, V685, V686};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unsupported protocol {0}")]
    UnsupportedProtocol(i32),
    #[error("No mapping loaded for protocol {0}")]
    MissingMapping(i32),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Every supported protocol, built once at startup and shared read-only
/// between connections.
pub struct Registry {
    protocols: BTreeMap<i32, Arc<dyn Protocol>>,
}

impl Registry {
    /// Builds the latest protocol and one adapter per legacy version.
    ///
    /// `mappings` is keyed by protocol number; a version whose table is shared
    /// with a newer one looks that newer protocol up instead.
    pub fn new(
        latest: Arc<dyn Mapping>,
        mappings: &HashMap<i32, Arc<dyn Mapping>>,
    ) -> Result<Self, RegistryError> {
        let mut protocols: BTreeMap<i32, Arc<dyn Protocol>> = BTreeMap::new();
        protocols.insert(latest::ID, Arc::new(Latest::new()));
        add::<V686>(&mut protocols, &latest, mappings)?;
        add::<V685>(&mut protocols, &latest, mappings)?;
        add::<V671>(&mut protocols, &latest, mappings)?;
        add::<V662>(&mut protocols, &latest, mappings)?;
        add::<V649>(&mut protocols, &latest, mappings)?;
        add::<V630>(&mut protocols, &latest, mappings)?;
        Ok(Self { protocols })
    }

    pub fn get(&self, protocol: i32) -> Result<&dyn Protocol, RegistryError> {
        self.protocols
            .get(&protocol)
            .map(|p| p.as_ref())
            .ok_or(RegistryError::UnsupportedProtocol(protocol))
    }

    /// Shared handle to a protocol, for moving into a connection task.
    pub fn protocol(&self, protocol: i32) -> Result<Arc<dyn Protocol>, RegistryError> {
        self.protocols
            .get(&protocol)
            .cloned()
            .ok_or(RegistryError::UnsupportedProtocol(protocol))
    }

    pub fn latest(&self) -> &dyn Protocol {
        self.protocols[&latest::ID].as_ref()
    }

    pub fn supports(&self, protocol: i32) -> bool {
        self.protocols.contains_key(&protocol)
    }

    /// Protocol numbers and game versions, newest first.
    pub fn versions(&self) -> Vec<(i32, &'static str)> {
        self.protocols
            .values()
            .rev()
            .map(|p| (p.id(), p.version()))
            .collect()
    }

    pub fn convert_to_latest(
        &self,
        protocol: i32,
        pk: Packet,
        ctx: &ConnContext,
    ) -> Result<Vec<Packet>, RegistryError> {
        Ok(self.get(protocol)?.convert_to_latest(pk, ctx)?)
    }

    pub fn convert_from_latest(
        &self,
        protocol: i32,
        pk: Packet,
        ctx: &ConnContext,
    ) -> Result<Vec<Packet>, RegistryError> {
        Ok(self.get(protocol)?.convert_from_latest(pk, ctx)?)
    }

    /// Decodes a client packet sent by `protocol` and converts it to the latest shape.
    pub fn decode_to_latest(
        &self,
        protocol: i32,
        id: u32,
        payload: &[u8],
        enable_limits: bool,
        ctx: &ConnContext,
    ) -> Result<Vec<Packet>, RegistryError> {
        let p = self.get(protocol)?;
        let pk = p.decode(Direction::Serverbound, id, payload, enable_limits)?;
        Ok(p.convert_to_latest(pk, ctx)?)
    }
}

fn add<V: Version>(
    protocols: &mut BTreeMap<i32, Arc<dyn Protocol>>,
    latest: &Arc<dyn Mapping>,
    mappings: &HashMap<i32, Arc<dyn Mapping>>,
) -> Result<(), RegistryError> {
    let legacy = mappings
        .get(&V::MAPPING)
        .ok_or(RegistryError::MissingMapping(V::MAPPING))?;
    protocols.insert(V::ID, Arc::new(Adapter::<V>::new(legacy.clone(), latest.clone())));
    Ok(())
}
