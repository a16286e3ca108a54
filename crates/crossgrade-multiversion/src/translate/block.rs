use crossgrade_mappings::Mapping;

/// Maps a legacy block runtime ID into the latest ID space.
///
/// Both a legacy ID without a state and a state the latest table lacks
/// resolve to latest air.
pub fn upgrade_block_runtime_id(id: u32, legacy: &dyn Mapping, latest: &dyn Mapping) -> u32 {
    let Some(state) = legacy.runtime_id_to_state(id) else {
        return latest.air_runtime_id();
    };
    latest
        .state_to_runtime_id(&state.name, &state.properties)
        .unwrap_or_else(|| latest.air_runtime_id())
}

/// Maps a latest block runtime ID into a legacy ID space, falling back to legacy air.
pub fn downgrade_block_runtime_id(id: u32, legacy: &dyn Mapping, latest: &dyn Mapping) -> u32 {
    let Some(state) = latest.runtime_id_to_state(id) else {
        return legacy.air_runtime_id();
    };
    legacy
        .state_to_runtime_id(&state.name, &state.properties)
        .unwrap_or_else(|| legacy.air_runtime_id())
}
