//! Replays captured packet bodies through the version chain.
//!
//! A capture holds one packet per line: `C` or `S` for the side that sent it,
//! the packet ID, and the hex encoded body. Blank lines and lines starting
//! with `#` are skipped.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use crossgrade_multiversion::{ConnContext, Packet, Protocol, Registry};
use crossgrade_protocol_core::Direction;
use tracing::{debug, info};

use crate::config::CaptureConfig;

/// The side that sent a captured packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Client,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureLine {
    pub origin: Origin,
    pub id: u32,
    pub payload: Vec<u8>,
}

pub fn parse_line(line: &str) -> anyhow::Result<Option<CaptureLine>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let origin = match parts.next() {
        Some("C") => Origin::Client,
        Some("S") => Origin::Server,
        Some(other) => bail!("Unknown sender {:?}", other),
        None => bail!("Empty line"),
    };
    let id = parts
        .next()
        .ok_or_else(|| anyhow!("Missing packet ID"))?
        .parse()
        .context("Invalid packet ID")?;
    let payload = hex::decode(parts.next().unwrap_or("")).context("Invalid hex payload")?;
    if parts.next().is_some() {
        bail!("Trailing fields");
    }
    Ok(Some(CaptureLine {
        origin,
        id,
        payload,
    }))
}

/// Counts kept for one replayed capture.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    pub client_packets: usize,
    pub server_packets: usize,
    /// Packets produced on the far side of the chain.
    pub translated: usize,
    /// Packets the chain dropped for the target version.
    pub dropped: usize,
    pub bytes_out: usize,
}

/// Translates one captured packet, returning the encoded results.
///
/// Client packets are decoded with the capture's protocol and upgraded; server
/// packets are decoded with the latest protocol and downgraded.
pub fn translate_line(
    registry: &Registry,
    protocol: &dyn Protocol,
    line: &CaptureLine,
    enable_limits: bool,
    ctx: &ConnContext,
) -> anyhow::Result<Vec<Vec<u8>>> {
    let (from, to, direction) = match line.origin {
        Origin::Client => (protocol, registry.latest(), Direction::Serverbound),
        Origin::Server => (registry.latest(), protocol, Direction::Clientbound),
    };
    let pk = from.decode(direction, line.id, &line.payload, enable_limits)?;
    let name = pk.name();
    let out: Vec<Packet> = match line.origin {
        Origin::Client => protocol.convert_to_latest(pk, ctx)?,
        Origin::Server => protocol.convert_from_latest(pk, ctx)?,
    };
    debug!("conn {}: {} {} -> {} packets", ctx.id, name, line.id, out.len());
    out.into_iter()
        .map(|mut pk| Ok(to.encode(&mut pk)?.to_vec()))
        .collect()
}

pub fn replay_str(
    registry: &Registry,
    protocol: i32,
    capture: &str,
    enable_limits: bool,
    ctx: &ConnContext,
) -> anyhow::Result<ReplayStats> {
    let p = registry.get(protocol)?;
    let mut stats = ReplayStats::default();
    for (n, text) in capture.lines().enumerate() {
        let Some(line) = parse_line(text).with_context(|| format!("line {}", n + 1))? else {
            continue;
        };
        match line.origin {
            Origin::Client => stats.client_packets += 1,
            Origin::Server => stats.server_packets += 1,
        }
        let out = translate_line(registry, p, &line, enable_limits, ctx)
            .with_context(|| format!("line {}: packet {}", n + 1, line.id))?;
        if out.is_empty() {
            stats.dropped += 1;
        }
        stats.translated += out.len();
        stats.bytes_out += out.iter().map(Vec::len).sum::<usize>();
    }
    Ok(stats)
}

/// Replays one capture file as its own connection.
pub async fn replay_capture(
    registry: Arc<Registry>,
    capture: CaptureConfig,
    conn_id: u64,
    enable_limits: bool,
) -> anyhow::Result<ReplayStats> {
    let contents = tokio::fs::read_to_string(&capture.path)
        .await
        .with_context(|| format!("Cannot read capture {}", capture.path))?;
    let ctx = ConnContext::new(conn_id);
    let stats = replay_str(&registry, capture.protocol, &contents, enable_limits, &ctx)
        .with_context(|| format!("Capture {}", capture.path))?;
    info!(
        "conn {}: replayed {} ({}): {} client, {} server, {} out, {} dropped, {} bytes",
        conn_id,
        capture.path,
        capture.protocol,
        stats.client_packets,
        stats.server_packets,
        stats.translated,
        stats.dropped,
        stats.bytes_out
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossgrade_mappings::{Mapping, MappingTable};
    use crossgrade_multiversion::v671;
    use crossgrade_protocol_core::{ids, LatestPacket, SetHud, Text, UpdateBlock, TEXT_TYPE_CHAT};
    use serde_json::json;
    use std::collections::HashMap;
    use std::io::Write;

    fn table(blocks: &[&str]) -> Arc<dyn Mapping> {
        let blocks: Vec<_> = blocks.iter().map(|name| json!({ "name": name })).collect();
        let doc = json!({ "blocks": blocks, "items": [] });
        Arc::new(MappingTable::from_json(&doc.to_string()).unwrap())
    }

    fn registry() -> Registry {
        let legacy = table(&["minecraft:air", "minecraft:stone"]);
        let mappings: HashMap<i32, Arc<dyn Mapping>> = [686, 671, 662, 649, 630]
            .into_iter()
            .map(|p| (p, legacy.clone()))
            .collect();
        Registry::new(table(&["minecraft:stone", "minecraft:air"]), &mappings).unwrap()
    }

    fn body(p: &dyn Protocol, pk: impl Into<Packet>) -> String {
        hex::encode(p.encode(&mut pk.into()).unwrap())
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("  # note").unwrap(), None);
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(
            parse_line("S 21 0a0b").unwrap(),
            Some(CaptureLine {
                origin: Origin::Server,
                id: 21,
                payload: vec![0x0a, 0x0b],
            })
        );
        assert_eq!(parse_line("C 308").unwrap().unwrap().payload, Vec::<u8>::new());
        assert!(parse_line("X 1 00").is_err());
        assert!(parse_line("C one 00").is_err());
        assert!(parse_line("C 1 0g").is_err());
        assert!(parse_line("C 1 00 extra").is_err());
    }

    #[test]
    fn test_replay_both_sides() {
        let registry = registry();
        let old = registry.get(671).unwrap();
        let text = Text {
            text_type: TEXT_TYPE_CHAT,
            source_name: "steve".into(),
            message: "hello".into(),
            ..Default::default()
        };
        let block = UpdateBlock {
            new_block_runtime_id: 0,
            ..Default::default()
        };
        let capture = format!(
            "# login\nC {} {}\nS {} {}\nS {} {}\n",
            ids::TEXT,
            body(old, v671::Packet::Text(text)),
            ids::UPDATE_BLOCK,
            body(registry.latest(), LatestPacket::UpdateBlock(block)),
            ids::SET_HUD,
            body(registry.latest(), LatestPacket::SetHud(SetHud::default())),
        );
        let stats = replay_str(&registry, 630, &capture, true, &ConnContext::new(9)).unwrap();
        assert_eq!(stats.client_packets, 1);
        assert_eq!(stats.server_packets, 2);
        assert_eq!(stats.translated, 2);
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn test_server_block_is_downgraded() {
        let registry = registry();
        let line = CaptureLine {
            origin: Origin::Server,
            id: ids::UPDATE_BLOCK,
            payload: hex::decode(body(
                registry.latest(),
                LatestPacket::UpdateBlock(UpdateBlock {
                    new_block_runtime_id: 0,
                    ..Default::default()
                }),
            ))
            .unwrap(),
        };
        let p = registry.get(686).unwrap();
        let out = translate_line(&registry, p, &line, true, &ConnContext::default()).unwrap();
        let expected = body(
            p,
            LatestPacket::UpdateBlock(UpdateBlock {
                new_block_runtime_id: 1,
                ..Default::default()
            }),
        );
        assert_eq!(hex::encode(&out[0]), expected);
    }

    #[test]
    fn test_bad_line_stops_capture() {
        let registry = registry();
        let err = replay_str(&registry, 686, "C 9 ff\n", true, &ConnContext::default())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("line 1"));
        assert!(replay_str(&registry, 12, "", true, &ConnContext::default()).is_err());
    }

    #[tokio::test]
    async fn test_replay_capture_file() {
        let registry = Arc::new(registry());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let pk = body(registry.latest(), LatestPacket::SetHud(SetHud::default()));
        writeln!(file, "S {} {}", ids::SET_HUD, pk).unwrap();
        let capture = CaptureConfig {
            path: file.path().display().to_string(),
            protocol: 649,
        };
        let stats = replay_capture(registry, capture, 1, true).await.unwrap();
        assert_eq!(stats.server_packets, 1);
        assert_eq!(stats.translated, 1);
    }
}
