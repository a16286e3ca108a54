use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_mappings_dir")]
    pub mappings_dir: String,
    #[serde(default = "default_latest_mapping")]
    pub latest_mapping: String,
    /// Protocol number to mapping file name, relative to `mappings_dir`.
    #[serde(default = "default_versions")]
    pub versions: BTreeMap<String, String>,
    #[serde(default = "default_enable_limits")]
    pub enable_limits: bool,
    #[serde(default)]
    pub captures: Vec<CaptureConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CaptureConfig {
    pub path: String,
    pub protocol: i32,
}

fn default_mappings_dir() -> String {
    "mappings".into()
}

fn default_latest_mapping() -> String {
    "712.json".into()
}

fn default_versions() -> BTreeMap<String, String> {
    [686, 671, 662, 649, 630]
        .into_iter()
        .map(|p| (p.to_string(), format!("{}.json", p)))
        .collect()
}

fn default_enable_limits() -> bool {
    true
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mappings_dir: default_mappings_dir(),
            latest_mapping: default_latest_mapping(),
            versions: default_versions(),
            enable_limits: default_enable_limits(),
            captures: Vec::new(),
        }
    }
}

impl BridgeConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: BridgeConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::info!("No config file found at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn latest_mapping_path(&self) -> PathBuf {
        Path::new(&self.mappings_dir).join(&self.latest_mapping)
    }

    /// Mapping file of every configured protocol.
    pub fn version_paths(&self) -> anyhow::Result<Vec<(i32, PathBuf)>> {
        self.versions
            .iter()
            .map(|(protocol, file)| {
                let protocol: i32 = protocol
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid protocol number {:?} in [versions]", protocol))?;
                Ok((protocol, Path::new(&self.mappings_dir).join(file)))
            })
            .collect()
    }
}
