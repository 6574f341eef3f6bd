use anyhow::{Context, Result};
use portal_authz::{ClaimMappings, PolicyDocument};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";

// Gateway configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    // HTTP listener bind address.
    pub bind_addr: SocketAddr,
    // Metrics HTTP listener bind address.
    pub metrics_bind: SocketAddr,
    // Optional YAML file with policy declarations applied over the built-in ones.
    pub policy_file: Option<PathBuf>,
    // Claim names used when decoding bearer credentials.
    pub claim_mappings: ClaimMappings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GatewayConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    policy_file: Option<String>,
    claim_mappings: Option<ClaimMappings>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("PORTAL_GATEWAY_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse PORTAL_GATEWAY_BIND")?;
        let metrics_bind = std::env::var("PORTAL_GATEWAY_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse PORTAL_GATEWAY_METRICS_BIND")?;
        let policy_file = std::env::var("PORTAL_GATEWAY_POLICY_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self {
            bind_addr,
            metrics_bind,
            policy_file,
            claim_mappings: ClaimMappings::default(),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("PORTAL_GATEWAY_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read PORTAL_GATEWAY_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: GatewayConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse gateway config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.policy_file {
            self.policy_file = Some(PathBuf::from(value));
        }
        if let Some(value) = override_cfg.claim_mappings {
            self.claim_mappings = value;
        }
        Ok(())
    }
}

pub fn load_policy_document(path: &Path) -> Result<PolicyDocument> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read policy file: {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("parse policy file: {}", path.display()))
}
