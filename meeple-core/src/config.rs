//! Claim configuration

use crate::layout::Layout;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the turn check guards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnGate {
    /// Out of turn, the claim intent is not sent but the claim still applies locally
    #[default]
    TransmitOnly,
    /// Out of turn, the whole claim is refused
    Strict,
}

/// Claim coordination settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    pub turn_gate: TurnGate,
    /// Re-check eligibility against the store before applying a claim
    pub revalidate: bool,
    pub layout: Layout,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            turn_gate: TurnGate::TransmitOnly,
            revalidate: true,
            layout: Layout::default(),
        }
    }
}

impl ClaimConfig {
    /// Set the turn gate policy
    pub fn with_turn_gate(mut self, turn_gate: TurnGate) -> Self {
        self.turn_gate = turn_gate;
        self
    }

    /// Enable or disable claim-time revalidation
    pub fn with_revalidate(mut self, revalidate: bool) -> Self {
        self.revalidate = revalidate;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Load from JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_config_defaults() {
        let config = ClaimConfig::default();
        assert_eq!(config.turn_gate, TurnGate::TransmitOnly);
        assert!(config.revalidate);
        assert_eq!(config.layout, Layout::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClaimConfig =
            serde_json::from_str(r#"{"turn_gate":"strict","layout":{"tile_size":64.0}}"#).unwrap();
        assert_eq!(config.turn_gate, TurnGate::Strict);
        assert!(config.revalidate);
        assert_eq!(config.layout.tile_size, 64.0);
    }

    #[test]
    fn test_builders() {
        let config = ClaimConfig::default()
            .with_turn_gate(TurnGate::Strict)
            .with_revalidate(false);
        assert_eq!(config.turn_gate, TurnGate::Strict);
        assert!(!config.revalidate);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("meeple-config-{}.json", std::process::id()));
        let config = ClaimConfig::default().with_revalidate(false);
        config.save(&path).unwrap();
        let loaded = ClaimConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
