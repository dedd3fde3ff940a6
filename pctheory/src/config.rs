// Engine configuration.
//
// Every tunable choice the engine exposes lives in `EngineConfig`, loaded
// from JSON (missing fields take their defaults). The transformation
// registry is chosen here once and then fixed; nothing reads the config
// per operator application.
//
// See `set_complex.rs` for the cardinality window and `pcseg.rs` for the
// imbrication policy.

use crate::error::{PcError, Result};
use crate::pcseg::Imbrication;
use crate::transformations::GroupKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Registry used to classify set-classes.
    pub group: GroupKind,
    /// Window policy for imbrication.
    pub imbrication: Imbrication,
    /// Smallest cardinality admitted to a set complex.
    pub min_cardinality: usize,
    /// Largest cardinality admitted to a set complex.
    pub max_cardinality: usize,
    /// Fan subset enumeration and complex construction out over rayon.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            group: GroupKind::Ordered,
            imbrication: Imbrication::Linear,
            min_cardinality: 1,
            max_cardinality: 11,
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| PcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PcError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_cardinality > self.max_cardinality || self.max_cardinality > 12 {
            return Err(PcError::Config(format!(
                "cardinality window {}..={} must lie within 0..=12",
                self.min_cardinality, self.max_cardinality
            )));
        }
        Ok(())
    }

    /// Whether a set complex may contain classes of this cardinality.
    pub fn admits(&self, cardinality: usize) -> bool {
        (self.min_cardinality..=self.max_cardinality).contains(&cardinality)
    }
}
