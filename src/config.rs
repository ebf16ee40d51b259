//! Engine configuration

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::tax::DefaultRateTable;
use crate::types::{EngineError, EngineResult};

/// Smallest number of fractional digits a persisted amount may carry
pub const MIN_PERSISTED_SCALE: i64 = 2;

fn default_persisted_scale() -> i64 {
    4
}

/// Settings shared by every computation of an [`ExpenseEngine`](crate::ExpenseEngine).
///
/// ```toml
/// persisted_scale = 4
///
/// [default_rates]
/// GST = "18"
/// CGST_SGST = "12"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default total rate per tax type, applied when the tax type changes
    #[serde(default)]
    pub default_rates: DefaultRateTable,
    /// Fractional digits kept for monetary values in persisted payloads
    #[serde(default = "default_persisted_scale")]
    pub persisted_scale: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_rates: DefaultRateTable::default(),
            persisted_scale: default_persisted_scale(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document and validate the result
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.persisted_scale < MIN_PERSISTED_SCALE {
            return Err(EngineError::InvalidConfig(format!(
                "persisted_scale must be at least {}, got {}",
                MIN_PERSISTED_SCALE, self.persisted_scale
            )));
        }

        for (tax_type, rate) in self.default_rates.iter() {
            if *rate < BigDecimal::from(0) || *rate > BigDecimal::from(100) {
                return Err(EngineError::InvalidConfig(format!(
                    "default rate for {} must be within 0-100, got {}",
                    tax_type, rate
                )));
            }
        }

        Ok(())
    }
}
