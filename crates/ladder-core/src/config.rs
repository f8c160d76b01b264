//! # Vault Configuration
//!
//! TOML description of a vault: identities, fee rates, deposit cap, the initial
//! ladder and the swap allow-list. Amounts are decimal strings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_QUOTE_DECIMALS_OFFSET;
use crate::error::{VaultError, VaultResult};
use crate::state::{FeeData, Position, VaultState};
use crate::types::Address;

/// Vault configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VaultConfig {
    /// Custody identity of the vault
    pub vault: Address,

    /// Base asset
    pub base: Address,

    /// Quote asset
    pub quote: Address,

    /// Manager role for administrative operations
    pub manager: Address,

    /// Share decimals minus quote decimals
    pub quote_decimals_offset: u8,

    /// Fee rates and recipient; no fees when absent
    #[serde(default)]
    pub fees: Option<FeeData>,

    /// Deposit cap in quote units; uncapped when absent
    #[serde(default, with = "amount_serde")]
    pub max_total_in_quote: Option<u128>,

    /// Initial ladder and funds state
    #[serde(default)]
    pub position: Position,

    /// Executors allowed to run manager swaps
    #[serde(default)]
    pub allowed_swap_contracts: Vec<Address>,
}

impl VaultConfig {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> VaultResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            VaultError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> VaultResult<Self> {
        let config: VaultConfig = toml::from_str(content)
            .map_err(|e| VaultError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> VaultResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| VaultError::config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            VaultError::config(format!("Failed to write config file {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> VaultResult<()> {
        for address in [self.vault, self.base, self.quote, self.manager] {
            address.require_non_zero()?;
        }
        if self.base == self.quote {
            return Err(VaultError::config("base and quote must differ"));
        }
        if self.quote_decimals_offset > MAX_QUOTE_DECIMALS_OFFSET {
            return Err(VaultError::config(format!(
                "quote_decimals_offset {} above {}",
                self.quote_decimals_offset, MAX_QUOTE_DECIMALS_OFFSET
            )));
        }
        if let Some(fees) = &self.fees {
            fees.validate()?;
            if fees.fee_recipient == self.vault {
                return Err(VaultError::VaultCannotMint);
            }
        }
        self.position.validate()?;
        for executor in &self.allowed_swap_contracts {
            executor.require_non_zero()?;
        }
        Ok(())
    }

    /// Initial vault state described by this configuration
    pub fn to_state(&self) -> VaultResult<VaultState> {
        let mut state = VaultState::new(
            self.vault,
            self.base,
            self.quote,
            self.manager,
            self.quote_decimals_offset,
        )?;
        if let Some(fees) = self.fees {
            state.fee_data = fees;
        }
        if let Some(max) = self.max_total_in_quote {
            state.max_total_in_quote = max;
        }
        state.position = self.position;
        state.allowed_swap_contracts = self.allowed_swap_contracts.iter().copied().collect();
        Ok(state)
    }
}

/// TOML integers stop at i64, so amounts travel as decimal strings
mod amount_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(amount: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match amount {
            Some(amount) => serializer.serialize_str(&amount.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u128>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| s.replace('_', "").parse::<u128>().map_err(<D::Error as serde::de::Error>::custom))
            .transpose()
    }
}
