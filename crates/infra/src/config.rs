//! Ledger configuration.

use splitledger_ledger::SplitValidation;

/// Environment variable enabling strict split validation.
pub const STRICT_SPLITS_ENV: &str = "SPLITLEDGER_STRICT_SPLITS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerConfig {
    /// How split inputs are checked when expenses are created or updated.
    pub split_validation: SplitValidation,
}

impl LedgerConfig {
    pub fn with_split_validation(mut self, validation: SplitValidation) -> Self {
        self.split_validation = validation;
        self
    }

    /// Load from process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(STRICT_SPLITS_ENV) {
            match raw.trim().parse::<bool>() {
                Ok(true) => config.split_validation = SplitValidation::Strict,
                Ok(false) => config.split_validation = SplitValidation::Permissive,
                Err(_) => tracing::warn!(
                    value = %raw,
                    "{STRICT_SPLITS_ENV} is not a boolean; using permissive split validation"
                ),
            }
        }

        config
    }
}
