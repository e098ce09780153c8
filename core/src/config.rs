use serde::{Deserialize, Serialize};

/// Connection and query settings for a `BankStore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// SQLite file path. `:memory:` opens a private in-memory database.
    pub database_path: String,
    pub pool_max_size: u32,
    pub busy_timeout_ms: u64,
    /// How long a caller waits for a free pooled connection.
    pub connection_timeout_ms: u64,
    /// Row cap for `get_transactions` when no date range and no explicit
    /// limit is given.
    pub recent_transactions_limit: u32,
    pub seed: SeedConfig,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            database_path: "bank.db".into(),
            pool_max_size: 10,
            busy_timeout_ms: 5_000,
            connection_timeout_ms: 30_000,
            recent_transactions_limit: 100,
            seed: SeedConfig::default(),
        }
    }
}

impl BankConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: BankConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory config for unit and integration tests.
    pub fn default_test() -> Self {
        Self {
            database_path: ":memory:".into(),
            pool_max_size: 1,
            busy_timeout_ms: 1_000,
            connection_timeout_ms: 5_000,
            seed: SeedConfig::default_test(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.pool_max_size > 0, "pool_max_size must be > 0");
        anyhow::ensure!(
            self.recent_transactions_limit > 0,
            "recent_transactions_limit must be > 0"
        );
        self.seed.validate()
    }
}

/// Shape of the synthetic data produced by the seeder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub customers: u32,
    pub min_accounts_per_customer: u32,
    pub max_accounts_per_customer: u32,
    /// Opening balance range, in cents.
    pub opening_balance_min_cents: i64,
    pub opening_balance_max_cents: i64,
    pub transactions: u32,
    /// Share of generated transactions routed through a transfer.
    pub transfer_share: f64,
    pub transfer_amount_min_cents: i64,
    pub transfer_amount_max_cents: i64,
    pub entry_amount_min_cents: i64,
    pub entry_amount_max_cents: i64,
    pub transfer_description: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            customers: 25,
            min_accounts_per_customer: 1,
            max_accounts_per_customer: 3,
            opening_balance_min_cents: 100_000,
            opening_balance_max_cents: 10_000_000,
            transactions: 500,
            transfer_share: 0.20,
            transfer_amount_min_cents: 1_000,
            transfer_amount_max_cents: 200_000,
            entry_amount_min_cents: 1_000,
            entry_amount_max_cents: 500_000,
            transfer_description: "Random Fund Transfer".into(),
        }
    }
}

impl SeedConfig {
    pub fn default_test() -> Self {
        Self {
            customers: 6,
            transactions: 60,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.min_accounts_per_customer >= 1
                && self.min_accounts_per_customer <= self.max_accounts_per_customer,
            "accounts per customer range is empty"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.transfer_share),
            "transfer_share must be within [0, 1]"
        );
        for (label, lo, hi) in [
            ("opening_balance", self.opening_balance_min_cents, self.opening_balance_max_cents),
            ("transfer_amount", self.transfer_amount_min_cents, self.transfer_amount_max_cents),
            ("entry_amount", self.entry_amount_min_cents, self.entry_amount_max_cents),
        ] {
            anyhow::ensure!(0 <= lo && lo <= hi, "{label} range [{lo}, {hi}] is invalid");
        }
        anyhow::ensure!(
            self.transfer_amount_min_cents > 0 && self.entry_amount_min_cents > 0,
            "generated amounts must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: BankConfig =
            serde_json::from_str(r#"{ "database_path": "x.db", "seed": { "customers": 3 } }"#)
                .unwrap();
        assert_eq!(config.database_path, "x.db");
        assert_eq!(config.recent_transactions_limit, 100);
        assert_eq!(config.seed.customers, 3);
        assert_eq!(config.seed.transactions, 500);
    }

    #[test]
    fn rejects_inverted_account_range() {
        let mut config = BankConfig::default_test();
        config.seed.min_accounts_per_customer = 4;
        assert!(config.validate().is_err());
    }
}
