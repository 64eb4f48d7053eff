use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub fn generate_config_template(path: &Path) -> Result<()> {
    let dummy_config = Config {
        my_keys: vec![PathBuf::from("alice.key"), PathBuf::from("bob.key")],
        utxo_file: PathBuf::from("utxos.cbor"),
        change_key: 0,
        lock_abs: 0,
    };

    let config_str = toml::to_string_pretty(&dummy_config)?;
    std::fs::write(path, config_str)?;

    println!("Config template generated at: {}", path.display());

    Ok(())
}

/// Wallet configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Private key files, CBOR encoded
    pub my_keys: Vec<PathBuf>,
    /// Snapshot of the outputs this wallet can spend
    pub utxo_file: PathBuf,
    /// Index into `my_keys` of the key receiving change
    #[serde(default)]
    pub change_key: usize,
    /// Absolute lock put on created transactions
    #[serde(default)]
    pub lock_abs: u32,
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config_str = std::fs::read_to_string(&path)
            .with_context(|| format!("read config file '{}'", path.as_ref().display()))?;

        let config: Config = toml::from_str(&config_str).context("deserialize config from TOML")?;

        if config.my_keys.is_empty() {
            anyhow::bail!("No private keys found in config");
        }
        if config.change_key >= config.my_keys.len() {
            anyhow::bail!(
                "change_key {} is out of range, {} keys configured",
                config.change_key,
                config.my_keys.len()
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_loads_back() {
        let path = std::env::temp_dir().join(format!("wallet-config-{}.toml", std::process::id()));
        generate_config_template(&path).unwrap();
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.my_keys.len(), 2);
        assert_eq!(config.utxo_file, PathBuf::from("utxos.cbor"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn optional_fields_default_to_zero() {
        let config: Config = toml::from_str(
            r#"
            my_keys = ["a.key"]
            utxo_file = "utxos.cbor"
            "#,
        )
        .unwrap();
        assert_eq!(config.change_key, 0);
        assert_eq!(config.lock_abs, 0);
    }

    #[test]
    fn change_key_must_point_at_a_key() {
        let path = std::env::temp_dir().join(format!("wallet-bad-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "my_keys = [\"a.key\"]\nutxo_file = \"u.cbor\"\nchange_key = 1\n",
        )
        .unwrap();
        assert!(Config::load_from_file(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
