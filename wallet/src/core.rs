pub mod config;
mod utxo;

use std::path::Path;

use anyhow::{Context, Result};
use coinlib::blockchain::{Tx, TxOut};
use coinlib::crypto::{Pkh, PrivateKey};
use coinlib::script::Script;
use coinlib::tx_builder::TxBuilder;
use coinlib::tx_signer::TxSigner;
use coinlib::utxo::TxOutBnMap;
use coinlib::Saveable;
use config::Config;
use tracing::{debug, info};
use utxo::UtxoStore;

/// Result of asking the wallet for a payment
pub enum Payment {
    Signed(Tx),
    /// Not enough funds, nothing was signed
    Underfunded { shortfall: u64 },
}

pub struct Core {
    pub config: Config,
    change_pkh: Pkh,
    store: UtxoStore,
}

impl Core {
    /// Loads config file, keys and the UTXO snapshot it points at
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::load_from_file(config_path).context("load config from file")?;

        let mut store = UtxoStore::new();
        let mut pkhs = Vec::with_capacity(config.my_keys.len());
        for path in &config.my_keys {
            let key = PrivateKey::load_from_file(path)
                .with_context(|| format!("load PrivateKey from file '{}'", path.display()))?;
            pkhs.push(store.add_key(key));
        }
        // index checked by Config::load_from_file
        let change_pkh = pkhs[config.change_key];

        let utxos = if config.utxo_file.exists() {
            TxOutBnMap::load_from_file(&config.utxo_file).with_context(|| {
                format!("load UTXO snapshot '{}'", config.utxo_file.display())
            })?
        } else {
            info!("no UTXO snapshot at {}", config.utxo_file.display());
            TxOutBnMap::new()
        };
        store.set_utxos(utxos);

        Ok(Self {
            config,
            change_pkh,
            store,
        })
    }

    pub fn balance(&self) -> Result<u64> {
        Ok(self.store.utxos.value()?)
    }

    pub fn change_pkh(&self) -> &Pkh {
        &self.change_pkh
    }

    /// Selects outputs oldest first, pays `amount` to `recipient` and signs every input
    pub fn create_transaction(&self, recipient: &Pkh, amount: u64) -> Result<Payment> {
        if amount == 0 {
            anyhow::bail!("Amount must be greater than zero");
        }
        let mut builder = TxBuilder::new(
            &self.store.utxos,
            Script::pkh_output(&self.change_pkh),
            self.config.lock_abs,
        );
        builder.add_output(TxOut::new(amount, Script::pkh_output(recipient)));
        let built = builder.build().context("build transaction")?;

        if built.is_underfunded() {
            debug!(shortfall = built.shortfall(), "refusing to sign");
            return Ok(Payment::Underfunded {
                shortfall: built.shortfall(),
            });
        }

        let tx = TxSigner::new(&built.tx, &self.store.utxos, &self.store.my_keys)
            .sign_all()
            .context("sign transaction")?;
        info!(id = %tx.id(), amount, inputs = tx.inputs().len(), "transaction created");
        Ok(Payment::Signed(tx))
    }
}
