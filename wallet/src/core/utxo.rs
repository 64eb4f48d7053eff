use coinlib::crypto::{Pkh, PrivateKey};
use coinlib::keystore::PkhKeyMap;
use coinlib::utxo::TxOutBnMap;
use tracing::debug;

#[derive(Default)]
pub struct UtxoStore {
    /// My key pairs by pkh
    pub my_keys: PkhKeyMap,
    /// Outputs spendable by my keys
    pub utxos: TxOutBnMap,
}

impl UtxoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_key(&mut self, key: PrivateKey) -> Pkh {
        let pkh = self.my_keys.add_private(key);
        debug!("Adding key to UtxoStore: {pkh}");
        pkh
    }

    /// Keeps only the plain PKH outputs locked to one of my keys, the signer handles no others
    pub fn set_utxos(&mut self, utxos: TxOutBnMap) {
        let mut mine = TxOutBnMap::new();
        for (outpoint, entry) in utxos.iter() {
            let script = entry.tx_out.script();
            match script.pkh().filter(|_| script.is_pkh_output()) {
                Some(pkh) if self.my_keys.get(&pkh).is_some() => {
                    mine.add(*outpoint, entry.tx_out.clone(), entry.block_num)
                }
                _ => debug!("Skipping foreign output {outpoint}"),
            }
        }
        debug!("{} of {} outputs are mine", mine.len(), utxos.len());
        self.utxos = mine;
    }
}
