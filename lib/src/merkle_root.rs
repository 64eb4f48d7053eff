use serde::{Deserialize, Serialize};

use crate::{blockchain::Tx, sha256::Hash};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MerkleRoot(Hash);

impl MerkleRoot {
    /// Calculate the Merkle root over the ids of a block's transactions
    pub fn calculate(transactions: &[Tx]) -> Self {
        let mut layer: Vec<Hash> = transactions.iter().map(Tx::id).collect();

        if layer.is_empty() {
            return Self(Hash::zero());
        }

        while layer.len() > 1 {
            layer = layer
                .chunks(2)
                .map(|pair| {
                    let left = pair[0];
                    // if there is no right, use the left hash again
                    let right = *pair.get(1).unwrap_or(&left);
                    let mut both = [0u8; 64];
                    both[..32].copy_from_slice(left.as_bytes());
                    both[32..].copy_from_slice(right.as_bytes());
                    Hash::double_digest(&both)
                })
                .collect();
        }

        Self(layer[0])
    }

    pub fn hash(&self) -> Hash {
        self.0
    }
}

impl From<Hash> for MerkleRoot {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::TxOut;
    use crate::crypto::KeyPair;
    use crate::script::Script;

    fn mint(block_num: u32) -> Tx {
        let pkh = KeyPair::new_random().public.pkh();
        Tx::new_mint(
            block_num,
            Hash::zero(),
            "example.com",
            vec![TxOut::new(1, Script::pkh_output(&pkh))],
        )
        .unwrap()
    }

    #[test]
    fn single_tx_root_is_its_id() {
        let tx = mint(0);
        assert_eq!(MerkleRoot::calculate(&[tx.clone()]).hash(), tx.id());
    }

    #[test]
    fn odd_leaf_is_paired_with_itself() {
        let txs = [mint(1), mint(2), mint(3)];
        let four = [txs[0].clone(), txs[1].clone(), txs[2].clone(), txs[2].clone()];
        assert_eq!(MerkleRoot::calculate(&txs), MerkleRoot::calculate(&four));
        assert_ne!(MerkleRoot::calculate(&txs), MerkleRoot::calculate(&txs[..2]));
    }

    #[test]
    fn empty_root_is_zero() {
        assert_eq!(MerkleRoot::calculate(&[]).hash(), Hash::zero());
    }
}
