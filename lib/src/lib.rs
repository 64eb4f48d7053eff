pub mod blockchain;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod keystore;
pub mod merkle_root;
pub mod script;
pub mod script_num;
pub mod sha256;
pub mod tx_builder;
pub mod tx_signer;
pub mod utxo;
pub mod wire;

use uint::construct_uint;

// Unsigned 256-bit integer consisting of 4 x 64-bit words (little-endian)
construct_uint! {
    #[derive(serde::Serialize, serde::Deserialize)]
    pub struct U256(4);
}

/// Size of an encoded header in bytes
pub const HEADER_SIZE: usize = 1 + 32 + 32 + 8 + 8 + 4 + 32 + 32 + 2 + 32 + 2 + 32;
/// Ideal time between two blocks in milliseconds (10 minutes)
pub const BLOCK_INTERVAL_MS: u64 = 600_000;
/// Difficulty never drops below this value
pub const MIN_DIFFICULTY: u64 = 2_000;
/// Difficulty of the genesis block
pub const GENESIS_DIFFICULTY: u64 = 2_000;
/// Smallest units per coin
pub const UNITS_PER_COIN: u64 = 100_000_000_000;
/// Mint reward of the first halving epoch: 100 coins
pub const BASE_REWARD: u64 = 100 * UNITS_PER_COIN;
/// Halving interval in blocks
pub const HALVING_INTERVAL: u32 = 210_000;

/// Convert the smallest unit to coins
pub fn units_to_coins(units: u64) -> f64 {
    units as f64 / UNITS_PER_COIN as f64
}

/// Saveable trait - save and load from file
pub trait Saveable
where
    Self: Sized,
{
    fn load<R: std::io::Read>(reader: R) -> std::io::Result<Self>;
    fn save<W: std::io::Write>(&self, writer: W) -> std::io::Result<()>;
    // Default implementations:
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let file = std::fs::File::open(&path)?;
        Self::load(file)
    }
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let file = std::fs::File::create(&path)?;
        self.save(file)
    }
}

/// Loads a value stored as CBOR
pub(crate) fn load_cbor<T, R>(reader: R, what: &str) -> std::io::Result<T>
where
    T: serde::de::DeserializeOwned,
    R: std::io::Read,
{
    ciborium::de::from_reader(reader).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to deserialize {what}"),
        )
    })
}

/// Stores a value as CBOR
pub(crate) fn save_cbor<T, W>(value: &T, writer: W, what: &str) -> std::io::Result<()>
where
    T: serde::Serialize,
    W: std::io::Write,
{
    ciborium::ser::into_writer(value, writer).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to serialize {what}"),
        )
    })
}

/// Reads a whole reader and decodes it with a wire decoder
pub(crate) fn load_wire<T, R>(
    mut reader: R,
    decode: impl FnOnce(&[u8]) -> error::Result<T>,
) -> std::io::Result<T>
where
    R: std::io::Read,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
