use coinlib::blockchain::{mint_reward, now_ms, Header, Tx, TxOut};
use coinlib::crypto::PrivateKey;
use coinlib::merkle_root::MerkleRoot;
use coinlib::script::Script;
use coinlib::sha256::Hash;
use coinlib::Saveable;

fn main() {
    let mut args = std::env::args().skip(1);
    let (Some(header_path), Some(tx_path)) = (args.next(), args.next()) else {
        eprintln!("Usage: header_gen <header_file> <mint_tx_file> [domain]");
        std::process::exit(1);
    };
    let domain = args.next().unwrap_or_else(|| "example.com".to_string());

    let private_key = PrivateKey::new_key();
    let pkh = private_key.public_key().pkh();

    let mint = Tx::new_mint(
        0,
        Hash::digest(domain.as_bytes()),
        &domain,
        vec![TxOut::new(mint_reward(0), Script::pkh_output(&pkh))],
    )
    .expect("Failed to build mint transaction");

    let merkle_root = MerkleRoot::calculate(&[mint.clone()]);
    let header = Header::from_genesis(merkle_root, now_ms());
    if let Err(e) = header.validate_mint_tx(&mint) {
        eprintln!("Invalid mint transaction: {e}");
        std::process::exit(1);
    }

    mint.save_to_file(tx_path).expect("Failed to save mint transaction");
    header.save_to_file(header_path).expect("Failed to save header");
    println!("reward paid to {pkh}");
}
