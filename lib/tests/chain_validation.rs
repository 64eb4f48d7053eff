use coinlib::blockchain::{
    genesis_target, mint_reward, target_from_difficulty, Header, HeaderMiner, Tx, TxOut,
    WorkParAlgo, WorkSerAlgo,
};
use coinlib::crypto::KeyPair;
use coinlib::error::ChainError;
use coinlib::merkle_root::MerkleRoot;
use coinlib::script::Script;
use coinlib::sha256::Hash;
use coinlib::{BLOCK_INTERVAL_MS, HEADER_SIZE};

const START: u64 = 1_700_000_000_000;

fn mine(header: Header) -> Header {
    let mut miner = HeaderMiner::new(header);
    (0..1_000)
        .find_map(|_| miner.mine(10_000))
        .expect("easy target should be mined")
}

fn mint_tx(block_num: u32) -> Tx {
    let pkh = KeyPair::new_random().public.pkh();
    Tx::new_mint(
        block_num,
        Hash::digest(&block_num.to_be_bytes()),
        "miner.example.com",
        vec![TxOut::new(mint_reward(block_num), Script::pkh_output(&pkh))],
    )
    .unwrap()
}

fn genesis() -> Header {
    let root = MerkleRoot::calculate(&[mint_tx(0)]);
    mine(Header::from_genesis(root, START))
}

fn next(prev: &Header, prev_prev: Option<&Header>, timestamp: u64) -> Header {
    let tx = mint_tx(prev.block_num() + 1);
    let root = MerkleRoot::calculate(&[tx]);
    mine(Header::from_chain(prev, prev_prev, root, 1, timestamp).unwrap())
}

#[test]
fn genesis_is_accepted_without_previous_header() {
    let genesis = genesis();
    assert!(genesis.is_genesis());
    assert_eq!(genesis.target(), genesis_target());
    assert_eq!(genesis.validate_in_chain(None, None, 1), Ok(()));
}

#[test]
fn genesis_rejects_each_broken_condition() {
    let genesis = genesis();

    let linked = mine(genesis.with_prev_block_id(Hash::digest(b"somewhere")));
    assert_eq!(
        linked.validate_in_chain(None, None, 1),
        Err(ChainError::InvalidGenesis)
    );

    let easier = mine(genesis.with_target(target_from_difficulty(1_000)));
    assert_eq!(
        easier.validate_in_chain(None, None, 1),
        Err(ChainError::InvalidGenesis)
    );

    let wrong_algo = mine(genesis.with_work_ser(WorkSerAlgo::Null, Hash::zero()));
    assert_eq!(
        wrong_algo.validate_in_chain(None, None, 1),
        Err(ChainError::InvalidGenesis)
    );

    let wrong_par_algo = mine(genesis.with_work_par(WorkParAlgo::Pow5, Hash::zero()));
    assert_eq!(
        wrong_par_algo.validate_in_chain(None, None, 1),
        Err(ChainError::InvalidGenesis)
    );

    let not_zero = mine(genesis.with_block_num(1));
    assert_eq!(
        not_zero.validate_in_chain(None, None, 1),
        Err(ChainError::MissingPrevHeader)
    );

    // a nonce whose id misses the target
    let unmined = (0u64..)
        .map(|n| genesis.with_nonce(n.into()))
        .find(|h| !h.is_id_valid())
        .unwrap();
    assert_eq!(
        unmined.validate_in_chain(None, None, 1),
        Err(ChainError::IdAboveTarget)
    );
}

#[test]
fn transaction_count_and_version_rules() {
    let genesis = genesis();
    assert_eq!(
        genesis.validate_in_chain(None, None, 2),
        Err(ChainError::TransactionCountMismatch {
            claimed: 1,
            actual: 2
        })
    );

    let empty = mine(genesis.with_n_transactions(0));
    assert_eq!(
        empty.validate_in_chain(None, None, 0),
        Err(ChainError::NoTransactions)
    );

    let versioned = mine(genesis.with_version(1));
    assert_eq!(
        versioned.validate_in_chain(None, None, 1),
        Err(ChainError::InvalidVersion(1))
    );
}

#[test]
fn chain_of_three_headers() {
    let genesis = genesis();
    let first = next(&genesis, None, START + BLOCK_INTERVAL_MS);
    let second = next(&first, Some(&genesis), START + 2 * BLOCK_INTERVAL_MS);

    assert_eq!(first.validate_in_chain(Some(&genesis), None, 1), Ok(()));
    assert_eq!(
        second.validate_in_chain(Some(&first), Some(&genesis), 1),
        Ok(())
    );
    assert_eq!(second.block_num(), 2);
    assert_eq!(second.difficulty(), genesis.difficulty());
}

#[test]
fn linkage_rules() {
    let genesis = genesis();
    let first = next(&genesis, None, START + BLOCK_INTERVAL_MS);

    let skipped = mine(first.with_block_num(2));
    assert_eq!(
        skipped.validate_in_chain(Some(&genesis), None, 1),
        Err(ChainError::BlockNumMismatch {
            expected: 1,
            got: 2
        })
    );

    let orphan = mine(first.with_prev_block_id(Hash::digest(b"other chain")));
    assert_eq!(
        orphan.validate_in_chain(Some(&genesis), None, 1),
        Err(ChainError::PrevBlockIdMismatch)
    );

    let stale = mine(first.with_timestamp(genesis.timestamp()));
    assert_eq!(
        stale.validate_in_chain(Some(&genesis), None, 1),
        Err(ChainError::TimestampNotIncreasing)
    );

    let easier = mine(first.with_target(target_from_difficulty(1_000)));
    assert_eq!(
        easier.validate_in_chain(Some(&genesis), None, 1),
        Err(ChainError::TargetMismatch)
    );

    let mut bytes = first.to_bytes();
    // work_ser_algo sits right after the nonce
    bytes[149..151].copy_from_slice(&9u16.to_be_bytes());
    let unknown_algo = mine(Header::from_bytes(&bytes).unwrap());
    assert_eq!(
        unknown_algo.validate_in_chain(Some(&genesis), None, 1),
        Err(ChainError::InvalidWorkSerAlgo(9))
    );

    let mut bytes = first.to_bytes();
    // work_par_algo follows the serial work hash
    bytes[183..185].copy_from_slice(&7u16.to_be_bytes());
    let unknown_par_algo = mine(Header::from_bytes(&bytes).unwrap());
    assert_eq!(
        unknown_par_algo.validate_in_chain(Some(&genesis), None, 1),
        Err(ChainError::InvalidWorkParAlgo(7))
    );
}

#[test]
fn retiming_recomputes_the_target() {
    let genesis = genesis();
    let first = next(&genesis, None, START + BLOCK_INTERVAL_MS);
    let root = MerkleRoot::calculate(&[mint_tx(2)]);
    let template =
        Header::from_chain(&first, Some(&genesis), root, 1, START + 2 * BLOCK_INTERVAL_MS)
            .unwrap();
    assert!(template.is_target_valid(&first, Some(&genesis)));

    // a quarter interval after `first` raises the difficulty
    let early = START + BLOCK_INTERVAL_MS + BLOCK_INTERVAL_MS / 4;
    assert!(!template.with_timestamp(early).is_target_valid(&first, Some(&genesis)));

    let retimed = template
        .with_timestamp_and_target(&first, Some(&genesis), early)
        .unwrap();
    assert_eq!(retimed.timestamp(), early);
    assert!(retimed.is_target_valid(&first, Some(&genesis)));
    assert!(retimed.difficulty() > template.difficulty());
    assert_eq!(retimed.nonce(), template.nonce());
}

#[test]
fn future_timestamp_is_rejected_only_against_the_clock() {
    let genesis = genesis();
    assert_eq!(
        genesis.validate_at(None, None, 1, START - 1),
        Err(ChainError::TimestampInFuture)
    );
    assert_eq!(genesis.validate_at(None, None, 1, START), Ok(()));
    assert_eq!(genesis.validate_now(None, None, 1), Ok(()));
}

#[test]
fn header_round_trips_at_fixed_size() {
    let genesis = genesis();
    let bytes = genesis.to_bytes();
    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(Header::from_bytes(&bytes).unwrap(), genesis);
}

#[test]
fn tampering_breaks_the_id() {
    let genesis = genesis();
    let bytes = genesis.to_bytes();
    let mut still_valid = 0;
    for i in 0..bytes.len() {
        let mut tampered = bytes;
        tampered[i] ^= 0x01;
        let header = Header::from_bytes(&tampered).unwrap();
        assert_ne!(header.id(), genesis.id(), "byte {i}");
        if header.is_id_valid() {
            still_valid += 1;
        }
    }
    // each flip keeps the id below the target with probability ~1/2000
    assert!(still_valid <= 3, "{still_valid} tampered headers stayed valid");
}

#[test]
fn mint_tx_matches_header() {
    let tx = mint_tx(0);
    let genesis = mine(Header::from_genesis(MerkleRoot::calculate(&[tx.clone()]), START));
    assert_eq!(genesis.merkle_root(), &MerkleRoot::calculate(&[tx.clone()]).hash());
    assert_eq!(genesis.validate_mint_tx(&tx), Ok(()));
    assert!(genesis.validate_mint_tx(&mint_tx(1)).is_err());
}
