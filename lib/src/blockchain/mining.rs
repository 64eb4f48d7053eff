use tracing::trace;

use crate::U256;

use super::Header;

/// Nonce search over a header template
pub struct HeaderMiner {
    header: Header,
}

impl HeaderMiner {
    pub fn new(header: Header) -> Self {
        Self { header }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Tries `n` random nonces and keeps the header whose id is numerically lowest.
    /// Starts from the current template, so the result is never worse than it.
    pub fn lowest_id_for_n_times(&self, n: usize) -> Header {
        let mut best = self.header;
        let mut best_id = best.id_num();
        for _ in 0..n {
            let candidate = self.header.with_random_nonce();
            let id = candidate.id_num();
            if id < best_id {
                best = candidate;
                best_id = id;
            }
        }
        trace!(n, best_id = %best.id(), "lowest id search done");
        best
    }

    pub fn lowest_nonce_for_n_times(&self, n: usize) -> U256 {
        self.lowest_id_for_n_times(n).nonce()
    }

    /// Increments the nonce up to `steps` times. Returns the header once its id is below
    /// its target. The template keeps the last nonce tried, so the search can be resumed.
    pub fn mine(&mut self, steps: usize) -> Option<Header> {
        // if the header already matches the target, return early
        if self.header.is_id_valid() {
            return Some(self.header);
        }

        // mine a finite number of steps at a time so the caller can stop or swap templates
        for _ in 0..steps {
            let (nonce, overflow) = self.header.nonce().overflowing_add(U256::one());
            self.header = self.header.with_nonce(nonce);
            if overflow {
                trace!("nonce space exhausted");
                return None;
            }
            if self.header.is_id_valid() {
                return Some(self.header);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::target_from_difficulty;

    #[test]
    fn lowest_id_never_gets_worse() {
        let template = Header::default().with_timestamp(1);
        let miner = HeaderMiner::new(template);
        let lowest = miner.lowest_id_for_n_times(20);
        assert!(lowest.id_num() <= template.id_num());
        assert_eq!(lowest.timestamp(), 1);
        assert_eq!(miner.lowest_nonce_for_n_times(0), template.nonce());
    }

    #[test]
    fn mines_an_easy_target() {
        // difficulty 16 needs about 16 attempts
        let template = Header::default().with_target(target_from_difficulty(16));
        let mut miner = HeaderMiner::new(template);
        let mined = (0..100).find_map(|_| miner.mine(1_000)).unwrap();
        assert!(mined.is_id_valid());
        assert_eq!(mined.target(), template.target());
    }

    #[test]
    fn impossible_target_gives_up() {
        let template = Header::default().with_target(U256::zero());
        let mut miner = HeaderMiner::new(template);
        assert_eq!(miner.mine(50), None);
        assert_eq!(miner.header().nonce(), U256::from(50u64));
    }
}
