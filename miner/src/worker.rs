use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use coinlib::blockchain::{Header, HeaderMiner};
use tracing::{debug, warn};

/// Mines `template` on `threads` workers, one nonce partition each.
/// The first worker to find a valid id stops the others.
pub fn mine(template: Header, threads: u32, steps: usize) -> Option<Header> {
    let stop = Arc::new(AtomicBool::new(false));
    let (sender, receiver) = flume::unbounded();

    let handles = (0..threads.max(1))
        .map(|partition| {
            let stop = Arc::clone(&stop);
            let sender = sender.clone();
            let mut miner = HeaderMiner::new(template.with_first_4_bytes_of_nonce(partition));

            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if let Some(header) = miner.mine(steps) {
                        debug!(partition, id = %header.id(), "header mined");
                        stop.store(true, Ordering::Relaxed);
                        // the receiver only goes away once a result has arrived
                        let _ = sender.send(header);
                        return;
                    }
                }
                debug!(partition, "worker stopped");
            })
        })
        .collect::<Vec<_>>();
    drop(sender);

    let mined = receiver.recv().ok();
    stop.store(true, Ordering::Relaxed);
    join_all(handles);
    mined
}

/// Runs the lowest id search on every partition and keeps the overall minimum
pub fn lowest(template: Header, threads: u32, n: usize) -> Header {
    let (sender, receiver) = flume::unbounded();

    let handles = (0..threads.max(1))
        .map(|partition| {
            let sender = sender.clone();
            let miner = HeaderMiner::new(template.with_first_4_bytes_of_nonce(partition));
            thread::spawn(move || {
                let _ = sender.send(miner.lowest_id_for_n_times(n));
            })
        })
        .collect::<Vec<_>>();
    drop(sender);

    let best = receiver
        .iter()
        .min_by_key(|header| header.id_num())
        .unwrap_or(template);
    join_all(handles);
    best
}

fn join_all(handles: Vec<thread::JoinHandle<()>>) {
    for handle in handles {
        if handle.join().is_err() {
            warn!("mining thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinlib::blockchain::target_from_difficulty;

    #[test]
    fn workers_find_a_valid_header() {
        let template = Header::default().with_target(target_from_difficulty(64));
        let mined = mine(template, 3, 1_000).unwrap();
        assert!(mined.is_id_valid());
        assert_eq!(mined.target(), template.target());
    }

    #[test]
    fn lowest_search_is_not_worse_than_any_partition_start() {
        let template = Header::default().with_timestamp(5);
        let best = lowest(template, 2, 10);
        assert!(best.id_num() <= template.with_first_4_bytes_of_nonce(0).id_num());
        assert!(best.id_num() <= template.with_first_4_bytes_of_nonce(1).id_num());
        assert_eq!(best.timestamp(), 5);
    }
}
