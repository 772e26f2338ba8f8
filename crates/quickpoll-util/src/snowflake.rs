//! Time-ordered 63-bit identifiers.
//!
//! Layout (most significant first): 41 bits of milliseconds since
//! [`EPOCH_MS`], 10 bits of worker id, 12 bits of per-millisecond sequence.
//! Ids generated by one process are strictly increasing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 2025-01-01T00:00:00Z
pub const EPOCH_MS: u64 = 1_735_689_600_000;

const WORKER_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const WORKER_MASK: u64 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

/// Packed `(elapsed_ms << SEQUENCE_BITS) | sequence` of the last issued id.
static LAST: AtomicU64 = AtomicU64::new(0);

fn elapsed_ms() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    now.saturating_sub(EPOCH_MS) & TIMESTAMP_MASK
}

pub fn generate(worker_id: u16) -> i64 {
    let worker = u64::from(worker_id) & WORKER_MASK;
    loop {
        let now = elapsed_ms();
        let last = LAST.load(Ordering::Acquire);
        let last_ms = last >> SEQUENCE_BITS;
        // An exhausted sequence carries into the millisecond bits, which keeps
        // ids increasing even when the wall clock steps backwards.
        let next = if now > last_ms {
            now << SEQUENCE_BITS
        } else {
            last + 1
        };
        if LAST
            .compare_exchange(last, next, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let ms = next >> SEQUENCE_BITS;
            let seq = next & SEQUENCE_MASK;
            return ((ms << (WORKER_BITS + SEQUENCE_BITS)) | (worker << SEQUENCE_BITS) | seq)
                as i64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut prev = generate(1);
        for _ in 0..10_000 {
            let next = generate(1);
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..2_000).map(|_| generate(1)).collect::<Vec<_>>()))
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("thread") {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
    }
}
