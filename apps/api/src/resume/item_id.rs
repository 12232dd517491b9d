//! Item-id source for experience/education entries.
//!
//! Ids are decimal Unix-millisecond strings, the format the stored blobs
//! already use. A plain clock read collides under rapid successive calls,
//! so the last issued value is tracked in an atomic and each new id is
//! forced strictly past it.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static LAST_ISSUED: AtomicU64 = AtomicU64::new(0);

/// Returns a process-wide unique, strictly increasing item id.
pub fn next_item_id() -> String {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let mut prev = LAST_ISSUED.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_ISSUED.compare_exchange_weak(prev, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(observed) => prev = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rapid_calls_yield_distinct_ids() {
        let ids: Vec<String> = (0..1000).map(|_| next_item_id()).collect();
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let a: u64 = next_item_id().parse().unwrap();
        let b: u64 = next_item_id().parse().unwrap();
        let c: u64 = next_item_id().parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_ids_are_decimal_strings() {
        let id = next_item_id();
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }
}
